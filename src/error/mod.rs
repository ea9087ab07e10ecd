/**
 * Backend Error Handling
 *
 * This module defines the API error type and the response shaping that
 * turns errors into structured JSON bodies.
 */

pub mod types;

pub use types::{ApiError, ErrorKey};
