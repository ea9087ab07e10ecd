/**
 * Messages Module
 *
 * The message ingest path (validate, persist, fan out) and the
 * cursor-paginated history endpoint.
 */

pub mod db;
pub mod handlers;
pub mod pagination;

pub use handlers::{get_messages, send_message};
