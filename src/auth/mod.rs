/**
 * Authentication Module
 *
 * Token issuance and verification, user and refresh-token persistence, and
 * the login / register / refresh / logout / me HTTP handlers.
 *
 * # Token Lifecycle
 *
 * - Access tokens: signed, 1 hour expiry, stateless. Validity is fully
 *   determined by signature and expiry; there is no server-side revocation
 *   list for access tokens.
 * - Refresh tokens: signed, 7 day expiry, AND persisted. A refresh token is
 *   only honored when its signature verifies and an unexpired row is found
 *   by exact string match; logout deletes the row, which is the only
 *   revocation mechanism. Refresh tokens are not rotated on use.
 */

pub mod handlers;
pub mod store;
pub mod tokens;
