/**
 * Chatterbox Backend Library
 *
 * A minimal multi-user chat backend: username/password authentication with
 * access/refresh tokens, private and group chats, cursor-paginated message
 * history, and real-time fan-out of new messages to chat subscribers over
 * Server-Sent Events.
 */

pub mod auth;
pub mod chats;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod server;
