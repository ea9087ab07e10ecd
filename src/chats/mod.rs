/**
 * Chats Module
 *
 * Chat creation and listing, plus the membership queries the message and
 * realtime paths lean on.
 */

pub mod db;
pub mod handlers;

pub use handlers::{create_chat, get_chats};
