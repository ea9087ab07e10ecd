/**
 * Connection Registry
 *
 * Maps each chat id to a broadcast channel whose receivers are the live
 * connections subscribed to that chat. Delivery is at-most-once and
 * best-effort: a chat with no subscribers, or a lagged subscriber, never
 * fails the sender. Durable history is the paginated fetch endpoint's job.
 *
 * # Concurrency
 *
 * The channel map is the only state shared across request handlers. It is
 * guarded by a std `Mutex` held only for map lookups and inserts, never
 * across an await point. Per-chat delivery rides `tokio::sync::broadcast`,
 * so a broadcast always sees a consistent snapshot of subscribers and a
 * concurrently closing connection simply drops its receiver - cleanup
 * needs no bookkeeping and cannot be skipped on error paths.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of each per-chat channel; a subscriber further behind than
/// this lags and skips, it does not block the chat.
const CHANNEL_CAPACITY: usize = 100;

/// Event pushed to chat subscribers when a message is persisted.
///
/// The chat id is carried for routing (it becomes the SSE event name) but
/// is not part of the wire payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    #[serde(skip)]
    pub chat_id: Uuid,
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub sender_id: Uuid,
    pub sender_username: String,
}

/// Registry of live chat subscriptions for this server process.
///
/// Cheap to clone; all clones share the same channel map. Injected through
/// `AppState` rather than living in a global so tests can construct their
/// own.
#[derive(Clone, Default)]
pub struct ChatRegistry {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<RoomEvent>>>>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to one chat, creating the channel on first
    /// use. Dropping the returned receiver is the unsubscribe.
    pub fn subscribe(&self, chat_id: Uuid) -> broadcast::Receiver<RoomEvent> {
        let mut channels = self.channels.lock().expect("registry lock poisoned");
        channels
            .entry(chat_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Subscribe a connection to every chat it is a member of.
    pub fn subscribe_all(&self, chat_ids: &[Uuid]) -> Vec<broadcast::Receiver<RoomEvent>> {
        chat_ids.iter().map(|id| self.subscribe(*id)).collect()
    }

    /// Deliver an event to every connection currently subscribed to the
    /// chat. Returns the number of subscribers reached; zero subscribers
    /// is a normal outcome, not an error.
    pub fn broadcast(&self, chat_id: Uuid, event: RoomEvent) -> usize {
        let sender = {
            let channels = self.channels.lock().expect("registry lock poisoned");
            channels.get(&chat_id).cloned()
        };

        match sender {
            Some(sender) => match sender.send(event) {
                Ok(count) => {
                    tracing::debug!("Broadcast to {} subscriber(s) of chat {}", count, chat_id);
                    count
                }
                Err(_) => 0,
            },
            None => 0,
        }
    }

    /// Drop channels that no longer have any subscribers.
    pub fn prune(&self) {
        self.channels
            .lock()
            .expect("registry lock poisoned")
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Live subscriber count for one chat.
    pub fn subscriber_count(&self, chat_id: Uuid) -> usize {
        self.channels
            .lock()
            .expect("registry lock poisoned")
            .get(&chat_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}
