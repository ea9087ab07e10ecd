/**
 * Real-time Fan-out
 *
 * In-memory connection registry plus the SSE subscription endpoint. One
 * server process owns the whole registry; scaling past a single process
 * would need an external pub/sub bus and is out of scope.
 */

pub mod registry;
pub mod subscription;

pub use registry::{ChatRegistry, RoomEvent};
pub use subscription::realtime_subscription;
