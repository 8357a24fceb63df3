//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the database:
//! - `ProfileStore` - Profiles of online players
//! - `TeleportQueueStore` - Pending teleports, one per player

pub mod profiles;
pub mod teleport_queue;

// Re-export store types
pub use profiles::ProfileStore;
pub use teleport_queue::TeleportQueueStore;
