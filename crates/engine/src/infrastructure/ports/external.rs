//! Ports to the host world: presence, feedback and the world-mutation thread.

use waystone_domain::{PlayerId, Position};
use waystone_shared::{EffectKind, ServerMessage};

// =============================================================================
// Player Registry
// =============================================================================

/// Who is online, where they stand, and how to reach them.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerRegistry: Send + Sync {
    fn is_online(&self, id: PlayerId) -> bool;
    fn position(&self, id: PlayerId) -> Option<Position>;
    /// Move a player. Returns false if the player is no longer online.
    ///
    /// Must only be called from the world executor.
    fn set_position(&self, id: PlayerId, position: Position) -> bool;
    fn name(&self, id: PlayerId) -> Option<String>;
    fn find_by_name(&self, name: &str) -> Option<PlayerId>;
    fn players_in_world(&self, world: &str) -> Vec<PlayerId>;
    fn send(&self, id: PlayerId, message: ServerMessage);
}

// =============================================================================
// Feedback
// =============================================================================

/// Outcome and progress notifications for players.
///
/// Implementations decide how each event is rendered (chat, title, sound).
/// All methods are fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait FeedbackPort: Send + Sync {
    fn channeling(&self, id: PlayerId, remaining_seconds: u64, target: &str);
    fn interrupted(&self, id: PlayerId);
    fn teleported(&self, id: PlayerId, target: &str);
    fn not_available(&self, id: PlayerId, target: &str);
    /// The move itself has happened.
    fn relocated(&self, id: PlayerId, position: &Position);
    fn death_location_recorded(&self, id: PlayerId);
    fn effect(&self, kind: EffectKind, at: &Position);
}

// =============================================================================
// World Executor
// =============================================================================

/// A unit of work that mutates world state.
pub type WorldTask = Box<dyn FnOnce() + Send + 'static>;

/// The execution context that is allowed to mutate the world.
///
/// `submit` must not block; the task runs later, in submission order.
#[cfg_attr(test, mockall::automock)]
pub trait WorldExecutor: Send + Sync {
    fn submit(&self, task: WorldTask);
}
