//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host world (player presence, positions, the world-mutation thread)
//! - Player feedback (messages, titles, sounds, effects)
//! - Persistence (profiles, warps)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::RepoError;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{ProfileRepo, WarpRepo};

// =============================================================================
// Host World Ports
// =============================================================================
pub use external::{FeedbackPort, PlayerRegistry, WorldExecutor, WorldTask};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockFeedbackPort, MockPlayerRegistry, MockWorldExecutor};

#[cfg(test)]
pub use repos::{MockProfileRepo, MockWarpRepo};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;
