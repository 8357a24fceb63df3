//! Repository port traits for persistent data.

use async_trait::async_trait;
use waystone_domain::{PlayerId, PlayerProfile, Warp};

use super::error::RepoError;

// =============================================================================
// Profile Storage
// =============================================================================

/// Durable player profile storage.
///
/// Only touched on join and quit; while a player is online their profile is
/// served from `ProfileStore`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn load(&self, id: PlayerId) -> Result<Option<PlayerProfile>, RepoError>;
    async fn save(&self, id: PlayerId, profile: &PlayerProfile) -> Result<(), RepoError>;
}

// =============================================================================
// Warp Lookup
// =============================================================================

/// Named warp lookup. Synchronous: warps are resolved inside the tick.
#[cfg_attr(test, mockall::automock)]
pub trait WarpRepo: Send + Sync {
    fn get(&self, name: &str) -> Option<Warp>;
    /// Insert or replace; returns the replaced warp.
    fn set(&self, warp: Warp) -> Option<Warp>;
    fn remove(&self, name: &str) -> Option<Warp>;
    fn list(&self) -> Vec<Warp>;
}
