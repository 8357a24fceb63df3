//! Teleport destinations.
//!
//! A target is resolved when the teleport executes, not when it is queued,
//! so a warp deleted or a player gone offline during channeling is observed.

use std::sync::Arc;

use waystone_domain::{PlayerId, Position, Warp};

use crate::infrastructure::ports::{PlayerRegistry, WarpRepo};
use crate::stores::ProfileStore;

/// Where a queued teleport goes.
#[cfg_attr(test, mockall::automock)]
pub trait TeleportTarget: Send + Sync {
    /// Human-readable destination, shown while channeling.
    fn describe(&self) -> String;

    /// Resolve the destination. `None` means it is no longer available.
    fn prepare(&self) -> Option<Position>;
}

// =============================================================================
// Fixed location
// =============================================================================

/// A fixed position. Always available.
#[derive(Debug, Clone)]
pub struct LocationTarget {
    position: Position,
    label: Option<String>,
}

impl LocationTarget {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            label: None,
        }
    }

    /// Describe the target by name instead of coordinates.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl TeleportTarget for LocationTarget {
    fn describe(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.position.to_string(),
        }
    }

    fn prepare(&self) -> Option<Position> {
        Some(self.position.clone())
    }
}

// =============================================================================
// Warp
// =============================================================================

pub struct WarpTarget {
    name: String,
    warps: Arc<dyn WarpRepo>,
}

impl WarpTarget {
    pub fn new(name: &str, warps: Arc<dyn WarpRepo>) -> Self {
        Self {
            name: Warp::normalize_name(name),
            warps,
        }
    }
}

impl TeleportTarget for WarpTarget {
    fn describe(&self) -> String {
        format!("warp {}", self.name)
    }

    fn prepare(&self) -> Option<Position> {
        self.warps.get(&self.name).map(|warp| warp.position().clone())
    }
}

// =============================================================================
// Home
// =============================================================================

pub struct HomeTarget {
    owner: PlayerId,
    name: String,
    profiles: Arc<ProfileStore>,
}

impl HomeTarget {
    pub fn new(owner: PlayerId, name: impl Into<String>, profiles: Arc<ProfileStore>) -> Self {
        Self {
            owner,
            name: name.into(),
            profiles,
        }
    }
}

impl TeleportTarget for HomeTarget {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn prepare(&self) -> Option<Position> {
        self.profiles.home(self.owner, &self.name)
    }
}

// =============================================================================
// Back
// =============================================================================

/// The player's recorded last location.
///
/// Captured when the target is built: executing any teleport overwrites the
/// last location before the target is resolved.
pub struct LastLocationTarget {
    destination: Option<Position>,
}

impl LastLocationTarget {
    pub fn new(player: PlayerId, profiles: &ProfileStore) -> Self {
        Self {
            destination: profiles.last_location(player),
        }
    }

    /// Whether there was a location to go back to.
    pub fn is_known(&self) -> bool {
        self.destination.is_some()
    }
}

impl TeleportTarget for LastLocationTarget {
    fn describe(&self) -> String {
        "last location".to_string()
    }

    fn prepare(&self) -> Option<Position> {
        self.destination.clone()
    }
}

// =============================================================================
// Another player
// =============================================================================

/// Wherever another player stands when the teleport executes.
pub struct PlayerTarget {
    target: PlayerId,
    name: String,
    players: Arc<dyn PlayerRegistry>,
}

impl PlayerTarget {
    pub fn new(target: PlayerId, name: impl Into<String>, players: Arc<dyn PlayerRegistry>) -> Self {
        Self {
            target,
            name: name.into(),
            players,
        }
    }
}

impl TeleportTarget for PlayerTarget {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn prepare(&self) -> Option<Position> {
        if !self.players.is_online(self.target) {
            return None;
        }
        self.players.position(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::online_players::OnlinePlayers;
    use crate::infrastructure::ports::MockWarpRepo;
    use crate::infrastructure::warps::WarpStore;
    use mockall::predicate::eq;

    fn pos(x: f64) -> Position {
        Position::new("world", x, 64.0, 0.0)
    }

    #[test]
    fn location_describes_label_or_coordinates() {
        let plain = LocationTarget::new(pos(1.0));
        assert_eq!(plain.describe(), pos(1.0).to_string());
        assert_eq!(plain.labeled("spawn").describe(), "spawn");
    }

    #[test]
    fn warp_resolves_at_prepare_time() {
        let warps = Arc::new(WarpStore::new());
        let target = WarpTarget::new("Market", warps.clone());
        assert_eq!(target.describe(), "warp market");
        assert_eq!(target.prepare(), None);

        warps.set(Warp::new("market", pos(5.0)).unwrap());
        assert_eq!(target.prepare(), Some(pos(5.0)));

        warps.remove("market");
        assert_eq!(target.prepare(), None);
    }

    #[test]
    fn warp_looks_up_normalized_name() {
        let mut warps = MockWarpRepo::new();
        warps
            .expect_get()
            .with(eq("spawn"))
            .times(1)
            .returning(|_| None);

        let target = WarpTarget::new("  SPAWN ", Arc::new(warps));
        assert_eq!(target.prepare(), None);
    }

    #[test]
    fn home_reads_owner_profile() {
        let profiles = Arc::new(ProfileStore::new());
        let owner = PlayerId::new();
        let target = HomeTarget::new(owner, "home", profiles.clone());
        assert_eq!(target.describe(), "home");
        assert_eq!(target.prepare(), None);

        profiles.set_home(owner, "home", pos(2.0)).unwrap();
        assert_eq!(target.prepare(), Some(pos(2.0)));
    }

    #[test]
    fn last_location_is_captured_at_construction() {
        let profiles = ProfileStore::new();
        let id = PlayerId::new();
        assert!(!LastLocationTarget::new(id, &profiles).is_known());

        profiles.insert(id, waystone_domain::PlayerProfile::new());
        profiles.set_last_location(id, pos(1.0));
        let target = LastLocationTarget::new(id, &profiles);
        profiles.set_last_location(id, pos(9.0));

        assert!(target.is_known());
        assert_eq!(target.prepare(), Some(pos(1.0)));
        assert_eq!(target.describe(), "last location");
    }

    #[test]
    fn player_target_follows_online_player() {
        let players = Arc::new(OnlinePlayers::new());
        let other = PlayerId::new();
        let _rx = players.connect(other, "Alex", pos(3.0));
        let target = PlayerTarget::new(other, "Alex", players.clone());

        assert_eq!(target.prepare(), Some(pos(3.0)));
        players.set_position(other, pos(4.0));
        assert_eq!(target.prepare(), Some(pos(4.0)));

        players.disconnect(other);
        assert_eq!(target.prepare(), None);
    }
}
