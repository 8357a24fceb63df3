//! Profiles of online players.
//!
//! Loaded from `ProfileRepo` on join, written back on quit. In between, all
//! reads and writes go through this store.

use dashmap::DashMap;
use waystone_domain::{DomainError, PlayerId, PlayerProfile, Position};

pub struct ProfileStore {
    profiles: DashMap<PlayerId, PlayerProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    pub fn insert(&self, id: PlayerId, profile: PlayerProfile) {
        self.profiles.insert(id, profile);
    }

    pub fn remove(&self, id: PlayerId) -> Option<PlayerProfile> {
        self.profiles.remove(&id).map(|(_, profile)| profile)
    }

    pub fn get(&self, id: PlayerId) -> Option<PlayerProfile> {
        self.profiles.get(&id).map(|p| p.value().clone())
    }

    pub fn is_loaded(&self, id: PlayerId) -> bool {
        self.profiles.contains_key(&id)
    }

    /// Record where a player was before a teleport or death.
    ///
    /// Only a loaded profile is updated. Returns false when the player's
    /// profile has already been unloaded, so a late write cannot resurrect it.
    pub fn set_last_location(&self, id: PlayerId, position: Position) -> bool {
        match self.profiles.get_mut(&id) {
            Some(mut profile) => {
                profile.set_last_location(position);
                true
            }
            None => false,
        }
    }

    pub fn last_location(&self, id: PlayerId) -> Option<Position> {
        self.profiles
            .get(&id)
            .and_then(|p| p.last_location.clone())
    }

    pub fn home(&self, id: PlayerId, name: &str) -> Option<Position> {
        self.profiles.get(&id).and_then(|p| p.home(name).cloned())
    }

    pub fn set_home(
        &self,
        id: PlayerId,
        name: &str,
        position: Position,
    ) -> Result<Option<Position>, DomainError> {
        self.profiles.entry(id).or_default().set_home(name, position)
    }

    pub fn remove_home(&self, id: PlayerId, name: &str) -> Option<Position> {
        self.profiles
            .get_mut(&id)
            .and_then(|mut p| p.remove_home(name))
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
