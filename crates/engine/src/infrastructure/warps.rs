//! In-memory warp storage.

use dashmap::DashMap;
use waystone_domain::Warp;

use crate::infrastructure::ports::WarpRepo;

/// Server-wide named warps, keyed by normalized name.
pub struct WarpStore {
    warps: DashMap<String, Warp>,
}

impl WarpStore {
    pub fn new() -> Self {
        Self {
            warps: DashMap::new(),
        }
    }
}

impl Default for WarpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WarpRepo for WarpStore {
    fn get(&self, name: &str) -> Option<Warp> {
        self.warps
            .get(&Warp::normalize_name(name))
            .map(|w| w.value().clone())
    }

    fn set(&self, warp: Warp) -> Option<Warp> {
        tracing::info!(warp = %warp.name(), position = %warp.position(), "Warp set");
        self.warps.insert(warp.name().to_string(), warp)
    }

    fn remove(&self, name: &str) -> Option<Warp> {
        let removed = self.warps.remove(&Warp::normalize_name(name)).map(|(_, w)| w);
        if let Some(ref warp) = removed {
            tracing::info!(warp = %warp.name(), "Warp removed");
        }
        removed
    }

    fn list(&self) -> Vec<Warp> {
        let mut warps: Vec<Warp> = self.warps.iter().map(|w| w.value().clone()).collect();
        warps.sort_by(|a, b| a.name().cmp(b.name()));
        warps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waystone_domain::Position;

    fn warp(name: &str) -> Warp {
        Warp::new(name, Position::new("world", 0.0, 64.0, 0.0)).unwrap()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let store = WarpStore::new();
        assert!(store.set(warp("Spawn")).is_none());
        assert_eq!(store.get("SPAWN").map(|w| w.name().to_string()), Some("spawn".into()));
    }

    #[test]
    fn set_replaces_and_remove_deletes() {
        let store = WarpStore::new();
        store.set(warp("shop"));
        assert!(store.set(warp("shop")).is_some());
        assert!(store.remove("Shop").is_some());
        assert!(store.get("shop").is_none());
        assert!(store.remove("shop").is_none());
    }

    #[test]
    fn list_is_sorted() {
        let store = WarpStore::new();
        store.set(warp("mine"));
        store.set(warp("arena"));
        let names: Vec<String> = store.list().iter().map(|w| w.name().to_string()).collect();
        assert_eq!(names, vec!["arena", "mine"]);
    }
}
