//! Pending teleports, keyed by player.
//!
//! At most one entry per player. Every method takes and releases the shard
//! lock internally, so callers never hold a guard across a callback.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use waystone_domain::PlayerId;

use crate::use_cases::teleport::TeleportQueueEntry;

pub struct TeleportQueueStore {
    entries: DashMap<PlayerId, TeleportQueueEntry>,
}

impl TeleportQueueStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&self, entry: TeleportQueueEntry) -> Option<TeleportQueueEntry> {
        self.entries.insert(entry.player(), entry)
    }

    pub fn remove(&self, id: PlayerId) -> Option<TeleportQueueEntry> {
        self.entries.remove(&id).map(|(_, entry)| entry)
    }

    /// Remove the entry only if it is due at `now`.
    ///
    /// A fresh entry inserted since the caller last looked is left alone.
    pub fn remove_if_due(&self, id: PlayerId, now: DateTime<Utc>) -> Option<TeleportQueueEntry> {
        self.entries
            .remove_if(&id, |_, entry| entry.is_due(now))
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Snapshot of the players with a pending entry.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read an entry without removing it.
    ///
    /// `f` runs under the shard lock and must not touch this store.
    pub fn with_entry<R>(&self, id: PlayerId, f: impl FnOnce(&TeleportQueueEntry) -> R) -> Option<R> {
        self.entries.get(&id).map(|entry| f(entry.value()))
    }
}

impl Default for TeleportQueueStore {
    fn default() -> Self {
        Self::new()
    }
}
