//! Online player tracking.
//!
//! Tracks connected players, their positions, and their outbound message
//! channels. This is the in-process stand-in for the game server's player list.

use dashmap::DashMap;
use tokio::sync::mpsc;
use waystone_domain::{PlayerId, Position};
use waystone_shared::ServerMessage;

use crate::infrastructure::ports::PlayerRegistry;

/// Outbound buffer per player; messages beyond this are dropped with a warning.
const OUTBOUND_BUFFER: usize = 64;

/// Information about an online player.
#[derive(Debug, Clone)]
struct OnlinePlayer {
    name: String,
    position: Position,
    sender: mpsc::Sender<ServerMessage>,
}

/// Manages all online players.
pub struct OnlinePlayers {
    players: DashMap<PlayerId, OnlinePlayer>,
}

impl OnlinePlayers {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
        }
    }

    /// Register a player as online at `position`.
    ///
    /// Returns the receiving end of the player's message channel. A second
    /// connect for the same id replaces the first session.
    pub fn connect(
        &self,
        id: PlayerId,
        name: impl Into<String>,
        position: Position,
    ) -> mpsc::Receiver<ServerMessage> {
        let (sender, receiver) = mpsc::channel(OUTBOUND_BUFFER);
        let name = name.into();
        tracing::debug!(player_id = %id, name = %name, "Player connected");
        self.players.insert(
            id,
            OnlinePlayer {
                name,
                position,
                sender,
            },
        );
        receiver
    }

    /// Remove a player. Returns false if they were not online.
    pub fn disconnect(&self, id: PlayerId) -> bool {
        let removed = self.players.remove(&id).is_some();
        if removed {
            tracing::debug!(player_id = %id, "Player disconnected");
        }
        removed
    }

    pub fn online_count(&self) -> usize {
        self.players.len()
    }

    /// Snapshot of `(id, name)` for every online player.
    pub fn list(&self) -> Vec<(PlayerId, String)> {
        self.players
            .iter()
            .map(|entry| (*entry.key(), entry.value().name.clone()))
            .collect()
    }
}

impl Default for OnlinePlayers {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRegistry for OnlinePlayers {
    fn is_online(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    fn position(&self, id: PlayerId) -> Option<Position> {
        self.players.get(&id).map(|p| p.position.clone())
    }

    fn set_position(&self, id: PlayerId, position: Position) -> bool {
        match self.players.get_mut(&id) {
            Some(mut player) => {
                player.position = position;
                true
            }
            None => false,
        }
    }

    fn name(&self, id: PlayerId) -> Option<String> {
        self.players.get(&id).map(|p| p.name.clone())
    }

    fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|entry| entry.value().name.eq_ignore_ascii_case(name))
            .map(|entry| *entry.key())
    }

    fn players_in_world(&self, world: &str) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|entry| entry.value().position.world == world)
            .map(|entry| *entry.key())
            .collect()
    }

    fn send(&self, id: PlayerId, message: ServerMessage) {
        let Some(sender) = self.players.get(&id).map(|p| p.sender.clone()) else {
            tracing::debug!(player_id = %id, "Dropping message for offline player");
            return;
        };
        if let Err(e) = sender.try_send(message) {
            tracing::warn!(player_id = %id, error = %e, "Failed to send message to player");
        }
    }
}
