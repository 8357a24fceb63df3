//! Server → player message types.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown variants deserialize to `Unknown` for forward compatibility

use serde::{Deserialize, Serialize};
use waystone_domain::Position;

/// Visual effects the engine can ask clients to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Swirl shown around a channeling player every tick.
    Channeling,
    /// One-shot burst at a teleport destination.
    Arrival,
    #[serde(other)]
    Unknown,
}

/// Wire form of a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl From<&Position> for PositionData {
    fn from(pos: &Position) -> Self {
        Self {
            world: pos.world.clone(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
            yaw: pos.yaw,
            pitch: pos.pitch,
        }
    }
}

/// Messages from the engine to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Channeling progress for a queued teleport
    TeleportChanneling {
        remaining_seconds: u64,
        target: String,
    },
    /// A queued teleport was cancelled before it completed
    TeleportInterrupted,
    /// Teleport accepted; the move follows on the world thread
    Teleported { target: String },
    /// The destination could not be resolved at execution time
    TeleportNotAvailable { target: String },
    /// The player now stands at `position`
    PositionChanged { position: PositionData },
    /// The death location was saved as the "back" location
    DeathLocationRecorded,
    /// On-screen title
    Title { title: String, subtitle: String },
    /// Sound cue, keyed by the client's sound registry name
    PlaySound { sound: String },
    /// Visual effect at a position
    SpawnEffect {
        effect: EffectKind,
        position: PositionData,
        amount: u32,
        offset_y: f32,
    },
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}
