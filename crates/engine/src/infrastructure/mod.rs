//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod feedback;
pub mod online_players;
pub mod persistence;
pub mod ports;
pub mod warps;
pub mod world_executor;
