//! Waystone domain layer.
//!
//! Pure data types shared by the engine: player identity, positions, player
//! profiles, warps and the validated configuration values they depend on.
//! Nothing in here performs I/O or knows about time.

extern crate self as waystone_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{PlayerProfile, Warp};
pub use error::DomainError;
pub use ids::PlayerId;
pub use value_objects::{BlockPos, Position, WaitTimeSeconds};
