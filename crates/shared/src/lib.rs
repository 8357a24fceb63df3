//! Waystone Protocol - messages the engine sends to connected players
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and the domain vocabulary
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs on the wire** - positions are flattened into DTOs

pub mod messages;

pub use messages::{EffectKind, PositionData, ServerMessage};
