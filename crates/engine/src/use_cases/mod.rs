//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.

pub mod lifecycle;
pub mod teleport;

pub use lifecycle::{LifecycleError, PlayerEvents};
pub use teleport::{EnqueueOutcome, SchedulerError, TeleportScheduler, TickReport};
