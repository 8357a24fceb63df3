//! Value objects - Immutable objects defined by their attributes

mod position;
mod wait_time;

pub use position::{BlockPos, Position};
pub use wait_time::WaitTimeSeconds;
