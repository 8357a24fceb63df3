//! Teleport use cases: delayed, interruptible teleports.

mod entry;
mod scheduler;
mod target;

#[cfg(test)]
pub(crate) mod test_support;

pub use entry::TeleportQueueEntry;
pub use scheduler::{
    EnqueueOutcome, PendingTeleport, SchedulerError, TeleportScheduler, TickReport,
};
pub use target::{
    HomeTarget, LastLocationTarget, LocationTarget, PlayerTarget, TeleportTarget, WarpTarget,
};

#[cfg(test)]
pub use target::MockTeleportTarget;
