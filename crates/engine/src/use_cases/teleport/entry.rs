//! A single pending teleport.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use waystone_domain::PlayerId;

use super::target::TeleportTarget;

/// A teleport waiting for its channeling delay to elapse.
///
/// Immutable once built: the deadline is fixed at creation and every timing
/// value is derived from it and the `now` passed in by the caller.
pub struct TeleportQueueEntry {
    player: PlayerId,
    target: Box<dyn TeleportTarget>,
    target_text: String,
    created_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

impl TeleportQueueEntry {
    /// Build an entry due `delay` after `now`.
    ///
    /// `None`, zero and negative delays produce an entry that is already due.
    pub fn new(
        player: PlayerId,
        target: Box<dyn TeleportTarget>,
        delay: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Self {
        let deadline = match delay {
            Some(delay) if delay > Duration::zero() => {
                now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC)
            }
            _ => now,
        };
        let target_text = target.describe();
        Self {
            player,
            target,
            target_text,
            created_at: now,
            deadline,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn target(&self) -> &dyn TeleportTarget {
        self.target.as_ref()
    }

    /// Target description captured when the entry was created.
    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }

    /// `max(0, deadline - now)`.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.deadline - now).max(Duration::zero())
    }

    /// Remaining time rounded up to whole seconds.
    ///
    /// While the entry is not due this is at least 1.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.remaining(now);
        let whole = remaining.num_seconds();
        let rounded = if remaining > Duration::seconds(whole) {
            whole + 1
        } else {
            whole
        };
        rounded.unsigned_abs()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }
}

impl fmt::Debug for TeleportQueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeleportQueueEntry")
            .field("player", &self.player)
            .field("target", &self.target_text)
            .field("created_at", &self.created_at)
            .field("deadline", &self.deadline)
            .finish()
    }
}
