//! Teleport scheduler.
//!
//! Owns the pending queue and drives it from a once-per-second tick. Producer
//! calls are synchronous and never wait on the tick; world mutation is handed
//! to the `WorldExecutor`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use waystone_domain::PlayerId;
use waystone_shared::EffectKind;

use super::entry::TeleportQueueEntry;
use super::target::TeleportTarget;
use crate::infrastructure::config::{TeleportConfig, TICK_INTERVAL};
use crate::infrastructure::ports::{ClockPort, FeedbackPort, PlayerRegistry, WorldExecutor};
use crate::stores::{ProfileStore, TeleportQueueStore};

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Teleport scheduler has been shut down")]
    ShutDown,
    #[error("Teleport scheduler is already running")]
    AlreadyRunning,
}

/// What `enqueue` did with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The entry was already due and ran synchronously.
    Executed,
    /// The entry is pending. `superseded` is set when it replaced an earlier one.
    Queued { superseded: bool },
}

/// Counts from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub channeling: usize,
    pub executed: usize,
    pub dropped: usize,
}

/// Read-only view of a pending teleport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTeleport {
    pub player: PlayerId,
    pub target_text: String,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub remaining_seconds: u64,
}

pub struct TeleportScheduler {
    queue: TeleportQueueStore,
    players: Arc<dyn PlayerRegistry>,
    profiles: Arc<ProfileStore>,
    feedback: Arc<dyn FeedbackPort>,
    world: Arc<dyn WorldExecutor>,
    clock: Arc<dyn ClockPort>,
    config: TeleportConfig,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl TeleportScheduler {
    pub fn new(
        players: Arc<dyn PlayerRegistry>,
        profiles: Arc<ProfileStore>,
        feedback: Arc<dyn FeedbackPort>,
        world: Arc<dyn WorldExecutor>,
        clock: Arc<dyn ClockPort>,
        config: TeleportConfig,
    ) -> Self {
        Self {
            queue: TeleportQueueStore::new(),
            players,
            profiles,
            feedback,
            world,
            clock,
            config,
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    /// Default channeling delay.
    pub fn delay_duration(&self) -> Duration {
        Duration::seconds(self.config.wait_time.value())
    }

    /// Build an entry timed against this scheduler's clock.
    pub fn create_entry(
        &self,
        player: PlayerId,
        target: Box<dyn TeleportTarget>,
        delay: Option<Duration>,
    ) -> TeleportQueueEntry {
        TeleportQueueEntry::new(player, target, delay, self.clock.now())
    }

    /// Queue a teleport with the configured delay.
    pub fn queue_teleport(
        &self,
        player: PlayerId,
        target: Box<dyn TeleportTarget>,
    ) -> Result<EnqueueOutcome, SchedulerError> {
        self.queue_teleport_with_delay(player, target, Some(self.delay_duration()))
    }

    pub fn queue_teleport_with_delay(
        &self,
        player: PlayerId,
        target: Box<dyn TeleportTarget>,
        delay: Option<Duration>,
    ) -> Result<EnqueueOutcome, SchedulerError> {
        let entry = self.create_entry(player, target, delay);
        self.enqueue(entry)
    }

    /// Queue an entry, or run it now if it is already due.
    ///
    /// A pending entry for the same player is replaced without feedback.
    /// Presence is not checked here; the next tick drops entries of players
    /// who are no longer online.
    pub fn enqueue(&self, entry: TeleportQueueEntry) -> Result<EnqueueOutcome, SchedulerError> {
        self.ensure_running()?;

        let player = entry.player();
        let now = self.clock.now();
        if entry.is_due(now) {
            // Never touches the queue; a pending entry keeps channeling.
            self.execute(entry);
            return Ok(EnqueueOutcome::Executed);
        }

        tracing::debug!(
            player_id = %player,
            target = %entry.target_text(),
            remaining_seconds = entry.remaining_seconds(now),
            "Teleport queued"
        );
        let superseded = match self.queue.insert(entry) {
            Some(previous) => {
                tracing::debug!(
                    player_id = %player,
                    previous_target = %previous.target_text(),
                    "Pending teleport superseded"
                );
                true
            }
            None => false,
        };
        Ok(EnqueueOutcome::Queued { superseded })
    }

    /// Cancel a pending teleport and tell the player.
    ///
    /// Returns false, with no feedback, if nothing was pending.
    pub fn interrupt(&self, player: PlayerId) -> bool {
        match self.queue.remove(player) {
            Some(entry) => {
                tracing::info!(
                    player_id = %player,
                    target = %entry.target_text(),
                    "Teleport interrupted"
                );
                self.feedback.interrupted(player);
                true
            }
            None => false,
        }
    }

    /// Drop a pending teleport silently.
    pub fn clear(&self, player: PlayerId) -> bool {
        let cleared = self.queue.remove(player).is_some();
        if cleared {
            tracing::debug!(player_id = %player, "Pending teleport cleared");
        }
        cleared
    }

    pub fn is_pending(&self, player: PlayerId) -> bool {
        self.queue.contains(player)
    }

    pub fn remaining_seconds(&self, player: PlayerId) -> Option<u64> {
        let now = self.clock.now();
        self.queue
            .with_entry(player, |entry| entry.remaining_seconds(now))
    }

    pub fn target_text(&self, player: PlayerId) -> Option<String> {
        self.queue
            .with_entry(player, |entry| entry.target_text().to_string())
    }

    pub fn get(&self, player: PlayerId) -> Option<PendingTeleport> {
        let now = self.clock.now();
        self.queue.with_entry(player, |entry| PendingTeleport {
            player,
            target_text: entry.target_text().to_string(),
            created_at: entry.created_at(),
            deadline: entry.deadline(),
            remaining_seconds: entry.remaining_seconds(now),
        })
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Evaluate every pending teleport once.
    pub fn tick(&self) -> Result<TickReport, SchedulerError> {
        self.ensure_running()?;

        let now = self.clock.now();
        let mut report = TickReport::default();

        for player in self.queue.player_ids() {
            if !self.players.is_online(player) {
                if self.queue.remove(player).is_some() {
                    tracing::debug!(player_id = %player, "Dropped teleport of offline player");
                    report.dropped += 1;
                }
                continue;
            }

            if let Some(entry) = self.queue.remove_if_due(player, now) {
                self.execute(entry);
                report.executed += 1;
                continue;
            }

            // Gone since the snapshot: interrupted or cleared.
            let Some((remaining, target_text)) = self.queue.with_entry(player, |entry| {
                (entry.remaining_seconds(now), entry.target_text().to_string())
            }) else {
                continue;
            };

            self.feedback.channeling(player, remaining, &target_text);
            if self.config.effects_enabled {
                if let Some(position) = self.players.position(player) {
                    self.feedback.effect(EffectKind::Channeling, &position);
                }
            }
            report.channeling += 1;
        }

        if report != TickReport::default() {
            tracing::trace!(
                channeling = report.channeling,
                executed = report.executed,
                dropped = report.dropped,
                "Teleport tick"
            );
        }
        Ok(report)
    }

    /// Spawn the periodic tick. The first tick fires one interval from now.
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<()>, SchedulerError> {
        self.ensure_running()?;
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }

        let scheduler = Arc::clone(self);
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!("Teleport scheduler started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Teleport scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = scheduler.tick() {
                            tracing::debug!(error = %e, "Teleport tick skipped");
                        }
                    }
                }
            }
        });
        Ok(handle)
    }

    /// Stop ticking. Pending teleports are abandoned. Safe to call repeatedly.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!(pending = self.queue.len(), "Shutting down teleport scheduler");
            self.cancel.cancel();
        }
    }

    fn ensure_running(&self) -> Result<(), SchedulerError> {
        if self.cancel.is_cancelled() {
            Err(SchedulerError::ShutDown)
        } else {
            Ok(())
        }
    }

    fn execute(&self, entry: TeleportQueueEntry) {
        let player = entry.player();

        match self.players.position(player) {
            Some(current) => {
                if !self.profiles.set_last_location(player, current) {
                    tracing::debug!(player_id = %player, "Profile unloaded, last location not recorded");
                }
            }
            None => tracing::warn!(
                player_id = %player,
                "No known position, last location not recorded"
            ),
        }

        let Some(destination) = entry.target().prepare() else {
            tracing::info!(
                player_id = %player,
                target = %entry.target_text(),
                "Teleport target not available"
            );
            self.feedback.not_available(player, entry.target_text());
            return;
        };

        tracing::info!(
            player_id = %player,
            target = %entry.target_text(),
            destination = %destination,
            "Teleporting player"
        );
        self.feedback.teleported(player, entry.target_text());

        let players = Arc::clone(&self.players);
        let feedback = Arc::clone(&self.feedback);
        let effects_enabled = self.config.effects_enabled;
        self.world.submit(Box::new(move || {
            if !players.set_position(player, destination.clone()) {
                tracing::debug!(player_id = %player, "Player left before relocation");
                return;
            }
            feedback.relocated(player, &destination);
            if effects_enabled {
                feedback.effect(EffectKind::Arrival, &destination);
            }
        }));
    }
}
