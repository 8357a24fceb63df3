//! Player lifecycle hooks.
//!
//! The host calls these as players join, leave, die, take damage or move.
//! They keep the profile cache and the teleport queue in step with presence.

use std::sync::Arc;

use waystone_domain::{PlayerId, PlayerProfile, Position};

use crate::infrastructure::ports::{FeedbackPort, PlayerRegistry, ProfileRepo, RepoError};
use crate::stores::ProfileStore;
use crate::use_cases::teleport::TeleportScheduler;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Profile storage failed: {0}")]
    Repo(#[from] RepoError),
}

pub struct PlayerEvents {
    scheduler: Arc<TeleportScheduler>,
    profiles: Arc<ProfileStore>,
    repo: Arc<dyn ProfileRepo>,
    players: Arc<dyn PlayerRegistry>,
    feedback: Arc<dyn FeedbackPort>,
}

impl PlayerEvents {
    pub fn new(
        scheduler: Arc<TeleportScheduler>,
        profiles: Arc<ProfileStore>,
        repo: Arc<dyn ProfileRepo>,
        players: Arc<dyn PlayerRegistry>,
        feedback: Arc<dyn FeedbackPort>,
    ) -> Self {
        Self {
            scheduler,
            profiles,
            repo,
            players,
            feedback,
        }
    }

    /// Load the player's stored profile into the cache.
    ///
    /// A player seen for the first time gets an empty profile.
    pub async fn on_join(&self, id: PlayerId) -> Result<(), LifecycleError> {
        let profile = self.repo.load(id).await?;
        let known = profile.is_some();
        self.profiles.insert(id, profile.unwrap_or_default());
        tracing::debug!(player_id = %id, known, "Profile loaded");
        Ok(())
    }

    /// Drop any pending teleport and write the profile back.
    ///
    /// The profile leaves the cache even when saving fails.
    pub async fn on_quit(&self, id: PlayerId) -> Result<(), LifecycleError> {
        self.scheduler.clear(id);

        let Some(profile) = self.profiles.remove(id) else {
            tracing::debug!(player_id = %id, "No profile loaded at quit");
            return Ok(());
        };
        if let Err(e) = self.repo.save(id, &profile).await {
            tracing::error!(player_id = %id, error = %e, "Failed to save profile");
            return Err(e.into());
        }
        tracing::debug!(player_id = %id, "Profile saved");
        Ok(())
    }

    /// Remember where the player died.
    ///
    /// Gated by `TeleportConfig::back_on_death` (on by default); with the
    /// switch off nothing is recorded. Returns whether a location was recorded.
    /// A pending teleport is left as is.
    pub fn on_death(&self, id: PlayerId) -> bool {
        if !self.scheduler.config().back_on_death {
            return false;
        }
        let Some(position) = self.players.position(id) else {
            tracing::warn!(player_id = %id, "Death without a known position");
            return false;
        };
        if !self.profiles.set_last_location(id, position) {
            tracing::debug!(player_id = %id, "Death of player without a loaded profile");
            return false;
        }
        self.feedback.death_location_recorded(id);
        true
    }

    /// Any damage interrupts channeling.
    pub fn on_damaged(&self, id: PlayerId) -> bool {
        self.scheduler.interrupt(id)
    }

    /// Moving to another block interrupts channeling. Looking around does not.
    pub fn on_moved(&self, id: PlayerId, from: &Position, to: &Position) -> bool {
        if from.same_block(to) {
            return false;
        }
        self.scheduler.interrupt(id)
    }

    /// Current cached profile, if the player is online.
    pub fn profile(&self, id: PlayerId) -> Option<PlayerProfile> {
        self.profiles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::config::TeleportConfig;
    use crate::infrastructure::online_players::OnlinePlayers;
    use crate::infrastructure::ports::MockProfileRepo;
    use crate::use_cases::teleport::test_support::{
        FeedbackEvent, InlineWorldExecutor, RecordingFeedback,
    };
    use crate::use_cases::teleport::LocationTarget;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;

    struct Harness {
        events: PlayerEvents,
        scheduler: Arc<TeleportScheduler>,
        players: Arc<OnlinePlayers>,
        profiles: Arc<ProfileStore>,
        feedback: Arc<RecordingFeedback>,
    }

    fn pos(x: f64) -> Position {
        Position::new("world", x, 64.0, 0.0)
    }

    fn harness(repo: MockProfileRepo, config: TeleportConfig) -> Harness {
        let players = Arc::new(OnlinePlayers::new());
        let profiles = Arc::new(ProfileStore::new());
        let feedback = Arc::new(RecordingFeedback::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        ));
        let scheduler = Arc::new(TeleportScheduler::new(
            players.clone(),
            profiles.clone(),
            feedback.clone(),
            Arc::new(InlineWorldExecutor),
            clock,
            config,
        ));
        let events = PlayerEvents::new(
            scheduler.clone(),
            profiles.clone(),
            Arc::new(repo),
            players.clone(),
            feedback.clone(),
        );
        Harness {
            events,
            scheduler,
            players,
            profiles,
            feedback,
        }
    }

    fn quiet_config() -> TeleportConfig {
        TeleportConfig {
            effects_enabled: false,
            ..TeleportConfig::default()
        }
    }

    #[tokio::test]
    async fn join_loads_stored_profile() {
        let id = PlayerId::new();
        let mut stored = PlayerProfile::new();
        stored.set_last_location(pos(4.0));
        let returned = stored.clone();

        let mut repo = MockProfileRepo::new();
        repo.expect_load()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let h = harness(repo, quiet_config());
        h.events.on_join(id).await.unwrap();

        assert_eq!(h.events.profile(id), Some(stored));
    }

    #[tokio::test]
    async fn join_creates_empty_profile_for_new_player() {
        let mut repo = MockProfileRepo::new();
        repo.expect_load().returning(|_| Ok(None));

        let h = harness(repo, quiet_config());
        let id = PlayerId::new();
        h.events.on_join(id).await.unwrap();

        assert_eq!(h.profiles.get(id), Some(PlayerProfile::new()));
    }

    #[tokio::test]
    async fn join_surfaces_repo_errors() {
        let mut repo = MockProfileRepo::new();
        repo.expect_load()
            .returning(|_| Err(RepoError::database("load", "disk full")));

        let h = harness(repo, quiet_config());
        let id = PlayerId::new();

        assert!(matches!(
            h.events.on_join(id).await,
            Err(LifecycleError::Repo(_))
        ));
        assert!(!h.profiles.is_loaded(id));
    }

    #[tokio::test]
    async fn quit_clears_teleport_and_saves_profile() {
        let id = PlayerId::new();
        let mut repo = MockProfileRepo::new();
        repo.expect_save()
            .withf(move |saved_id, profile| *saved_id == id && profile.home("base").is_some())
            .times(1)
            .returning(|_, _| Ok(()));

        let h = harness(repo, quiet_config());
        let _rx = h.players.connect(id, "u1", pos(0.0));
        h.profiles.set_home(id, "base", pos(1.0)).unwrap();
        h.scheduler
            .queue_teleport(id, Box::new(LocationTarget::new(pos(9.0))))
            .unwrap();

        h.events.on_quit(id).await.unwrap();

        assert!(!h.scheduler.is_pending(id));
        assert!(!h.profiles.is_loaded(id));
        assert!(h.feedback.events().is_empty());
    }

    #[tokio::test]
    async fn quit_without_profile_skips_save() {
        let mut repo = MockProfileRepo::new();
        repo.expect_save().never();

        let h = harness(repo, quiet_config());
        h.events.on_quit(PlayerId::new()).await.unwrap();
    }

    #[test]
    fn death_records_last_location() {
        let h = harness(MockProfileRepo::new(), quiet_config());
        let id = PlayerId::new();
        let _rx = h.players.connect(id, "u1", pos(3.0));
        h.profiles.insert(id, PlayerProfile::new());
        h.scheduler
            .queue_teleport(id, Box::new(LocationTarget::new(pos(9.0))))
            .unwrap();

        assert!(h.events.on_death(id));

        assert_eq!(h.profiles.last_location(id), Some(pos(3.0)));
        assert!(h.scheduler.is_pending(id));
        assert_eq!(
            h.feedback.events(),
            vec![FeedbackEvent::DeathLocationRecorded(id)]
        );
    }

    #[test]
    fn death_ignored_when_disabled() {
        let h = harness(
            MockProfileRepo::new(),
            TeleportConfig {
                back_on_death: false,
                ..quiet_config()
            },
        );
        let id = PlayerId::new();
        let _rx = h.players.connect(id, "u1", pos(3.0));
        h.profiles.insert(id, PlayerProfile::new());

        assert!(!h.events.on_death(id));
        assert_eq!(h.profiles.last_location(id), None);
        assert!(h.feedback.events().is_empty());
    }

    #[test]
    fn damage_interrupts_pending_teleport() {
        let h = harness(MockProfileRepo::new(), quiet_config());
        let id = PlayerId::new();
        let _rx = h.players.connect(id, "u1", pos(0.0));

        assert!(!h.events.on_damaged(id));
        h.scheduler
            .queue_teleport(id, Box::new(LocationTarget::new(pos(9.0))))
            .unwrap();
        assert!(h.events.on_damaged(id));

        assert_eq!(h.feedback.events(), vec![FeedbackEvent::Interrupted(id)]);
    }

    #[test]
    fn movement_within_block_does_not_interrupt() {
        let h = harness(MockProfileRepo::new(), quiet_config());
        let id = PlayerId::new();
        let _rx = h.players.connect(id, "u1", pos(0.2));
        h.scheduler
            .queue_teleport(id, Box::new(LocationTarget::new(pos(9.0))))
            .unwrap();

        let turned = pos(0.7).with_facing(90.0, 10.0);
        assert!(!h.events.on_moved(id, &pos(0.2), &turned));
        assert!(h.scheduler.is_pending(id));

        assert!(h.events.on_moved(id, &turned, &pos(1.5)));
        assert!(!h.scheduler.is_pending(id));
        assert_eq!(h.feedback.events(), vec![FeedbackEvent::Interrupted(id)]);
    }
}
