//! Application state and composition.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::infrastructure::{
    config::AppConfig,
    feedback::MessageFeedback,
    online_players::OnlinePlayers,
    ports::{ClockPort, FeedbackPort, ProfileRepo, WorldExecutor},
    warps::WarpStore,
    world_executor::TokioWorldExecutor,
};
use crate::stores::ProfileStore;
use crate::use_cases::{PlayerEvents, SchedulerError, TeleportScheduler};

/// Main application state.
///
/// Owns the stores and adapters and wires them into the use cases.
pub struct App {
    pub config: AppConfig,
    pub players: Arc<OnlinePlayers>,
    pub profiles: Arc<ProfileStore>,
    pub warps: Arc<WarpStore>,
    pub scheduler: Arc<TeleportScheduler>,
    pub events: PlayerEvents,
    world: Arc<TokioWorldExecutor>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl App {
    /// Build the application. Spawns the world executor, so this must run
    /// inside a tokio runtime.
    pub fn new(config: AppConfig, profile_repo: Arc<dyn ProfileRepo>, clock: Arc<dyn ClockPort>) -> Self {
        let players = Arc::new(OnlinePlayers::new());
        let profiles = Arc::new(ProfileStore::new());
        let warps = Arc::new(WarpStore::new());
        let (world, world_task) = TokioWorldExecutor::spawn();
        let world = Arc::new(world);

        let feedback: Arc<dyn FeedbackPort> =
            Arc::new(MessageFeedback::new(players.clone(), config.feedback.clone()));

        let scheduler = Arc::new(TeleportScheduler::new(
            players.clone(),
            profiles.clone(),
            feedback.clone(),
            world.clone(),
            clock,
            config.teleport.clone(),
        ));

        let events = PlayerEvents::new(
            scheduler.clone(),
            profiles.clone(),
            profile_repo,
            players.clone(),
            feedback,
        );

        Self {
            config,
            players,
            profiles,
            warps,
            scheduler,
            events,
            world,
            tasks: Mutex::new(vec![world_task]),
        }
    }

    /// The world-mutation context. Hosts move players through this.
    pub fn world(&self) -> Arc<dyn WorldExecutor> {
        self.world.clone()
    }

    /// Start the periodic teleport tick.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let handle = self.scheduler.start()?;
        self.tasks.lock().await.push(handle);
        tracing::info!(
            wait_time = %self.config.teleport.wait_time,
            effects = self.config.teleport.effects_enabled,
            "Waystone started"
        );
        Ok(())
    }

    /// Stop the tick and the world executor and wait for both.
    ///
    /// Pending teleports are abandoned. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown();
        self.world.shutdown();

        let tasks: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Background task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{MockProfileRepo, PlayerRegistry};
    use crate::use_cases::teleport::LocationTarget;
    use crate::use_cases::EnqueueOutcome;
    use waystone_domain::{PlayerId, PlayerProfile, Position};
    use waystone_shared::ServerMessage;

    fn test_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "TELEPORT_WAIT_TIME" => Some("0".to_string()),
            "TELEPORT_TITLES" => Some("false".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn instant_teleport_moves_player_through_world_executor() {
        let mut repo = MockProfileRepo::new();
        repo.expect_load().returning(|_| Ok(Some(PlayerProfile::new())));
        let app = App::new(test_config(), Arc::new(repo), Arc::new(SystemClock::new()));

        let id = PlayerId::from_name("u1");
        let mut rx = app.players.connect(id, "u1", Position::new("world", 0.0, 64.0, 0.0));
        app.events.on_join(id).await.unwrap();

        let target = LocationTarget::new(Position::new("world", 10.0, 70.0, 10.0)).labeled("spawn");
        let outcome = app.scheduler.queue_teleport(id, Box::new(target)).unwrap();
        assert_eq!(outcome, EnqueueOutcome::Executed);

        assert_eq!(
            rx.recv().await,
            Some(ServerMessage::Teleported {
                target: "spawn".to_string()
            })
        );
        loop {
            match rx.recv().await {
                Some(ServerMessage::PositionChanged { .. }) => break,
                Some(_) => continue,
                None => panic!("channel closed before relocation"),
            }
        }
        assert_eq!(
            app.players.position(id),
            Some(Position::new("world", 10.0, 70.0, 10.0))
        );
        assert_eq!(
            app.profiles.last_location(id),
            Some(Position::new("world", 0.0, 64.0, 0.0))
        );

        app.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_twice_and_start_after_shutdown() {
        let app = App::new(
            test_config(),
            Arc::new(MockProfileRepo::new()),
            Arc::new(SystemClock::new()),
        );
        app.start().await.unwrap();

        app.shutdown().await;
        app.shutdown().await;

        assert_eq!(app.start().await, Err(SchedulerError::ShutDown));
    }
}
