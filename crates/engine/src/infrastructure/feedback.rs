//! Feedback rendered as player messages.
//!
//! Every teleport event becomes a structured `ServerMessage`. Titles and sound
//! cues are layered on top according to `FeedbackConfig`.

use std::sync::Arc;

use waystone_domain::{PlayerId, Position};
use waystone_shared::{EffectKind, PositionData, ServerMessage};

use crate::infrastructure::config::FeedbackConfig;
use crate::infrastructure::ports::{FeedbackPort, PlayerRegistry};

/// Particle count and vertical offset per effect kind.
fn effect_shape(kind: EffectKind) -> (u32, f32) {
    match kind {
        EffectKind::Channeling => (100, 1.0),
        EffectKind::Arrival | EffectKind::Unknown => (1, 1.0),
    }
}

/// `FeedbackPort` that sends messages through the player registry.
pub struct MessageFeedback {
    players: Arc<dyn PlayerRegistry>,
    config: FeedbackConfig,
}

impl MessageFeedback {
    pub fn new(players: Arc<dyn PlayerRegistry>, config: FeedbackConfig) -> Self {
        Self { players, config }
    }

    fn play(&self, id: PlayerId, sound: &Option<String>) {
        if let Some(sound) = sound {
            self.players.send(
                id,
                ServerMessage::PlaySound {
                    sound: sound.clone(),
                },
            );
        }
    }

    fn title(&self, id: PlayerId, title: String, subtitle: String) {
        if self.config.titles_enabled {
            self.players
                .send(id, ServerMessage::Title { title, subtitle });
        }
    }
}

impl FeedbackPort for MessageFeedback {
    fn channeling(&self, id: PlayerId, remaining_seconds: u64, target: &str) {
        self.players.send(
            id,
            ServerMessage::TeleportChanneling {
                remaining_seconds,
                target: target.to_string(),
            },
        );
        self.play(id, &self.config.sounds.channeling);
        self.title(
            id,
            format!("{remaining_seconds}"),
            format!("Teleporting to {target}"),
        );
    }

    fn interrupted(&self, id: PlayerId) {
        self.players.send(id, ServerMessage::TeleportInterrupted);
        self.play(id, &self.config.sounds.interrupted);
    }

    fn teleported(&self, id: PlayerId, target: &str) {
        self.players.send(
            id,
            ServerMessage::Teleported {
                target: target.to_string(),
            },
        );
        self.title(id, "Teleported".to_string(), target.to_string());
    }

    fn not_available(&self, id: PlayerId, target: &str) {
        self.players.send(
            id,
            ServerMessage::TeleportNotAvailable {
                target: target.to_string(),
            },
        );
        self.play(id, &self.config.sounds.failed);
    }

    fn relocated(&self, id: PlayerId, position: &Position) {
        self.players.send(
            id,
            ServerMessage::PositionChanged {
                position: PositionData::from(position),
            },
        );
        self.play(id, &self.config.sounds.teleported);
    }

    fn death_location_recorded(&self, id: PlayerId) {
        self.players.send(id, ServerMessage::DeathLocationRecorded);
    }

    fn effect(&self, kind: EffectKind, at: &Position) {
        let (amount, offset_y) = effect_shape(kind);
        let message = ServerMessage::SpawnEffect {
            effect: kind,
            position: PositionData::from(at),
            amount,
            offset_y,
        };
        for viewer in self.players.players_in_world(&at.world) {
            self.players.send(viewer, message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SoundCues;
    use crate::infrastructure::ports::MockPlayerRegistry;
    use std::sync::Mutex;

    /// Registry mock that records every message sent.
    fn recording_registry(sent: Arc<Mutex<Vec<(PlayerId, ServerMessage)>>>) -> MockPlayerRegistry {
        let mut players = MockPlayerRegistry::new();
        players.expect_send().returning(move |id, msg| {
            sent.lock().unwrap().push((id, msg));
        });
        players
    }

    fn silent_config() -> FeedbackConfig {
        FeedbackConfig {
            titles_enabled: false,
            sounds: SoundCues {
                channeling: None,
                teleported: None,
                interrupted: None,
                failed: None,
            },
        }
    }

    #[test]
    fn channeling_sends_progress_title_and_sound() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let feedback = MessageFeedback::new(
            Arc::new(recording_registry(sent.clone())),
            FeedbackConfig::default(),
        );
        let id = PlayerId::new();

        feedback.channeling(id, 2, "home");

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(
            sent[0].1,
            ServerMessage::TeleportChanneling {
                remaining_seconds: 2,
                target: "home".to_string()
            }
        );
        assert!(matches!(sent[1].1, ServerMessage::PlaySound { .. }));
        assert_eq!(
            sent[2].1,
            ServerMessage::Title {
                title: "2".to_string(),
                subtitle: "Teleporting to home".to_string()
            }
        );
    }

    #[test]
    fn disabled_titles_and_sounds_send_only_the_event() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let feedback =
            MessageFeedback::new(Arc::new(recording_registry(sent.clone())), silent_config());
        let id = PlayerId::new();

        feedback.channeling(id, 1, "spawn");
        feedback.teleported(id, "spawn");
        feedback.interrupted(id);
        feedback.not_available(id, "spawn");

        let kinds: Vec<ServerMessage> = sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect();
        assert_eq!(kinds.len(), 4);
        assert_eq!(kinds[2], ServerMessage::TeleportInterrupted);
    }

    #[test]
    fn not_available_plays_failure_cue() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let feedback = MessageFeedback::new(
            Arc::new(recording_registry(sent.clone())),
            FeedbackConfig::default(),
        );

        feedback.not_available(PlayerId::new(), "warp shop");

        let sent = sent.lock().unwrap();
        assert_eq!(
            sent[1].1,
            ServerMessage::PlaySound {
                sound: "entity.villager.no".to_string()
            }
        );
    }

    #[test]
    fn effect_goes_to_everyone_in_the_world() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut players = recording_registry(sent.clone());
        let viewers = vec![PlayerId::new(), PlayerId::new()];
        let returned = viewers.clone();
        players
            .expect_players_in_world()
            .withf(|world| world == "world")
            .returning(move |_| returned.clone());
        let feedback = MessageFeedback::new(Arc::new(players), FeedbackConfig::default());

        feedback.effect(EffectKind::Channeling, &Position::new("world", 0.0, 64.0, 0.0));

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, viewers[0]);
        assert!(matches!(
            sent[1].1,
            ServerMessage::SpawnEffect {
                effect: EffectKind::Channeling,
                amount: 100,
                ..
            }
        ));
    }
}
