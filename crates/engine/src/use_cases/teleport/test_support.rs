//! Test doubles for the teleport scheduler.

use std::sync::Mutex;

use waystone_domain::{PlayerId, Position};
use waystone_shared::EffectKind;

use crate::infrastructure::ports::{FeedbackPort, WorldExecutor, WorldTask};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    Channeling(PlayerId, u64, String),
    Interrupted(PlayerId),
    Teleported(PlayerId, String),
    NotAvailable(PlayerId, String),
    Relocated(PlayerId, Position),
    DeathLocationRecorded(PlayerId),
    Effect(EffectKind, Position),
}

/// Records every feedback call in order.
#[derive(Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().expect("feedback lock").clone()
    }

    fn push(&self, event: FeedbackEvent) {
        self.events.lock().expect("feedback lock").push(event);
    }
}

impl FeedbackPort for RecordingFeedback {
    fn channeling(&self, id: PlayerId, remaining_seconds: u64, target: &str) {
        self.push(FeedbackEvent::Channeling(id, remaining_seconds, target.to_string()));
    }

    fn interrupted(&self, id: PlayerId) {
        self.push(FeedbackEvent::Interrupted(id));
    }

    fn teleported(&self, id: PlayerId, target: &str) {
        self.push(FeedbackEvent::Teleported(id, target.to_string()));
    }

    fn not_available(&self, id: PlayerId, target: &str) {
        self.push(FeedbackEvent::NotAvailable(id, target.to_string()));
    }

    fn relocated(&self, id: PlayerId, position: &Position) {
        self.push(FeedbackEvent::Relocated(id, position.clone()));
    }

    fn death_location_recorded(&self, id: PlayerId) {
        self.push(FeedbackEvent::DeathLocationRecorded(id));
    }

    fn effect(&self, kind: EffectKind, at: &Position) {
        self.push(FeedbackEvent::Effect(kind, at.clone()));
    }
}

/// Runs world tasks on the submitting thread.
pub struct InlineWorldExecutor;

impl WorldExecutor for InlineWorldExecutor {
    fn submit(&self, task: WorldTask) {
        task();
    }
}
