//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use waystone_domain::WaitTimeSeconds;

/// Fixed cadence of the teleport tick. Not tunable at runtime.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database path for player profiles
    pub profile_db: String,

    /// Teleport behaviour
    pub teleport: TeleportConfig,

    /// How feedback is rendered to players
    pub feedback: FeedbackConfig,
}

/// Teleport scheduling configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportConfig {
    /// Delay applied when a request does not carry its own
    pub wait_time: WaitTimeSeconds,
    /// Channeling and arrival particle effects
    pub effects_enabled: bool,
    /// Record the death location as the "back" location
    pub back_on_death: bool,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            wait_time: WaitTimeSeconds::default(),
            effects_enabled: true,
            back_on_death: true,
        }
    }
}

/// Player feedback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackConfig {
    /// Show on-screen titles for channeling and arrival
    pub titles_enabled: bool,
    pub sounds: SoundCues,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            titles_enabled: true,
            sounds: SoundCues::default(),
        }
    }
}

/// Sound played for each teleport event. `None` disables the cue.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCues {
    pub channeling: Option<String>,
    pub teleported: Option<String>,
    pub interrupted: Option<String>,
    pub failed: Option<String>,
}

impl Default for SoundCues {
    fn default() -> Self {
        Self {
            channeling: Some("block.note_block.hat".to_string()),
            teleported: Some("entity.enderman.teleport".to_string()),
            interrupted: Some("block.note_block.bass".to_string()),
            failed: Some("entity.villager.no".to_string()),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let teleport_defaults = TeleportConfig::default();
        let feedback_defaults = FeedbackConfig::default();

        let wait_time = match lookup("TELEPORT_WAIT_TIME") {
            Some(raw) => raw
                .parse::<WaitTimeSeconds>()
                .context("TELEPORT_WAIT_TIME must be a whole number of seconds between 0 and 3600")?,
            None => teleport_defaults.wait_time,
        };

        Ok(Self {
            profile_db: lookup("PROFILE_DB").unwrap_or_else(|| "./data/profiles.db".to_string()),

            teleport: TeleportConfig {
                wait_time,
                effects_enabled: flag(
                    &lookup,
                    "TELEPORT_EFFECTS",
                    teleport_defaults.effects_enabled,
                )?,
                back_on_death: flag(&lookup, "BACK_ON_DEATH", teleport_defaults.back_on_death)?,
            },

            feedback: FeedbackConfig {
                titles_enabled: flag(
                    &lookup,
                    "TELEPORT_TITLES",
                    feedback_defaults.titles_enabled,
                )?,
                sounds: SoundCues {
                    channeling: sound(
                        &lookup,
                        "TELEPORT_SOUND_CHANNELING",
                        feedback_defaults.sounds.channeling,
                    ),
                    teleported: sound(
                        &lookup,
                        "TELEPORT_SOUND_TELEPORTED",
                        feedback_defaults.sounds.teleported,
                    ),
                    interrupted: sound(
                        &lookup,
                        "TELEPORT_SOUND_INTERRUPTED",
                        feedback_defaults.sounds.interrupted,
                    ),
                    failed: sound(
                        &lookup,
                        "TELEPORT_SOUND_FAILED",
                        feedback_defaults.sounds.failed,
                    ),
                },
            },
        })
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got {other:?}"),
    }
}

/// An empty value disables the cue.
fn sound(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Option<String>,
) -> Option<String> {
    match lookup(key) {
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => Some(raw.trim().to_string()),
        None => default,
    }
}
