//! Per-player profile data that outlives a session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DomainError, Position};

/// Persistent state kept for each player.
///
/// `last_location` is what "back" teleports return to. It is written before
/// every executed teleport and, optionally, on death.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_location: Option<Position>,
    #[serde(default)]
    pub homes: BTreeMap<String, Position>,
}

impl PlayerProfile {
    pub const MAX_HOME_NAME_LEN: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_last_location(&mut self, position: Position) {
        self.last_location = Some(position);
    }

    pub fn home(&self, name: &str) -> Option<&Position> {
        self.homes.get(&normalize_home_name(name))
    }

    /// Set or overwrite a named home.
    ///
    /// Returns the previous position for that name, if any.
    pub fn set_home(
        &mut self,
        name: &str,
        position: Position,
    ) -> Result<Option<Position>, DomainError> {
        let name = normalize_home_name(name);
        if name.is_empty() {
            return Err(DomainError::validation("Home name cannot be empty"));
        }
        if name.len() > Self::MAX_HOME_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Home name must be at most {} characters",
                Self::MAX_HOME_NAME_LEN
            )));
        }
        Ok(self.homes.insert(name, position))
    }

    pub fn remove_home(&mut self, name: &str) -> Option<Position> {
        self.homes.remove(&normalize_home_name(name))
    }
}

fn normalize_home_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
