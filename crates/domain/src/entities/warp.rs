//! Named server-wide teleport destinations.

use serde::{Deserialize, Serialize};

use crate::{DomainError, PlayerId, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warp {
    name: String,
    position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<PlayerId>,
}

impl Warp {
    pub const MAX_NAME_LEN: usize = 32;

    pub fn new(name: &str, position: Position) -> Result<Self, DomainError> {
        let name = Self::normalize_name(name);
        if name.is_empty() {
            return Err(DomainError::validation("Warp name cannot be empty"));
        }
        if name.len() > Self::MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Warp name must be at most {} characters",
                Self::MAX_NAME_LEN
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::validation(format!(
                "Warp name contains invalid characters: {}",
                name
            )));
        }
        Ok(Self {
            name,
            position,
            owner: None,
        })
    }

    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Lookup key for a user-supplied warp name.
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_ascii_lowercase()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_name() {
        let warp = Warp::new(" Spawn ", Position::new("world", 0.0, 64.0, 0.0)).unwrap();
        assert_eq!(warp.name(), "spawn");
        assert_eq!(warp.owner(), None);
    }

    #[test]
    fn new_rejects_bad_names() {
        let pos = Position::new("world", 0.0, 64.0, 0.0);
        assert!(Warp::new("", pos.clone()).is_err());
        assert!(Warp::new("has space", pos.clone()).is_err());
        assert!(Warp::new(&"w".repeat(33), pos).is_err());
    }

    #[test]
    fn with_owner_sets_owner() {
        let owner = PlayerId::new();
        let warp = Warp::new("shop", Position::new("world", 0.0, 64.0, 0.0))
            .unwrap()
            .with_owner(owner);
        assert_eq!(warp.owner(), Some(owner));
    }
}
