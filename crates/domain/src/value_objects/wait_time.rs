//! Teleport channeling delay in seconds
//!
//! A newtype representing how long a player has to channel before a queued
//! teleport executes. Zero means teleports execute immediately.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Channeling delay in seconds (validated newtype)
///
/// # Validation Rules
///
/// - Value must be >= 0 (non-negative)
/// - Value must be <= 3600 (one hour)
///
/// # Examples
///
/// ```
/// use waystone_domain::value_objects::WaitTimeSeconds;
///
/// let wait = WaitTimeSeconds::new(3).unwrap();
/// assert_eq!(wait.value(), 3);
///
/// assert!(WaitTimeSeconds::new(-1).is_err());
/// assert!(WaitTimeSeconds::new(3601).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WaitTimeSeconds(i64);

impl WaitTimeSeconds {
    /// Minimum valid value: 0 seconds
    pub const MIN: i64 = 0;

    /// Maximum valid value: 3600 seconds
    pub const MAX: i64 = 3600;

    /// Default value: 3 seconds
    pub const DEFAULT: i64 = 3;

    /// Create a new `WaitTimeSeconds` value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the value is outside `MIN..=MAX`.
    pub fn new(seconds: i64) -> Result<Self, crate::DomainError> {
        if seconds < Self::MIN {
            return Err(crate::DomainError::validation(format!(
                "Teleport wait time must be >= {} seconds, got {}",
                Self::MIN,
                seconds
            )));
        }

        if seconds > Self::MAX {
            return Err(crate::DomainError::validation(format!(
                "Teleport wait time must be <= {} seconds, got {}",
                Self::MAX,
                seconds
            )));
        }

        Ok(Self(seconds))
    }

    /// Create a new `WaitTimeSeconds` value, clamping to the valid range.
    pub fn clamped(seconds: i64) -> Self {
        Self(seconds.clamp(Self::MIN, Self::MAX))
    }

    /// Get the raw value in seconds.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The delay as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0.unsigned_abs())
    }

    /// True when teleports should skip channeling entirely.
    pub fn is_instant(&self) -> bool {
        self.0 == 0
    }
}

impl Default for WaitTimeSeconds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for WaitTimeSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<i64> for WaitTimeSeconds {
    type Error = crate::DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WaitTimeSeconds> for i64 {
    fn from(value: WaitTimeSeconds) -> Self {
        value.0
    }
}

impl std::str::FromStr for WaitTimeSeconds {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seconds: i64 = s
            .trim()
            .parse()
            .map_err(|_| crate::DomainError::parse(format!("Invalid wait time: {}", s)))?;
        Self::new(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_bounds() {
        assert_eq!(WaitTimeSeconds::new(0).unwrap().value(), 0);
        assert_eq!(WaitTimeSeconds::new(3600).unwrap().value(), 3600);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(WaitTimeSeconds::new(-1).is_err());
        assert!(WaitTimeSeconds::new(3601).is_err());
    }

    #[test]
    fn clamped_limits_range() {
        assert_eq!(WaitTimeSeconds::clamped(-5).value(), 0);
        assert_eq!(WaitTimeSeconds::clamped(9000).value(), 3600);
        assert_eq!(WaitTimeSeconds::clamped(5).value(), 5);
    }

    #[test]
    fn default_is_three_seconds() {
        assert_eq!(WaitTimeSeconds::default().as_duration(), Duration::from_secs(3));
        assert!(!WaitTimeSeconds::default().is_instant());
        assert!(WaitTimeSeconds::new(0).unwrap().is_instant());
    }

    #[test]
    fn from_str_parses_and_validates() {
        assert_eq!("5".parse::<WaitTimeSeconds>().unwrap().value(), 5);
        assert!(matches!(
            "abc".parse::<WaitTimeSeconds>(),
            Err(crate::DomainError::Parse(_))
        ));
        assert!(matches!(
            "-2".parse::<WaitTimeSeconds>(),
            Err(crate::DomainError::Validation(_))
        ));
    }

    #[test]
    fn serde_rejects_invalid_values() {
        let ok: WaitTimeSeconds = serde_json::from_str("10").unwrap();
        assert_eq!(ok.value(), 10);
        assert!(serde_json::from_str::<WaitTimeSeconds>("-1").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "10");
    }
}
