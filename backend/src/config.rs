//! Desk configuration
//!
//! Loaded from JSON; every field has a default so a partial (or empty)
//! document is valid.
//!
//! ```json
//! {
//!   "remote":  { "timeout_ms": 30000 },
//!   "display": { "thousands_separator": ",", "id_separator": "-", "phone_separator": "-" }
//! }
//! ```

use crate::core::canonical_sha256;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound accepted for `remote.timeout_ms`
pub const MAX_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config could not be parsed: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Complete desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeskConfig {
    pub remote: RemoteConfig,
    pub display: DisplayConfig,
}

/// Settings handed to the transport that carries remote calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Deadline for every remote call, enforced by the transport
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Text formatting for amounts and typed identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub thousands_separator: char,
    pub id_separator: char,
    pub phone_separator: char,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            id_separator: '-',
            phone_separator: '-',
        }
    }
}

impl DeskConfig {
    /// Parse and validate a JSON document
    ///
    /// # Example
    /// ```
    /// use group_policy_desk_core::DeskConfig;
    ///
    /// let config = DeskConfig::from_json(r#"{"remote": {"timeout_ms": 5000}}"#).unwrap();
    /// assert_eq!(config.remote.timeout_ms, 5000);
    /// assert_eq!(config.display.thousands_separator, ',');
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DeskConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.timeout_ms == 0 || self.remote.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "remote.timeout_ms must be between 1 and {}, got {}",
                MAX_TIMEOUT_MS, self.remote.timeout_ms
            )));
        }

        // '-' would read as a sign in front of an amount
        let thousands = self.display.thousands_separator;
        if thousands == '-' {
            return Err(ConfigError::Invalid(
                "display.thousands_separator cannot be '-'".to_string(),
            ));
        }

        let separators = [
            ("display.thousands_separator", thousands),
            ("display.id_separator", self.display.id_separator),
            ("display.phone_separator", self.display.phone_separator),
        ];
        for (field, separator) in separators {
            if separator.is_ascii_digit() {
                return Err(ConfigError::Invalid(format!(
                    "{} cannot be the digit '{}'",
                    field, separator
                )));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.remote.timeout_ms)
    }

    /// Deterministic SHA-256 of the configuration
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        canonical_sha256(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeskConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(DeskConfig::from_json("{}").unwrap(), DeskConfig::default());
    }

    #[test]
    fn test_rejects_zero_and_huge_timeouts() {
        assert!(matches!(
            DeskConfig::from_json(r#"{"remote": {"timeout_ms": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DeskConfig::from_json(r#"{"remote": {"timeout_ms": 600000}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_digit_separators() {
        assert!(matches!(
            DeskConfig::from_json(r#"{"display": {"id_separator": "7"}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DeskConfig::from_json(r#"{"display": {"thousands_separator": "-"}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DeskConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_hash_changes_with_content() {
        let a = DeskConfig::default();
        let mut b = DeskConfig::default();
        b.remote.timeout_ms = 10_000;
        assert_eq!(a.config_hash().unwrap(), DeskConfig::default().config_hash().unwrap());
        assert_ne!(a.config_hash().unwrap(), b.config_hash().unwrap());
    }
}
