//! Store configuration.

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`ProgressStore`](crate::ProgressStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Points awarded for each simulated arrival
    pub arrival_reward: i64,
    /// How many recent arrivals the pet page lists
    pub recent_display_limit: usize,
    /// Waypoints a draft needs before it can be saved
    pub min_route_waypoints: usize,
    /// strftime pattern for route and arrival dates
    pub date_format: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            arrival_reward: 5,
            recent_display_limit: 4,
            min_route_waypoints: 2,
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load and validate a config from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the arrival reward.
    pub fn with_arrival_reward(mut self, points: i64) -> Self {
        self.arrival_reward = points;
        self
    }

    /// Set how many recent arrivals are listed.
    pub fn with_recent_display_limit(mut self, limit: usize) -> Self {
        self.recent_display_limit = limit;
        self
    }

    /// Set the date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arrival_reward < 0 {
            return Err(ConfigError::Invalid(format!(
                "arrival_reward must not be negative, got {}",
                self.arrival_reward
            )));
        }
        if self.recent_display_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_display_limit must be at least 1".to_string(),
            ));
        }
        if self.min_route_waypoints < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_route_waypoints must be at least 2, got {}",
                self.min_route_waypoints
            )));
        }
        if self.date_format.is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ConfigError::Invalid(format!(
                "date_format is not a valid strftime pattern: {:?}",
                self.date_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arrival_reward, 5);
        assert_eq!(config.recent_display_limit, 4);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = StoreConfig::from_json_str(r#"{ "arrival_reward": 7 }"#).unwrap();
        assert_eq!(config.arrival_reward, 7);
        assert_eq!(config.min_route_waypoints, 2);
        assert_eq!(config.date_format, "%-m/%-d/%Y");
    }

    #[test]
    fn builder_overrides_are_validated() {
        let config = StoreConfig::default().with_recent_display_limit(2).with_date_format("%F");
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_display_limit, 2);

        let config = StoreConfig::default().with_recent_display_limit(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_out_of_range_values() {
        for raw in [
            r#"{ "arrival_reward": -1 }"#,
            r#"{ "recent_display_limit": 0 }"#,
            r#"{ "min_route_waypoints": 1 }"#,
            r#"{ "date_format": "%Q" }"#,
        ] {
            assert!(
                matches!(StoreConfig::from_json_str(raw), Err(ConfigError::Invalid(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            StoreConfig::from_json_str("{ arrival_reward"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "date_format": "%Y-%m-%d", "recent_display_limit": 2 }}"#).unwrap();

        let config = StoreConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.recent_display_limit, 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
