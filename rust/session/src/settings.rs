use pokerlab_engine::blinds::BlindSchedule;
use pokerlab_engine::game::TableConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Defaults applied to sessions created without an explicit table config,
/// plus registry-wide limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSettings {
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    /// Completed hands kept per session
    pub history_capacity: usize,
    /// Idle time before a session is evicted
    pub session_timeout_minutes: u64,
    /// Upper bound on concurrently registered sessions
    pub max_sessions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            small_blind: 5,
            big_blind: 10,
            starting_stack: 1000,
            history_capacity: 100,
            session_timeout_minutes: 30,
            max_sessions: 1024,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(SettingsError::InvalidValue(
                "blinds must be greater than 0".to_string(),
            ));
        }

        if self.small_blind > self.big_blind {
            return Err(SettingsError::InvalidValue(
                "small_blind cannot exceed big_blind".to_string(),
            ));
        }

        if self.starting_stack == 0 {
            return Err(SettingsError::InvalidValue(
                "starting_stack must be greater than 0".to_string(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(SettingsError::InvalidValue(
                "history_capacity must be greater than 0".to_string(),
            ));
        }

        if self.session_timeout_minutes == 0 {
            return Err(SettingsError::InvalidValue(
                "session_timeout_minutes must be greater than 0".to_string(),
            ));
        }

        if self.max_sessions == 0 {
            return Err(SettingsError::InvalidValue(
                "max_sessions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes.saturating_mul(60))
    }

    /// Table configuration built from these defaults.
    pub fn table_config(&self, seed: Option<u64>) -> TableConfig {
        TableConfig {
            blinds: BlindSchedule::fixed(self.small_blind, self.big_blind),
            starting_stack: self.starting_stack,
            history_capacity: self.history_capacity,
            seed,
        }
    }

}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = SessionSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.session_ttl(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn rejects_zero_and_inverted_blinds() {
        let settings = SessionSettings {
            small_blind: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = SessionSettings {
            small_blind: 20,
            big_blind: 10,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_limits() {
        for settings in [
            SessionSettings {
                starting_stack: 0,
                ..Default::default()
            },
            SessionSettings {
                history_capacity: 0,
                ..Default::default()
            },
            SessionSettings {
                session_timeout_minutes: 0,
                ..Default::default()
            },
            SessionSettings {
                max_sessions: 0,
                ..Default::default()
            },
        ] {
            assert!(settings.validate().is_err(), "{:?}", settings);
        }
    }

    #[test]
    fn table_config_carries_defaults() {
        let settings = SessionSettings {
            small_blind: 25,
            big_blind: 50,
            starting_stack: 5000,
            ..Default::default()
        };
        let config = settings.table_config(Some(9));
        assert_eq!(config.starting_stack, 5000);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.blinds.level_for_hand(1).big, 50);
        assert!(config.validate().is_ok());
    }
}
