use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use xidach_engine::rules::{find_rule, DEFAULT_RULE_ID};

/// Table limits applied to every new round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSettings {
    /// Largest bet a participant may place
    pub max_bet: u64,
    /// Balance a player needs before they may deal
    pub min_deal: u64,
    /// Seconds a participant may idle before being passed; the dealer gets five times this
    pub turn_timeout_secs: u64,
    /// Balance given to newly registered players
    pub initial_balance: i64,
    /// Rule used when the dealer has not picked one
    pub default_rule_id: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            max_bet: 200,
            min_deal: 1000,
            turn_timeout_secs: 60,
            initial_balance: 0,
            default_rule_id: DEFAULT_RULE_ID.to_string(),
        }
    }
}

impl TableSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_bet == 0 {
            return Err(SettingsError::InvalidValue(
                "max_bet must be greater than 0".to_string(),
            ));
        }

        if self.turn_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "turn_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if find_rule(&self.default_rule_id).is_err() {
            return Err(SettingsError::InvalidValue(format!(
                "default_rule_id {} is not a known rule",
                self.default_rule_id
            )));
        }

        Ok(())
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
