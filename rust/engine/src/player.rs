use serde::{Deserialize, Serialize};

use crate::rules::DEFAULT_RULE_ID;

/// Account type of a registered player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    #[default]
    Normal,
    /// May pause, resume, cancel and adjust balances
    Admin,
    /// Seat driven by an automated strategy
    Bot,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    Active,
    Inactive,
}

/// Persistent player identity as kept by the player store.
///
/// A round copies this at bet time; balances only change through the store.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier, usually the chat user id
    pub id: String,
    /// Display name shown on boards
    pub name: String,
    #[serde(default)]
    pub role: PlayerRole,
    #[serde(default)]
    pub status: PlayerStatus,
    /// Current balance; may go negative after a losing round
    pub balance: i64,
    /// Payout rule used when this player deals
    #[serde(default = "default_rule_id")]
    pub rule_id: String,
}

fn default_rule_id() -> String {
    DEFAULT_RULE_ID.to_string()
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: PlayerRole::Normal,
            status: PlayerStatus::Active,
            balance,
            rule_id: default_rule_id(),
        }
    }

    pub fn with_role(mut self, role: PlayerRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == PlayerRole::Admin
    }

    pub fn is_bot(&self) -> bool {
        self.role == PlayerRole::Bot
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_active_normal_on_default_rule() {
        let p = Player::new("u1", "alice", 500);
        assert!(p.is_active());
        assert!(!p.is_admin());
        assert!(!p.is_bot());
        assert_eq!(p.rule_id, "1");
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let p: Player =
            serde_json::from_str(r#"{"id":"u2","name":"bob","balance":-20}"#).unwrap();
        assert_eq!(p.role, PlayerRole::Normal);
        assert_eq!(p.status, PlayerStatus::Active);
        assert_eq!(p.rule_id, DEFAULT_RULE_ID);
        assert_eq!(p.balance, -20);
    }
}
