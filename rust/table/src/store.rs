use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use xidach_engine::logger::SettlementRecord;
use xidach_engine::player::{Player, PlayerStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Player not found: {0}")]
    NotFound(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Persistence for player identities, balances and per-round history.
///
/// Every call may fail; the session manager logs failures and hands them to
/// its caller without aborting the round.
pub trait PlayerStore: Send + Sync {
    fn get_by_id(&self, id: &str) -> Result<Player, StoreError>;

    /// Inserts or replaces a player.
    fn save(&self, player: &Player) -> Result<(), StoreError>;

    /// All players sorted by id.
    fn list_all(&self) -> Result<Vec<Player>, StoreError>;

    fn list_active(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.is_active())
            .collect())
    }

    /// Adds `delta` to the balance and returns the updated player.
    fn add_balance(&self, id: &str, delta: i64) -> Result<Player, StoreError>;

    fn set_status(&self, id: &str, status: PlayerStatus) -> Result<Player, StoreError>;

    /// Sets every player's balance to `balance`.
    fn reset_balances(&self, balance: i64) -> Result<(), StoreError>;

    fn save_history_record(&self, record: &SettlementRecord) -> Result<(), StoreError>;

    /// Up to `limit` records for one player, most recent first.
    fn list_history(&self, player_id: &str, limit: usize)
        -> Result<Vec<SettlementRecord>, StoreError>;
}

/// In-memory store, used by tests and by tables that need no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<String, Player>>,
    history: RwLock<Vec<SettlementRecord>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: &str, f: F) -> Result<Player, StoreError>
    where
        F: FnOnce(&mut Player),
    {
        let mut guard = self.players.write().map_err(poisoned)?;
        let player = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(player);
        Ok(player.clone())
    }
}

impl PlayerStore for MemoryStore {
    fn get_by_id(&self, id: &str) -> Result<Player, StoreError> {
        let guard = self.players.read().map_err(poisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&self, player: &Player) -> Result<(), StoreError> {
        let mut guard = self.players.write().map_err(poisoned)?;
        guard.insert(player.id.clone(), player.clone());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Player>, StoreError> {
        let guard = self.players.read().map_err(poisoned)?;
        let mut players: Vec<Player> = guard.values().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    fn add_balance(&self, id: &str, delta: i64) -> Result<Player, StoreError> {
        self.update(id, |p| p.balance += delta)
    }

    fn set_status(&self, id: &str, status: PlayerStatus) -> Result<Player, StoreError> {
        self.update(id, |p| p.status = status)
    }

    fn reset_balances(&self, balance: i64) -> Result<(), StoreError> {
        let mut guard = self.players.write().map_err(poisoned)?;
        for p in guard.values_mut() {
            p.balance = balance;
        }
        Ok(())
    }

    fn save_history_record(&self, record: &SettlementRecord) -> Result<(), StoreError> {
        let mut guard = self.history.write().map_err(poisoned)?;
        guard.push(record.clone());
        Ok(())
    }

    fn list_history(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<SettlementRecord>, StoreError> {
        let guard = self.history.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .rev()
            .filter(|r| r.player_id == player_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidach_engine::hand::HandKind;

    fn record(round: &str, player: &str, reward: i64) -> SettlementRecord {
        SettlementRecord {
            round_id: round.to_string(),
            player_id: player.to_string(),
            name: player.to_string(),
            reward,
            kind: HandKind::Normal,
            value: 18,
            is_dealer: false,
            ts: None,
        }
    }

    #[test]
    fn missing_player_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get_by_id("ghost"),
            Err(StoreError::NotFound("ghost".to_string()))
        );
        assert!(store.add_balance("ghost", 10).is_err());
    }

    #[test]
    fn balance_and_status_updates_return_the_new_state() {
        let store = MemoryStore::new();
        store.save(&Player::new("a", "Alice", 100)).unwrap();
        store.save(&Player::new("b", "Bob", 50)).unwrap();

        assert_eq!(store.add_balance("a", -30).unwrap().balance, 70);
        let bob = store.set_status("b", PlayerStatus::Inactive).unwrap();
        assert!(!bob.is_active());

        let active: Vec<String> = store.list_active().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(active, vec!["a"]);
        assert_eq!(store.list_all().unwrap().len(), 2);

        store.reset_balances(500).unwrap();
        assert!(store.list_all().unwrap().iter().all(|p| p.balance == 500));
    }

    #[test]
    fn history_is_most_recent_first_and_limited() {
        let store = MemoryStore::new();
        store.save_history_record(&record("r1", "a", 10)).unwrap();
        store.save_history_record(&record("r1", "b", -10)).unwrap();
        store.save_history_record(&record("r2", "a", -20)).unwrap();
        store.save_history_record(&record("r3", "a", 5)).unwrap();

        let rounds: Vec<String> = store
            .list_history("a", 2)
            .unwrap()
            .into_iter()
            .map(|r| r.round_id)
            .collect();
        assert_eq!(rounds, vec!["r3", "r2"]);
        assert_eq!(store.list_history("b", 10).unwrap().len(), 1);
    }
}
