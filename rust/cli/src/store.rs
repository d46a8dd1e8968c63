//! SQLite-backed [`PlayerStore`].
//!
//! Two tables, created on open:
//!
//! - `players`: one row per registered player, enums stored as their
//!   snake_case names
//! - `history`: one row per settled seat, `seq` orders the records

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use xidach_engine::logger::SettlementRecord;
use xidach_engine::player::{Player, PlayerStatus};
use xidach_table::{PlayerStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS players (
    id TEXT NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    status TEXT NOT NULL,
    balance INTEGER NOT NULL,
    rule_id TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS history (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    round_id TEXT NOT NULL,
    player_id TEXT NOT NULL,
    name TEXT NOT NULL,
    reward INTEGER NOT NULL,
    kind TEXT NOT NULL,
    value INTEGER NOT NULL,
    is_dealer INTEGER NOT NULL,
    ts TEXT
);
CREATE INDEX IF NOT EXISTS history_player ON history (player_id, seq);
";

const PLAYER_COLUMNS: &str = "id, name, role, status, balance, rule_id";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn backend(err: rusqlite::Error) -> StoreError {
    let busy = matches!(
        &err,
        rusqlite::Error::SqliteFailure(info, _)
            if matches!(
                info.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    );
    if busy {
        StoreError::Backend(format!("database busy: {}", err))
    } else {
        StoreError::Backend(err.to_string())
    }
}

fn to_text<T: Serialize>(value: &T) -> Result<String, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(StoreError::Backend(format!("unexpected enum encoding {}", other))),
        Err(e) => Err(StoreError::Backend(e.to_string())),
    }
}

fn from_text<T: DeserializeOwned>(text: String) -> rusqlite::Result<T> {
    serde_json::from_value(serde_json::Value::String(text)).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        role: from_text(row.get(2)?)?,
        status: from_text(row.get(3)?)?,
        balance: row.get(4)?,
        rule_id: row.get(5)?,
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<SettlementRecord> {
    Ok(SettlementRecord {
        round_id: row.get(0)?,
        player_id: row.get(1)?,
        name: row.get(2)?,
        reward: row.get(3)?,
        kind: from_text(row.get(4)?)?,
        value: row.get(5)?,
        is_dealer: row.get(6)?,
        ts: row.get(7)?,
    })
}

fn fetch(conn: &Connection, id: &str) -> Result<Player, StoreError> {
    conn.query_row(
        &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
        params![id],
        player_from_row,
    )
    .optional()
    .map_err(backend)?
    .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!(
                    "Failed to create parent directory for {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Self::init(Connection::open(path).map_err(backend)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory().map_err(backend)?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("connection lock poisoned".to_string()))
    }
}

impl PlayerStore for SqliteStore {
    fn get_by_id(&self, id: &str) -> Result<Player, StoreError> {
        fetch(&*self.conn()?, id)
    }

    fn save(&self, player: &Player) -> Result<(), StoreError> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT OR REPLACE INTO players ({PLAYER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                params![
                    player.id,
                    player.name,
                    to_text(&player.role)?,
                    to_text(&player.status)?,
                    player.balance,
                    player.rule_id,
                ],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Player>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id"))
            .map_err(backend)?;
        let rows = stmt.query_map([], player_from_row).map_err(backend)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(backend)
    }

    fn add_balance(&self, id: &str, delta: i64) -> Result<Player, StoreError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE players SET balance = balance + ?2 WHERE id = ?1",
                params![id, delta],
            )
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fetch(&conn, id)
    }

    fn set_status(&self, id: &str, status: PlayerStatus) -> Result<Player, StoreError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE players SET status = ?2 WHERE id = ?1",
                params![id, to_text(&status)?],
            )
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fetch(&conn, id)
    }

    fn reset_balances(&self, balance: i64) -> Result<(), StoreError> {
        self.conn()?
            .execute("UPDATE players SET balance = ?1", params![balance])
            .map_err(backend)?;
        Ok(())
    }

    fn save_history_record(&self, record: &SettlementRecord) -> Result<(), StoreError> {
        self.conn()?
            .execute(
                "INSERT INTO history (round_id, player_id, name, reward, kind, value, is_dealer, ts)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.round_id,
                    record.player_id,
                    record.name,
                    record.reward,
                    to_text(&record.kind)?,
                    record.value,
                    record.is_dealer,
                    record.ts,
                ],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn list_history(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<SettlementRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT round_id, player_id, name, reward, kind, value, is_dealer, ts
         FROM history WHERE player_id = ?1 ORDER BY seq DESC LIMIT ?2",
            )
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![player_id, limit], record_from_row)
            .map_err(backend)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidach_engine::hand::HandKind;
    use xidach_engine::player::PlayerRole;

    fn record(round: &str, player: &str, reward: i64) -> SettlementRecord {
        SettlementRecord {
            round_id: round.into(),
            player_id: player.into(),
            name: player.to_uppercase(),
            reward,
            kind: HandKind::Normal,
            value: 19,
            is_dealer: false,
            ts: None,
        }
    }

    #[test]
    fn enums_round_trip_as_names() {
        assert_eq!(to_text(&PlayerRole::Bot).unwrap(), "bot");
        assert_eq!(to_text(&PlayerStatus::Inactive).unwrap(), "inactive");
        let kind: HandKind = from_text("double_black_jack".to_string()).unwrap();
        assert_eq!(kind, HandKind::DoubleBlackJack);
        assert!(from_text::<PlayerRole>("wizard".to_string()).is_err());
    }

    #[test]
    fn players_are_saved_and_updated() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = Player::new("a", "Alice", 100).with_role(PlayerRole::Admin);
        store.save(&alice).unwrap();
        assert_eq!(store.get_by_id("a").unwrap(), alice);

        assert_eq!(store.add_balance("a", -250).unwrap().balance, -150);
        assert_eq!(
            store.set_status("a", PlayerStatus::Inactive).unwrap().status,
            PlayerStatus::Inactive
        );
        assert!(store.list_active().unwrap().is_empty());
        assert_eq!(
            store.add_balance("ghost", 1),
            Err(StoreError::NotFound("ghost".into()))
        );
    }

    #[test]
    fn history_is_most_recent_first() {
        let store = SqliteStore::in_memory().unwrap();
        for (i, reward) in [10, -20, 30].into_iter().enumerate() {
            store
                .save_history_record(&record(&format!("r{i}"), "a", reward))
                .unwrap();
        }
        store.save_history_record(&record("r9", "b", 5)).unwrap();

        let rewards: Vec<i64> = store
            .list_history("a", 2)
            .unwrap()
            .iter()
            .map(|r| r.reward)
            .collect();
        assert_eq!(rewards, vec![30, -20]);
    }
}
