//! Command handler modules for the `xidach` CLI.
//!
//! Each command lives in its own file and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, writing to the
//! `&mut dyn Write` streams it is handed.

mod cfg;
mod deal;
mod deposit;
mod history;
mod play;
mod players;
mod rules;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use deposit::handle_deposit_command;
pub use history::handle_history_command;
pub use play::{handle_play_command, PlayOptions};
pub use players::handle_players_command;
pub use rules::handle_rules_command;

use std::sync::Arc;

use xidach_table::{MemoryStore, PlayerStore, SessionManager};

use crate::config::Config;
use crate::error::CliError;
use crate::store::SqliteStore;

/// Opens a table over the SQLite database named by `db` or the config, or
/// over an in-memory store when neither names one.
pub(crate) fn open_table(config: &Config, db: Option<&str>) -> Result<SessionManager, CliError> {
    let store: Arc<dyn PlayerStore> = match db.or(config.db.as_deref()) {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    Ok(SessionManager::new(store, config.to_settings())?)
}

/// Like [`open_table`] but refuses to run without a database.
pub(crate) fn open_persistent_table(
    config: &Config,
    db: Option<&str>,
) -> Result<SessionManager, CliError> {
    if db.is_none() && config.db.is_none() {
        return Err(CliError::Config(
            "no database configured; pass --db or set XIDACH_DB".into(),
        ));
    }
    open_table(config, db)
}
