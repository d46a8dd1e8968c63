use std::io::Write;

use crate::config;
use crate::error::CliError;
use crate::ui;

/// Lists every registered player, active or not, with their balance.
pub fn handle_players_command(db: Option<&str>, out: &mut dyn Write) -> Result<(), CliError> {
    let config = config::load()?;
    let table = super::open_persistent_table(&config, db)?;
    let players = table.all_players()?;
    if players.is_empty() {
        writeln!(out, "No players registered")?;
        return Ok(());
    }
    ui::write_player_table(out, &players)?;
    Ok(())
}
