use std::io::Write;

use xidach_engine::player::PlayerRole;

use crate::config;
use crate::error::CliError;

/// Adds `amount` to a player's balance, registering them first if unknown.
///
/// A negative amount withdraws; balances may go negative.
pub fn handle_deposit_command(
    player: &str,
    amount: i64,
    db: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if amount == 0 {
        return Err(CliError::InvalidInput("amount must not be 0".into()));
    }
    let config = config::load()?;
    let table = super::open_persistent_table(&config, db)?;
    let (_, already) = table.register_player(player, player, PlayerRole::Normal)?;
    if !already {
        writeln!(out, "Registered {}", player)?;
    }
    let updated = table.deposit(player, amount)?;
    writeln!(out, "{}: {:+} -> {}", updated.id, amount, updated.balance)?;
    Ok(())
}
