//! `history`: a player's most recent settled seats, newest first.

use std::io::Write;

use chrono::DateTime;

use crate::config;
use crate::error::CliError;

pub fn handle_history_command(
    player: &str,
    limit: usize,
    db: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if limit == 0 {
        return Err(CliError::InvalidInput("limit must be >= 1".into()));
    }
    let config = config::load()?;
    let table = super::open_persistent_table(&config, db)?;
    let found = table.store().get_by_id(player)?;
    let records = table.player_history(player, limit)?;

    writeln!(out, "History for {} ({}):", found.name, found.id)?;
    if records.is_empty() {
        writeln!(out, "  (no rounds yet)")?;
    }
    for r in &records {
        let seat = if r.is_dealer { "dealer" } else { "player" };
        writeln!(
            out,
            "  {} {} {:+} {:?} {} [{}]",
            r.ts.as_deref().map(display_ts).unwrap_or_else(|| "-".into()),
            r.round_id,
            r.reward,
            r.kind,
            r.value,
            seat
        )?;
    }
    writeln!(out, "Balance: {}", found.balance)?;
    Ok(())
}

/// Renders an RFC3339 stamp as `YYYY-MM-DD HH:MM:SS`, or as given if it does not parse.
fn display_ts(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| ts.to_string())
}
