//! UI helper functions for terminal output formatting.

use std::io::Write;

use xidach_engine::player::Player;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// One line per player: id, name, role, status and balance, columns aligned.
pub fn write_player_table(out: &mut dyn Write, players: &[Player]) -> std::io::Result<()> {
    let id_width = players.iter().map(|p| p.id.len()).max().unwrap_or(0).max(2);
    let name_width = players
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    writeln!(
        out,
        "{:<id_width$}  {:<name_width$}  {:<6}  {:<8}  {:>10}",
        "id", "name", "role", "status", "balance"
    )?;
    for p in players {
        writeln!(
            out,
            "{:<id_width$}  {:<name_width$}  {:<6}  {:<8}  {:>10}",
            p.id,
            p.name,
            format!("{:?}", p.role).to_lowercase(),
            format!("{:?}", p.status).to_lowercase(),
            p.balance
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_table_aligns_balances() {
        let players = vec![
            Player::new("dealer", "Dealer", 10_300),
            Player::new("b1", "Bot 1", -300),
        ];
        let mut out = Vec::new();
        write_player_table(&mut out, &players).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id "));
        assert!(lines[1].ends_with("10300"));
        assert!(lines[2].ends_with("-300"));
        assert_eq!(lines[1].len(), lines[2].len());
    }
}
