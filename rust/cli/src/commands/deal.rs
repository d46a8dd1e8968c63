//! `deal`: deals a single round and shows every hand face up.
//!
//! Supports an optional seed so the same deal can be reproduced.

use std::io::Write;
use std::time::Duration;

use xidach_engine::deck::Deck;
use xidach_engine::player::Player;
use xidach_engine::round::Round;
use xidach_engine::rules::default_rule;

use crate::error::CliError;

/// Largest table a single deck can deal two cards to, dealer included.
pub const MAX_DEAL_PLAYERS: usize = 25;

/// Handle the deal command.
///
/// # Examples
///
/// ```ignore
/// let mut out = Vec::new();
/// handle_deal_command(Some(42), 3, &mut out).unwrap();
/// ```
pub fn handle_deal_command(
    seed: Option<u64>,
    players: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if players == 0 || players > MAX_DEAL_PLAYERS {
        return Err(CliError::InvalidInput(format!(
            "players must be between 1 and {}",
            MAX_DEAL_PLAYERS
        )));
    }
    let seed = seed.unwrap_or_else(rand::random);

    let round = Round::new(
        format!("deal-{seed}"),
        Player::new("dealer", "Dealer", 0),
        default_rule().clone(),
        1,
        Duration::from_secs(60),
    );
    for i in 1..=players {
        round.player_bet(&Player::new(format!("p{i}"), format!("Player {i}"), 1), 1)?;
    }
    let mut deck = Deck::new_with_seed(seed);
    deck.shuffle();
    round.deal_with_deck(deck)?;

    writeln!(out, "deal: seed={} players={}", seed, players)?;
    writeln!(out, "Dealer: {}", round.dealer().render_open())?;
    for seat in round.participants() {
        writeln!(out, "{}: {}", seat.name(), seat.render_open())?;
    }
    writeln!(out, "Remaining: {}", round.remaining_cards())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealt(seed: u64, players: usize) -> String {
        let mut out = Vec::new();
        handle_deal_command(Some(seed), players, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn same_seed_same_deal() {
        assert_eq!(dealt(42, 4), dealt(42, 4));
    }

    #[test]
    fn prints_every_seat() {
        let text = dealt(7, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "deal: seed=7 players=3");
        assert!(lines[1].starts_with("Dealer: "));
        assert!(lines[4].starts_with("Player 3: "));
        assert_eq!(lines[5], "Remaining: 44");
    }

    #[test]
    fn full_table_uses_the_whole_deck() {
        let text = dealt(1, MAX_DEAL_PLAYERS);
        assert!(text.ends_with("Remaining: 0\n"));
    }

    #[test]
    fn player_count_is_bounded() {
        let mut out = Vec::new();
        assert!(matches!(
            handle_deal_command(Some(1), 0, &mut out),
            Err(CliError::InvalidInput(_))
        ));
        assert!(handle_deal_command(Some(1), MAX_DEAL_PLAYERS + 1, &mut out).is_err());
    }
}
