//! # Play Command
//!
//! Runs full rounds between a dealer and bot players through the session
//! manager: bets, deal, early settlement of naturals, bot turns, the dealer's
//! turn and settlement. Every seat is driven by the same bot strategy.
//!
//! Seeds drive everything random (bet sizes and decks), so a seeded run is
//! reproducible as long as the strategy is deterministic.

use std::io::Write;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use xidach_ai::{create_bot, BotPlayer};
use xidach_engine::deck::Deck;
use xidach_engine::logger::{RoundLogger, RoundSummary};
use xidach_engine::player::PlayerRole;
use xidach_engine::round::Round;
use xidach_table::{Progress, SessionManager};

use crate::config;
use crate::error::CliError;
use crate::ui;

pub const DEALER_ID: &str = "dealer";

/// Bots a single deck can serve even if every hand draws five cards.
pub const MAX_BOTS: usize = 9;

#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub bots: usize,
    pub rounds: u32,
    pub seed: Option<u64>,
    pub strategy: String,
    pub log: Option<String>,
    pub db: Option<String>,
}

/// Handle the play command.
///
/// # Errors
///
/// `CliError::InvalidInput` for a bad bot count, round count or strategy;
/// table and store failures are propagated as they happen.
pub fn handle_play_command(
    opts: &PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.bots == 0 || opts.bots > MAX_BOTS {
        return Err(CliError::InvalidInput(format!(
            "bots must be between 1 and {}",
            MAX_BOTS
        )));
    }
    if opts.rounds == 0 {
        return Err(CliError::InvalidInput("rounds must be >= 1".into()));
    }
    let bot = create_bot(&opts.strategy).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let config = config::load()?;
    let table = super::open_table(&config, opts.db.as_deref())?;
    let mut logger = match &opts.log {
        Some(path) => RoundLogger::create(path)?,
        None => RoundLogger::disabled(),
    };

    let seed = opts.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    if opts.strategy == "random" && opts.seed.is_some() {
        ui::display_warning(
            err,
            "the random strategy draws from OS entropy; seeded runs will not repeat exactly",
        )?;
    }

    writeln!(
        out,
        "play: bots={} rounds={} strategy={} seed={}",
        opts.bots,
        opts.rounds,
        bot.name(),
        seed
    )?;

    table.register_player(DEALER_ID, "Dealer", PlayerRole::Normal)?;
    let bot_ids: Vec<String> = (1..=opts.bots).map(|i| format!("bot{i}")).collect();
    for (i, id) in bot_ids.iter().enumerate() {
        table.register_player(id, &format!("Bot {}", i + 1), PlayerRole::Bot)?;
    }

    for n in 1..=opts.rounds {
        let (round, summary) = play_round(&table, &bot_ids, bot.as_ref(), &mut rng)?;
        writeln!(out, "\nRound {}/{} ({})", n, opts.rounds, summary.round_id)?;
        writeln!(out, "{}", round.result_board())?;
        if summary.net() != 0 {
            return Err(CliError::Engine(format!(
                "round {} is not zero-sum: net {}",
                summary.round_id,
                summary.net()
            )));
        }
        logger.write(&summary)?;
    }

    writeln!(out, "\nBalances:")?;
    ui::write_player_table(out, &table.all_players()?)?;
    Ok(())
}

fn play_round(
    table: &SessionManager,
    bot_ids: &[String],
    bot: &dyn BotPlayer,
    rng: &mut ChaCha20Rng,
) -> Result<(Arc<Round>, RoundSummary), CliError> {
    let settings = table.settings()?;
    top_up(table, DEALER_ID, i64::try_from(settings.min_deal).unwrap_or(i64::MAX))?;
    let max_bet = i64::try_from(settings.max_bet).unwrap_or(i64::MAX);
    for id in bot_ids {
        top_up(table, id, max_bet)?;
    }

    let round = table.new_round(DEALER_ID)?;
    let id = round.id().to_string();
    for player in bot_ids {
        let amount = rng.random_range(1..=settings.max_bet);
        table.bet(&id, player, amount)?;
    }
    let mut deck = Deck::new_with_seed(rng.random());
    deck.shuffle();
    table.deal_with_deck(&id, deck)?;

    let mut progress = table.start(&id)?;
    loop {
        match progress {
            Progress::Turn(_) => progress = table.play_bot_turn(&id, bot)?,
            Progress::Finished(summary) => return Ok((round, summary)),
        }
    }
}

/// Deposits whatever `id` lacks to reach `floor`.
fn top_up(table: &SessionManager, id: &str, floor: i64) -> Result<(), CliError> {
    let balance = table.store().get_by_id(id)?.balance;
    if balance < floor {
        table.deposit(id, floor - balance)?;
    }
    Ok(())
}
