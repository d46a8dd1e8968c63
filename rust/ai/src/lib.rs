//! # xidach-ai: Automated Seats for Xì Dách
//!
//! Strategies that decide whether a seat hits or stands. Bots see only their
//! own hand, the same information a human gets on their turn.
//!
//! ## Core Components
//!
//! - [`BotPlayer`] - Trait every strategy implements
//! - [`SeatView`] - Snapshot of one seat handed to a strategy
//! - [`baseline`] - Threshold, cautious and random strategies
//! - [`create_bot`] - Factory by strategy name
//!
//! ## Quick Start
//!
//! ```rust
//! use xidach_ai::{create_bot, BotAction, SeatView};
//! use xidach_engine::cards::cards_from_ids;
//! use xidach_engine::participant::Participant;
//! use xidach_engine::player::Player;
//!
//! let seat = Participant::new(Player::new("bot", "Bot #1", 1_000), 10, false);
//! for c in cards_from_ids(&[9, 8]).unwrap() {
//!     seat.add_card(c);
//! }
//! let bot = create_bot("baseline").unwrap();
//! assert_eq!(bot.decide(&SeatView::of(&seat)), BotAction::Stand);
//! ```

use std::fmt;

use xidach_engine::hand::{HandKind, Role};
use xidach_engine::participant::Participant;

pub mod baseline;

/// What a bot wants to do on its turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BotAction {
    Hit,
    Stand,
}

/// The part of a seat a strategy may look at.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SeatView {
    pub role: Role,
    pub value: u8,
    pub kind: HandKind,
    pub cards: usize,
    pub can_hit: bool,
    pub can_stand: bool,
}

impl SeatView {
    pub fn of(seat: &Participant) -> Self {
        Self {
            role: seat.role(),
            value: seat.value(),
            kind: seat.kind(),
            cards: seat.cards().len(),
            can_hit: seat.can_hit(),
            can_stand: seat.can_stand(),
        }
    }
}

/// Interface shared by every bot strategy.
///
/// A strategy must never answer `Hit` when `can_hit` is false, nor `Stand`
/// when `can_stand` is false, unless neither is possible.
pub trait BotPlayer: Send + Sync {
    fn decide(&self, view: &SeatView) -> BotAction;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    UnknownStrategy(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::UnknownStrategy(name) => write!(f, "Unknown bot strategy: {}", name),
        }
    }
}

impl std::error::Error for BotError {}

/// Names accepted by [`create_bot`].
pub const STRATEGIES: [&str; 3] = ["baseline", "cautious", "random"];

/// Creates a bot by strategy name.
///
/// ```rust
/// use xidach_ai::create_bot;
///
/// assert_eq!(create_bot("cautious").unwrap().name(), "CautiousBot");
/// assert!(create_bot("psychic").is_err());
/// ```
pub fn create_bot(strategy: &str) -> Result<Box<dyn BotPlayer>, BotError> {
    match strategy {
        "baseline" => Ok(Box::new(baseline::BaselineBot::new())),
        "cautious" => Ok(Box::new(baseline::CautiousBot)),
        "random" => Ok(Box::new(baseline::RandomBot::new())),
        other => Err(BotError::UnknownStrategy(other.to_string())),
    }
}
