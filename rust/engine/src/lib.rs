//! # xidach-engine: Xì Dách Game Engine Core
//!
//! A turn-based engine for xì dách, the Vietnamese blackjack variant played by
//! one dealer against any number of participants. Provides the hand model,
//! payout rules, per-seat turn state and the round state machine, all safe to
//! drive from many threads at once.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card ids, ranks, suits and deck construction
//! - [`deck`] - ChaCha20 backed shuffling, OS seeded or fixed seed
//! - [`hand`] - Hand value, classification and comparison
//! - [`rules`] - Payout multiplier tables and the rule registry
//! - [`player`] - Persistent player identity
//! - [`participant`] - A player's seat in one round
//! - [`round`] - Dealing, turn order, timeouts and settlement
//! - [`logger`] - Settlement records and JSONL round logging
//! - [`errors`] - Error types and their taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use xidach_engine::cards::cards_from_ids;
//! use xidach_engine::hand::{Hand, HandKind, Role};
//!
//! // Ace of hearts and ten of hearts
//! let hand = Hand::from_cards(cards_from_ids(&[0, 9]).unwrap());
//! assert_eq!(hand.value(), 21);
//! assert_eq!(hand.classify(Role::Participant), HandKind::BlackJack);
//! ```
//!
//! ## Playing a Round
//!
//! ```rust
//! use std::time::Duration;
//! use xidach_engine::player::Player;
//! use xidach_engine::round::{Round, RoundStatus};
//! use xidach_engine::rules::default_rule;
//!
//! let round = Round::new(
//!     "round-1",
//!     Player::new("dealer", "Dealer", 5_000),
//!     default_rule().clone(),
//!     200,
//!     Duration::from_secs(60),
//! );
//! round.player_bet(&Player::new("p1", "Alice", 1_000), 100).unwrap();
//! round.deal().unwrap();
//! assert_eq!(round.status(), RoundStatus::Playing);
//!
//! // Everyone settled by force: the round is zero-sum
//! for seat in round.participants() {
//!     round.settle(&seat, true).unwrap();
//! }
//! assert!(round.is_finished());
//! let net: i64 = round.results().iter().map(|r| r.reward).sum();
//! assert_eq!(net, 0);
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod participant;
pub mod player;
pub mod round;
pub mod rules;
