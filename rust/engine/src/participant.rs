use std::sync::atomic::{AtomicI64, AtomicU64, AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::{Hand, HandKind, Role, BEST_VALUE};
use crate::player::Player;
use crate::round::RoundStatus;

/// Turn progress of one seat. Only ever moves forward.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TurnStatus {
    Waiting = 0,
    Playing = 1,
    Stood = 2,
    Done = 3,
}

impl TurnStatus {
    fn from_u8(v: u8) -> TurnStatus {
        match v {
            0 => TurnStatus::Waiting,
            1 => TurnStatus::Playing,
            2 => TurnStatus::Stood,
            _ => TurnStatus::Done,
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A player's seat in one round: hand, bet, turn status and settled reward.
///
/// The hand sits behind its own lock while the scalar fields are atomics, so
/// checking whose turn it is never waits on a card being appended.
#[derive(Debug)]
pub struct Participant {
    player: Player,
    is_dealer: bool,
    hand: RwLock<Hand>,
    bet: AtomicU64,
    status: AtomicU8,
    reward: AtomicI64,
    /// Unix millis of the last turn start or hit
    last_action: AtomicI64,
}

impl Participant {
    pub fn new(player: Player, bet: u64, is_dealer: bool) -> Self {
        Self {
            player,
            is_dealer,
            hand: RwLock::new(Hand::new()),
            bet: AtomicU64::new(bet),
            status: AtomicU8::new(TurnStatus::Waiting as u8),
            reward: AtomicI64::new(0),
            last_action: AtomicI64::new(0),
        }
    }

    pub fn dealer(player: Player) -> Self {
        Self::new(player, 0, true)
    }

    pub fn id(&self) -> &str {
        &self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }

    /// The identity snapshot taken when the seat was created.
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn is_dealer(&self) -> bool {
        self.is_dealer
    }

    pub fn role(&self) -> Role {
        if self.is_dealer {
            Role::Dealer
        } else {
            Role::Participant
        }
    }

    pub fn bet(&self) -> u64 {
        self.bet.load(Ordering::SeqCst)
    }

    /// Replaces the bet. Only allowed while the round is still taking bets.
    pub fn place_bet(&self, amount: u64, round_status: RoundStatus) -> Result<(), GameError> {
        if round_status != RoundStatus::Betting {
            return Err(GameError::RoundAlreadyStarted);
        }
        self.bet.store(amount, Ordering::SeqCst);
        Ok(())
    }

    pub fn status(&self) -> TurnStatus {
        TurnStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub fn is_done(&self) -> bool {
        self.status() == TurnStatus::Done
    }

    pub fn reward(&self) -> i64 {
        self.reward.load(Ordering::SeqCst)
    }

    /// Adds to the accumulated reward and returns the new total.
    pub fn add_reward(&self, delta: i64) -> i64 {
        self.reward.fetch_add(delta, Ordering::SeqCst) + delta
    }

    pub fn last_action_millis(&self) -> i64 {
        self.last_action.load(Ordering::SeqCst)
    }

    pub fn touch(&self) {
        self.touch_at(now_millis());
    }

    pub(crate) fn touch_at(&self, millis: i64) {
        self.last_action.store(millis, Ordering::SeqCst);
    }

    fn read_hand(&self) -> RwLockReadGuard<'_, Hand> {
        self.hand.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the cards held right now.
    pub fn hand(&self) -> Hand {
        self.read_hand().clone()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.read_hand().cards().to_vec()
    }

    pub fn add_card(&self, card: Card) {
        self.hand
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(card);
    }

    pub fn value(&self) -> u8 {
        self.read_hand().value()
    }

    pub fn kind(&self) -> HandKind {
        self.read_hand().classify(self.role())
    }

    /// `Waiting -> Playing`, stamping the last-action time.
    pub fn begin_turn(&self) -> Result<(), GameError> {
        self.status
            .compare_exchange(
                TurnStatus::Waiting as u8,
                TurnStatus::Playing as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|_| GameError::AlreadyPlayed)?;
        self.touch();
        Ok(())
    }

    /// `Playing -> Stood`. A hand still below the floor cannot stop.
    pub fn stand(&self) -> Result<(), GameError> {
        if self.status() != TurnStatus::Playing {
            return Err(GameError::NotYourTurn);
        }
        if self.kind() == HandKind::TooLow {
            return Err(GameError::HandTooLow);
        }
        self.status
            .compare_exchange(
                TurnStatus::Playing as u8,
                TurnStatus::Stood as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map(|_| ())
            .map_err(|_| GameError::NotYourTurn)
    }

    /// Stands regardless of the hand, used when a turn times out.
    pub(crate) fn force_stand(&self) {
        self.status
            .fetch_max(TurnStatus::Stood as u8, Ordering::SeqCst);
    }

    pub fn can_hit(&self) -> bool {
        let hand = self.read_hand();
        match hand.classify(self.role()) {
            HandKind::TooLow => true,
            HandKind::Normal => hand.value() < BEST_VALUE,
            _ => false,
        }
    }

    pub fn can_stand(&self) -> bool {
        self.kind() != HandKind::TooLow
    }

    /// Records the final reward and moves to `Done`.
    ///
    /// Settling an already settled seat returns the recorded reward and
    /// changes nothing. Unless forced, the seat must have stood.
    pub fn settle(&self, reward: i64, force: bool) -> Result<i64, GameError> {
        let status = self.status();
        if status == TurnStatus::Done {
            return Ok(self.reward());
        }
        if !force {
            match status {
                TurnStatus::Stood => {}
                s if s < TurnStatus::Stood => return Err(GameError::NotStandingYet),
                _ => return Err(GameError::AlreadySettled),
            }
        }
        self.reward.store(reward, Ordering::SeqCst);
        self.status.store(TurnStatus::Done as u8, Ordering::SeqCst);
        Ok(reward)
    }

    /// Whether the hand is shown face down to other players.
    ///
    /// The dealer reveals once their turn starts; everyone else once settled.
    pub fn is_censored(&self) -> bool {
        if self.is_dealer {
            self.status() < TurnStatus::Playing
        } else {
            self.status() != TurnStatus::Done
        }
    }

    pub fn render_hand(&self) -> String {
        self.read_hand().render(self.is_censored(), self.role())
    }

    pub fn render_open(&self) -> String {
        self.read_hand().render(false, self.role())
    }
}
