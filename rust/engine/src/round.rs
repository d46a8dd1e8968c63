use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{compare_hands, Outcome, Role};
use crate::logger::SettlementRecord;
use crate::participant::{now_millis, Participant, TurnStatus};
use crate::player::Player;
use crate::rules::Rule;

/// Multiplier applied to the turn timeout while the dealer is playing.
pub const DEALER_TIMEOUT_FACTOR: u64 = 5;

/// Invoked with the seat whose turn just started.
pub type TurnCallback = Arc<dyn Fn(&Arc<Participant>) + Send + Sync>;

/// Round lifecycle. Strictly forward, a new round is a new instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RoundStatus {
    Betting = 0,
    Playing = 1,
    DealerPlaying = 2,
    Finished = 3,
}

impl RoundStatus {
    fn from_u8(v: u8) -> RoundStatus {
        match v {
            0 => RoundStatus::Betting,
            1 => RoundStatus::Playing,
            2 => RoundStatus::DealerPlaying,
            _ => RoundStatus::Finished,
        }
    }
}

struct Table {
    dealer: Arc<Participant>,
    /// Seating order is turn order
    participants: Vec<Arc<Participant>>,
    deck: Deck,
    /// -1 before the first turn, `participants.len()` or more once the dealer plays
    cursor: isize,
    on_turn: Option<TurnCallback>,
}

impl Table {
    fn find(&self, id: &str) -> Option<&Arc<Participant>> {
        if self.dealer.id() == id {
            return Some(&self.dealer);
        }
        self.participants.iter().find(|p| p.id() == id)
    }

    fn current(&self) -> Option<&Arc<Participant>> {
        if self.cursor < 0 {
            None
        } else if (self.cursor as usize) < self.participants.len() {
            Some(&self.participants[self.cursor as usize])
        } else {
            Some(&self.dealer)
        }
    }

    fn total_bet(&self) -> u64 {
        self.participants.iter().map(|p| p.bet()).sum()
    }
}

/// One deal-to-settlement cycle.
///
/// Structural state (deck, seats, turn cursor, turn callback) lives behind a
/// single lock. Status, pending settlements, max bet and timeout are atomics
/// so status checks never contend with it.
pub struct Round {
    id: String,
    rule: Rule,
    table: RwLock<Table>,
    status: AtomicU8,
    pending: AtomicUsize,
    max_bet: AtomicU64,
    timeout_ms: AtomicU64,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("id", &self.id)
            .field("rule", &self.rule.id)
            .field("status", &self.status())
            .field("pending", &self.pending_settlements())
            .finish_non_exhaustive()
    }
}

impl Round {
    pub fn new(
        id: impl Into<String>,
        dealer: Player,
        rule: Rule,
        max_bet: u64,
        timeout: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            rule,
            table: RwLock::new(Table {
                dealer: Arc::new(Participant::dealer(dealer)),
                participants: Vec::new(),
                deck: Deck::from_cards(Vec::new()),
                cursor: -1,
                on_turn: None,
            }),
            status: AtomicU8::new(RoundStatus::Betting as u8),
            pending: AtomicUsize::new(0),
            max_bet: AtomicU64::new(max_bet),
            timeout_ms: AtomicU64::new(timeout.as_millis() as u64),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    fn advance_status(&self, to: RoundStatus) {
        self.status.fetch_max(to as u8, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.status() == RoundStatus::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.status() == RoundStatus::Finished
    }

    /// Participants not yet settled.
    pub fn pending_settlements(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn max_bet(&self) -> u64 {
        self.max_bet.load(Ordering::SeqCst)
    }

    pub fn set_max_bet(&self, max_bet: u64) {
        self.max_bet.store(max_bet, Ordering::SeqCst);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.load(Ordering::SeqCst))
    }

    pub fn dealer(&self) -> Arc<Participant> {
        Arc::clone(&self.read().dealer)
    }

    /// Participants in seating order, dealer excluded.
    pub fn participants(&self) -> Vec<Arc<Participant>> {
        self.read().participants.clone()
    }

    /// Participants in seating order followed by the dealer.
    pub fn all_participants(&self) -> Vec<Arc<Participant>> {
        let table = self.read();
        let mut all = table.participants.clone();
        all.push(Arc::clone(&table.dealer));
        all
    }

    /// Looks up a seat by player id, dealer included.
    pub fn find_participant(&self, player_id: &str) -> Option<Arc<Participant>> {
        self.read().find(player_id).cloned()
    }

    /// The seat under the turn cursor, `None` before the first turn.
    pub fn current_playing(&self) -> Option<Arc<Participant>> {
        self.read().current().cloned()
    }

    pub fn total_bet(&self) -> u64 {
        self.read().total_bet()
    }

    pub fn remaining_cards(&self) -> usize {
        self.read().deck.remaining()
    }

    /// Registers the per-turn callback, replacing any previous one.
    pub fn on_turn_started(&self, callback: TurnCallback) {
        self.write().on_turn = Some(callback);
    }

    /// Places or replaces `player`'s bet.
    pub fn player_bet(&self, player: &Player, amount: u64) -> Result<Arc<Participant>, GameError> {
        if self.status() != RoundStatus::Betting {
            return Err(GameError::RoundAlreadyStarted);
        }
        if amount == 0 {
            return Err(GameError::InvalidBetAmount { amount });
        }
        if player.balance < 0 || (player.balance as u64) < amount {
            return Err(GameError::InsufficientBalance {
                balance: player.balance,
                required: amount,
            });
        }
        let max = self.max_bet();
        if amount > max {
            return Err(GameError::BetTooHigh { amount, max });
        }

        let mut table = self.write();
        // re-checked under the lock so a bet cannot slip in after the deal
        let status = self.status();
        if let Some(existing) = table.find(&player.id) {
            if existing.is_dealer() {
                return Err(GameError::DealerCannotBet);
            }
            existing.place_bet(amount, status)?;
            return Ok(Arc::clone(existing));
        }
        if status != RoundStatus::Betting {
            return Err(GameError::RoundAlreadyStarted);
        }
        let seat = Arc::new(Participant::new(player.clone(), amount, false));
        table.participants.push(Arc::clone(&seat));
        Ok(seat)
    }

    /// Withdraws a participant before the deal.
    pub fn remove_player(&self, player_id: &str) -> Result<(), GameError> {
        let mut table = self.write();
        if self.status() != RoundStatus::Betting {
            return Err(GameError::RoundAlreadyStarted);
        }
        let idx = table
            .participants
            .iter()
            .position(|p| p.id() == player_id)
            .ok_or_else(|| GameError::ParticipantNotFound(player_id.to_string()))?;
        table.participants.remove(idx);
        Ok(())
    }

    /// Shuffles a fresh deck and deals two cards to every seat.
    pub fn deal(&self) -> Result<(), GameError> {
        let mut deck = Deck::new();
        deck.shuffle();
        self.deal_with_deck(deck)
    }

    /// Deals from `deck` as given, front first.
    ///
    /// Cards go out interleaved: dealer, each participant, dealer again, each
    /// participant again. The status check and the move to `Playing` happen
    /// under one exclusive lock, so concurrent deals cannot both succeed.
    pub fn deal_with_deck(&self, mut deck: Deck) -> Result<(), GameError> {
        let mut table = self.write();
        if self.status() != RoundStatus::Betting {
            return Err(GameError::RoundAlreadyStarted);
        }
        if table.participants.is_empty() {
            return Err(GameError::NoParticipants);
        }
        let seats = table.participants.len() + 1;
        if deck.remaining() < seats * 2 {
            return Err(GameError::DeckExhausted);
        }

        for _ in 0..2 {
            let seating = std::iter::once(&table.dealer).chain(table.participants.iter());
            for seat in seating {
                let card = deck.deal_card().ok_or(GameError::DeckExhausted)?;
                seat.add_card(card);
            }
        }
        table.deck = deck;
        self.pending
            .store(table.participants.len(), Ordering::SeqCst);
        self.advance_status(RoundStatus::Playing);
        Ok(())
    }

    /// Takes the next card off the deck.
    pub fn remove_card(&self) -> Result<Card, GameError> {
        self.write()
            .deck
            .deal_card()
            .ok_or(GameError::DeckExhausted)
    }

    fn advance_locked(&self, table: &mut Table) -> Result<Arc<Participant>, GameError> {
        loop {
            table.cursor += 1;
            let idx = table.cursor as usize;
            if idx < table.participants.len() {
                let seat = &table.participants[idx];
                if seat.is_done() {
                    continue;
                }
                seat.begin_turn()?;
                return Ok(Arc::clone(seat));
            }
            self.advance_status(RoundStatus::DealerPlaying);
            table.dealer.begin_turn()?;
            return Ok(Arc::clone(&table.dealer));
        }
    }

    fn notify_turn(callback: Option<TurnCallback>, seat: &Arc<Participant>) {
        if let Some(cb) = callback {
            cb(seat);
        }
    }

    /// Moves the turn cursor to the next unsettled participant, or to the
    /// dealer once every participant has had a turn.
    ///
    /// The turn callback runs after the lock is released, so it may call
    /// back into the round.
    pub fn advance_turn(&self) -> Result<Arc<Participant>, GameError> {
        let (seat, callback) = {
            let mut table = self.write();
            match self.status() {
                RoundStatus::Betting => return Err(GameError::RoundNotDealt),
                RoundStatus::Finished => return Err(GameError::RoundFinished),
                RoundStatus::Playing | RoundStatus::DealerPlaying => {}
            }
            let seat = self.advance_locked(&mut table)?;
            (seat, table.on_turn.clone())
        };
        Self::notify_turn(callback, &seat);
        Ok(seat)
    }

    fn ensure_turn(table: &Table, seat: &Participant) -> Result<(), GameError> {
        match table.current() {
            Some(current) if current.id() == seat.id() => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    /// Stands for the seat under the turn cursor. Does not advance the turn.
    pub fn stand(&self, seat: &Participant) -> Result<(), GameError> {
        let table = self.read();
        Self::ensure_turn(&table, seat)?;
        seat.stand()
    }

    /// Draws one card for the seat under the turn cursor.
    pub fn hit(&self, seat: &Participant) -> Result<Card, GameError> {
        let mut table = self.write();
        Self::ensure_turn(&table, seat)?;
        if seat.status() != TurnStatus::Playing {
            return Err(GameError::NotYourTurn);
        }
        if !seat.can_hit() {
            return Err(GameError::CannotHit);
        }
        let card = table.deck.deal_card().ok_or(GameError::DeckExhausted)?;
        seat.add_card(card);
        seat.touch();
        Ok(card)
    }

    /// Forces a timed-out seat to stand.
    pub fn pass(&self, seat: &Participant) -> Result<(), GameError> {
        self.pass_at(seat, now_millis())
    }

    /// [`Round::pass`] evaluated at `now_ms` (unix millis).
    ///
    /// The dealer gets five times the normal timeout. A passed dealer ends the
    /// round; a passed participant hands the turn on.
    pub fn pass_at(&self, seat: &Participant, now_ms: i64) -> Result<(), GameError> {
        let (next, callback) = {
            let mut table = self.write();
            Self::ensure_turn(&table, seat)?;
            if seat.status() != TurnStatus::Playing {
                return Err(GameError::NotYourTurn);
            }
            let mut need = self.timeout_ms.load(Ordering::SeqCst);
            if seat.is_dealer() {
                need = need.saturating_mul(DEALER_TIMEOUT_FACTOR);
            }
            let elapsed = now_ms.saturating_sub(seat.last_action_millis());
            if elapsed < 0 || (elapsed as u64) < need {
                return Err(GameError::NotTimedOut);
            }
            seat.force_stand();
            if seat.is_dealer() {
                self.advance_status(RoundStatus::Finished);
                return Ok(());
            }
            let next = self.advance_locked(&mut table)?;
            (next, table.on_turn.clone())
        };
        Self::notify_turn(callback, &next);
        Ok(())
    }

    /// Settles one participant against the dealer's current hand.
    ///
    /// Returns the dealer's gain from this seat. Settling twice returns the
    /// recorded amount again without touching any state. The round finishes
    /// when the last pending participant is settled. Nothing settles before
    /// the deal.
    pub fn settle(&self, seat: &Participant, force: bool) -> Result<i64, GameError> {
        let table = self.write();
        if self.status() == RoundStatus::Betting {
            return Err(GameError::RoundNotDealt);
        }
        if seat.is_dealer() {
            return Ok(seat.reward());
        }
        if seat.is_done() {
            return Ok(-seat.reward());
        }
        if table.find(seat.id()).is_none() {
            return Err(GameError::ParticipantNotFound(seat.id().to_string()));
        }
        let gain = reward(&self.rule, &table.dealer, seat);
        seat.settle(-gain, force)?;
        table.dealer.add_reward(gain);
        let left = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map_or(0, |prev| prev - 1);
        if left == 0 {
            self.advance_status(RoundStatus::Finished);
        }
        Ok(gain)
    }

    /// One record per participant followed by the dealer.
    pub fn results(&self) -> Vec<SettlementRecord> {
        self.all_participants()
            .iter()
            .map(|p| SettlementRecord {
                round_id: self.id.clone(),
                player_id: p.id().to_string(),
                name: p.name().to_string(),
                reward: p.reward(),
                kind: p.kind(),
                value: p.value(),
                is_dealer: p.is_dealer(),
                ts: None,
            })
            .collect()
    }

    /// Dealer and bets, shown while the round takes bets.
    pub fn preparing_board(&self) -> String {
        let table = self.read();
        let mut out = format!("Dealer: {}\n", table.dealer.name());
        let _ = write!(
            out,
            "Participants ({} - {}):",
            table.participants.len(),
            table.total_bet()
        );
        if table.participants.is_empty() {
            out.push_str("\n(nobody yet)");
        }
        for p in &table.participants {
            let _ = write!(out, "\n  - {}: {}", p.name(), p.bet());
        }
        out
    }

    /// Hands as other players see them during play.
    pub fn current_board(&self) -> String {
        let table = self.read();
        let mut out = format!("Dealer: {}\n", table.dealer.render_hand());
        let _ = write!(
            out,
            "Participants ({} - {}):",
            table.participants.len(),
            table.total_bet()
        );
        if table.participants.is_empty() {
            out.push_str("\n(nobody yet)");
        }
        for p in &table.participants {
            let _ = write!(out, "\n  - {}: {}", p.name(), p.render_hand());
        }
        out
    }

    /// Every hand face up with rewards and resulting balances.
    pub fn result_board(&self) -> String {
        let table = self.read();
        let dealer = &table.dealer;
        let mut out = format!("Dealer: {}\n", dealer.render_open());
        let _ = write!(
            out,
            "Participants ({} - {}):",
            table.participants.len(),
            table.total_bet()
        );
        for p in &table.participants {
            let _ = write!(out, "\n  - {}: {}", p.name(), p.render_open());
        }
        let _ = write!(
            out,
            "\n\nRewards:\n\nDealer ({}): {} ({})\nParticipants:",
            dealer.name(),
            dealer.reward(),
            dealer.player().balance + dealer.reward()
        );
        for p in &table.participants {
            let _ = write!(
                out,
                "\n  - {}: {} ({})",
                p.name(),
                p.reward(),
                p.player().balance + p.reward()
            );
        }
        out
    }
}

/// Compares two seats, each hand classified with its own role.
pub fn compare(a: &Participant, b: &Participant) -> Outcome {
    compare_hands(&a.hand(), a.role(), &b.hand(), b.role())
}

/// The dealer's gain against one participant under `rule`.
///
/// Positive when the dealer wins, negative when the participant wins, zero on
/// a draw. The winner's own kind picks the multiplier from the winner's table.
///
/// ```
/// use xidach_engine::cards::cards_from_ids;
/// use xidach_engine::participant::Participant;
/// use xidach_engine::player::Player;
/// use xidach_engine::round::reward;
/// use xidach_engine::rules::default_rule;
///
/// let dealer = Participant::dealer(Player::new("d", "dealer", 5_000));
/// let seat = Participant::new(Player::new("p", "player", 100), 1, false);
/// for c in cards_from_ids(&[0, 9]).unwrap() { dealer.add_card(c); }
/// for c in cards_from_ids(&[4, 12]).unwrap() { seat.add_card(c); }
/// assert_eq!(reward(default_rule(), &dealer, &seat), 2);
/// ```
pub fn reward(rule: &Rule, dealer: &Participant, participant: &Participant) -> i64 {
    let bet = participant.bet() as i64;
    match compare(dealer, participant) {
        Outcome::Draw => 0,
        Outcome::Win => bet.saturating_mul(rule.multiplier(Role::Dealer, dealer.kind()) as i64),
        Outcome::Lose => -bet.saturating_mul(
            rule.multiplier(Role::Participant, participant.kind()) as i64,
        ),
    }
}
