use crate::errors::{ErrorSeverity, IntoErrorReply};
use crate::events::{NoopObserver, TableObserver};
use crate::settings::{SettingsError, TableSettings};
use crate::store::{PlayerStore, StoreError};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use uuid::Uuid;
use xidach_ai::{BotAction, BotPlayer, SeatView};
use xidach_engine::cards::Card;
use xidach_engine::deck::Deck;
use xidach_engine::errors::{ErrorKind, GameError};
use xidach_engine::hand::HandKind;
use xidach_engine::logger::{timestamp, RoundSummary, SettlementRecord};
use xidach_engine::participant::Participant;
use xidach_engine::player::{Player, PlayerRole, PlayerStatus};
use xidach_engine::round::{Round, RoundStatus};
use xidach_engine::rules::{find_rule, Rule};

pub type RoundId = String;

type ObserverSlot = Arc<RwLock<Arc<dyn TableObserver>>>;

/// Where a round stands after a turn-ending action.
#[derive(Debug)]
pub enum Progress {
    /// The seat whose turn just began
    Turn(Arc<Participant>),
    /// The round was settled and persisted
    Finished(RoundSummary),
}

impl Progress {
    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished(_))
    }
}

/// Two-card hands that settle before normal turn order.
fn is_natural(kind: HandKind) -> bool {
    matches!(kind, HandKind::DoubleBlackJack | HandKind::BlackJack)
}

fn read_observer(slot: &ObserverSlot) -> Arc<dyn TableObserver> {
    Arc::clone(&slot.read().unwrap_or_else(PoisonError::into_inner))
}

/// Runs one table: the player registry, at most one open round, and the
/// pause gate for new rounds.
///
/// Observers are always called after the manager's and the round's locks
/// are released.
pub struct SessionManager {
    store: Arc<dyn PlayerStore>,
    settings: RwLock<TableSettings>,
    paused: AtomicBool,
    current: RwLock<Option<Arc<Round>>>,
    observer: ObserverSlot,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("paused", &self.is_paused())
            .field("current", &self.current_round().map(|r| r.id().to_string()))
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(store: Arc<dyn PlayerStore>, settings: TableSettings) -> Result<Self, TableError> {
        settings.validate()?;
        Ok(Self {
            store,
            settings: RwLock::new(settings),
            paused: AtomicBool::new(false),
            current: RwLock::new(None),
            observer: Arc::new(RwLock::new(Arc::new(NoopObserver))),
        })
    }

    /// Replaces the observer; the last registration wins.
    pub fn set_observer(&self, observer: Arc<dyn TableObserver>) {
        *self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = observer;
    }

    fn observer(&self) -> Arc<dyn TableObserver> {
        read_observer(&self.observer)
    }

    pub fn store(&self) -> Arc<dyn PlayerStore> {
        Arc::clone(&self.store)
    }

    pub fn settings(&self) -> Result<TableSettings, TableError> {
        self.settings
            .read()
            .map(|s| s.clone())
            .map_err(|_| TableError::StoragePoisoned)
    }

    fn store_failure(&self, operation: &'static str, err: StoreError) -> TableError {
        tracing::error!(operation, error = %err, "player store failure");
        TableError::Store(err)
    }

    fn rejected(round_id: &str, player_id: &str, err: GameError) -> TableError {
        tracing::debug!(
            round_id = %round_id,
            player_id = %player_id,
            error = %err,
            "action rejected"
        );
        TableError::Game(err)
    }

    fn player(&self, id: &str) -> Result<Player, TableError> {
        match self.store.get_by_id(id) {
            Ok(player) => Ok(player),
            Err(StoreError::NotFound(_)) => Err(TableError::PlayerNotFound(id.to_string())),
            Err(err) => Err(self.store_failure("get_by_id", err)),
        }
    }

    /// Returns the player and whether they were already registered and active.
    ///
    /// New players start with the configured initial balance; inactive ones
    /// are reactivated with their balance intact.
    pub fn register_player(
        &self,
        id: &str,
        name: &str,
        role: PlayerRole,
    ) -> Result<(Player, bool), TableError> {
        let player = match self.store.get_by_id(id) {
            Ok(player) if player.is_active() => return Ok((player, true)),
            Ok(_) => self
                .store
                .set_status(id, PlayerStatus::Active)
                .map_err(|e| self.store_failure("set_status", e))?,
            Err(StoreError::NotFound(_)) => {
                let settings = self.settings()?;
                let mut player =
                    Player::new(id, name, settings.initial_balance).with_role(role);
                player.rule_id = settings.default_rule_id;
                self.store
                    .save(&player)
                    .map_err(|e| self.store_failure("save", e))?;
                player
            }
            Err(err) => return Err(self.store_failure("get_by_id", err)),
        };

        tracing::info!(player_id = %player.id, name = %player.name, "player joined");
        self.observer().player_joined(&player);
        Ok((player, false))
    }

    /// Marks a player inactive. Not allowed while they sit in the open round.
    pub fn leave(&self, player_id: &str) -> Result<Player, TableError> {
        if let Some(round) = self.current_round() {
            if round.find_participant(player_id).is_some() {
                return Err(TableError::AlreadyInRound(player_id.to_string()));
            }
        }
        self.player(player_id)?;
        let player = self
            .store
            .set_status(player_id, PlayerStatus::Inactive)
            .map_err(|e| self.store_failure("set_status", e))?;

        tracing::info!(player_id = %player_id, "player left");
        self.observer().player_left(&player);
        Ok(player)
    }

    /// Opens a round dealt by `dealer_id`, using the dealer's chosen rule.
    pub fn new_round(&self, dealer_id: &str) -> Result<Arc<Round>, TableError> {
        if self.is_paused() {
            return Err(TableError::ServerPaused);
        }
        let dealer = self.player(dealer_id)?;
        let settings = self.settings()?;
        if dealer.balance < settings.min_deal as i64 {
            return Err(TableError::BalanceTooLow {
                balance: dealer.balance,
                minimum: settings.min_deal,
            });
        }
        let rule: Rule = find_rule(&dealer.rule_id)
            .or_else(|_| find_rule(&settings.default_rule_id))?
            .clone();

        let id = Uuid::new_v4().to_string();
        let round = Arc::new(Round::new(
            id.clone(),
            dealer,
            rule,
            settings.max_bet,
            settings.turn_timeout(),
        ));
        {
            let mut guard = self
                .current
                .write()
                .map_err(|_| TableError::StoragePoisoned)?;
            if let Some(active) = guard.as_ref() {
                return Err(TableError::RoundAlreadyActive(active.id().to_string()));
            }
            *guard = Some(Arc::clone(&round));
        }

        tracing::info!(
            round_id = %id,
            dealer_id = %dealer_id,
            rule_id = %round.rule().id,
            "new round created"
        );
        self.observer().new_round(&round);
        Ok(round)
    }

    pub fn current_round(&self) -> Option<Arc<Round>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The open round, provided its id matches.
    pub fn round(&self, round_id: &str) -> Result<Arc<Round>, TableError> {
        let guard = self
            .current
            .read()
            .map_err(|_| TableError::StoragePoisoned)?;
        match guard.as_ref() {
            Some(round) if round.id() == round_id => Ok(Arc::clone(round)),
            _ => Err(TableError::RoundNotFound(round_id.to_string())),
        }
    }

    pub fn find_participant(
        &self,
        round_id: &str,
        player_id: &str,
    ) -> Result<Arc<Participant>, TableError> {
        self.round(round_id)?
            .find_participant(player_id)
            .ok_or_else(|| TableError::Game(GameError::ParticipantNotFound(player_id.to_string())))
    }

    /// Places, replaces or (with `amount == 0`) withdraws a bet.
    pub fn bet(
        &self,
        round_id: &str,
        player_id: &str,
        amount: u64,
    ) -> Result<Option<Arc<Participant>>, TableError> {
        let round = self.round(round_id)?;
        let player = self.player(player_id)?;

        let seat = if amount == 0 {
            round
                .remove_player(player_id)
                .map_err(|e| Self::rejected(round_id, player_id, e))?;
            None
        } else {
            Some(
                round
                    .player_bet(&player, amount)
                    .map_err(|e| Self::rejected(round_id, player_id, e))?,
            )
        };

        tracing::debug!(round_id = %round_id, player_id = %player_id, amount, "bet placed");
        self.observer().bet_placed(&round, player_id, amount);
        Ok(seat)
    }

    /// Shuffles a fresh deck and deals. Call [`SessionManager::start`] next.
    pub fn deal(&self, round_id: &str) -> Result<(), TableError> {
        let mut deck = Deck::new();
        deck.shuffle();
        self.deal_with_deck(round_id, deck)
    }

    pub fn deal_with_deck(&self, round_id: &str, deck: Deck) -> Result<(), TableError> {
        let round = self.round(round_id)?;
        self.bridge_turns(&round);
        round.deal_with_deck(deck).map_err(|e| {
            tracing::debug!(round_id = %round_id, error = %e, "deal rejected");
            TableError::Game(e)
        })?;

        tracing::info!(
            round_id = %round_id,
            participants = round.participants().len(),
            total_bet = round.total_bet(),
            "round dealt"
        );
        Ok(())
    }

    /// Forwards the round's turn notifications to the current observer.
    /// The round only holds a weak reference back to itself.
    fn bridge_turns(&self, round: &Arc<Round>) {
        let weak = Arc::downgrade(round);
        let slot = Arc::clone(&self.observer);
        round.on_turn_started(Arc::new(move |seat: &Arc<Participant>| {
            if let Some(round) = weak.upgrade() {
                read_observer(&slot).turn_started(&round, seat);
            }
        }));
    }

    /// Settles naturals, then hands the first turn out.
    ///
    /// A dealer natural finishes the round at once. A participant natural is
    /// settled against the dealer's two cards before anyone plays.
    pub fn start(&self, round_id: &str) -> Result<Progress, TableError> {
        let round = self.round(round_id)?;
        match round.status() {
            RoundStatus::Betting => return Err(TableError::NotDealt(round_id.to_string())),
            RoundStatus::Playing if round.current_playing().is_none() => {}
            _ => return Err(TableError::Game(GameError::RoundAlreadyStarted)),
        }

        let dealer = round.dealer();
        if is_natural(dealer.kind()) {
            tracing::info!(
                round_id = %round_id,
                kind = ?dealer.kind(),
                "dealer natural, settling everyone"
            );
            return self.finish(round_id, true).map(Progress::Finished);
        }

        for seat in round.participants() {
            if is_natural(seat.kind()) {
                let gain = round.settle(&seat, true)?;
                tracing::info!(
                    round_id = %round_id,
                    player_id = %seat.id(),
                    dealer_gain = gain,
                    "participant natural settled early"
                );
            }
        }
        if round.is_finished() {
            return self.finish(round_id, true).map(Progress::Finished);
        }

        Ok(Progress::Turn(round.advance_turn()?))
    }

    pub fn hit(&self, round_id: &str, player_id: &str) -> Result<Card, TableError> {
        let round = self.round(round_id)?;
        let seat = self.find_participant(round_id, player_id)?;
        let card = round
            .hit(&seat)
            .map_err(|e| Self::rejected(round_id, player_id, e))?;

        tracing::debug!(
            round_id = %round_id,
            player_id = %player_id,
            cards = seat.cards().len(),
            "hit"
        );
        self.observer().hit(&round, &seat, card);
        Ok(card)
    }

    /// Ends the caller's turn. A participant hands the turn on; the dealer
    /// settles every remaining participant and the round finishes.
    pub fn stand(&self, round_id: &str, player_id: &str) -> Result<Progress, TableError> {
        let round = self.round(round_id)?;
        let seat = self.find_participant(round_id, player_id)?;
        round
            .stand(&seat)
            .map_err(|e| Self::rejected(round_id, player_id, e))?;

        tracing::debug!(round_id = %round_id, player_id = %player_id, value = seat.value(), "stood");
        self.observer().stood(&round, &seat);

        if seat.is_dealer() {
            return self.finish(round_id, true).map(Progress::Finished);
        }
        Ok(Progress::Turn(round.advance_turn()?))
    }

    /// The dealer reveals against one stood participant.
    ///
    /// Returns the dealer's gain, plus the summary if that was the last
    /// pending settlement.
    pub fn compare(
        &self,
        round_id: &str,
        dealer_id: &str,
        participant_id: &str,
    ) -> Result<(i64, Option<RoundSummary>), TableError> {
        let round = self.round(round_id)?;
        let dealer = round.dealer();
        if dealer.id() != dealer_id {
            return Err(TableError::NotDealer(dealer_id.to_string()));
        }
        if round.status() != RoundStatus::DealerPlaying {
            return Err(Self::rejected(round_id, dealer_id, GameError::NotYourTurn));
        }
        if !dealer.can_stand() {
            return Err(Self::rejected(round_id, dealer_id, GameError::CannotStand));
        }
        let seat = round
            .find_participant(participant_id)
            .filter(|s| !s.is_dealer())
            .ok_or_else(|| GameError::ParticipantNotFound(participant_id.to_string()))?;

        let gain = round
            .settle(&seat, false)
            .map_err(|e| Self::rejected(round_id, participant_id, e))?;
        tracing::info!(
            round_id = %round_id,
            player_id = %participant_id,
            dealer_gain = gain,
            "dealer compared"
        );

        if round.is_finished() {
            let summary = self.finish(round_id, true)?;
            return Ok((gain, Some(summary)));
        }
        Ok((gain, None))
    }

    /// Times out whoever holds the turn.
    pub fn pass(&self, round_id: &str) -> Result<Progress, TableError> {
        self.pass_at(round_id, Utc::now().timestamp_millis())
    }

    /// [`SessionManager::pass`] evaluated at `now_ms` (unix millis).
    pub fn pass_at(&self, round_id: &str, now_ms: i64) -> Result<Progress, TableError> {
        let round = self.round(round_id)?;
        let seat = round
            .current_playing()
            .ok_or_else(|| TableError::NoActiveTurn(round_id.to_string()))?;
        round.pass_at(&seat, now_ms)?;

        tracing::info!(
            round_id = %round_id,
            player_id = %seat.id(),
            is_dealer = seat.is_dealer(),
            "turn timed out"
        );
        self.observer().stood(&round, &seat);

        if round.is_finished() {
            return self.finish(round_id, true).map(Progress::Finished);
        }
        round
            .current_playing()
            .map(Progress::Turn)
            .ok_or_else(|| TableError::NoActiveTurn(round_id.to_string()))
    }

    /// Plays the current seat's turn to its end with `bot`.
    pub fn play_bot_turn(
        &self,
        round_id: &str,
        bot: &dyn BotPlayer,
    ) -> Result<Progress, TableError> {
        let round = self.round(round_id)?;
        let seat = round
            .current_playing()
            .ok_or_else(|| TableError::NoActiveTurn(round_id.to_string()))?;
        loop {
            let view = SeatView::of(&seat);
            let action = match bot.decide(&view) {
                BotAction::Hit if view.can_hit => BotAction::Hit,
                BotAction::Stand if view.can_stand => BotAction::Stand,
                _ if view.can_stand => BotAction::Stand,
                _ => BotAction::Hit,
            };
            match action {
                BotAction::Hit => {
                    self.hit(round_id, seat.id())?;
                }
                BotAction::Stand => return self.stand(round_id, seat.id()),
            }
        }
    }

    /// Settles every seat, books the rewards and closes the round.
    ///
    /// Without `force`, every participant must have stood. Store failures are
    /// logged and the first one is returned, but the round is closed either way.
    pub fn finish(&self, round_id: &str, force: bool) -> Result<RoundSummary, TableError> {
        let round = self.round(round_id)?;
        if round.status() == RoundStatus::Betting {
            return Err(TableError::NotDealt(round_id.to_string()));
        }
        for seat in round.participants() {
            round
                .settle(&seat, force)
                .map_err(|e| Self::rejected(round_id, seat.id(), e))?;
        }

        // only the caller that takes the round out books it
        let taken = {
            let mut guard = self
                .current
                .write()
                .map_err(|_| TableError::StoragePoisoned)?;
            match guard.as_ref() {
                Some(r) if r.id() == round_id => guard.take(),
                _ => None,
            }
        };
        let round = taken.ok_or_else(|| TableError::RoundNotFound(round_id.to_string()))?;

        let mut summary = RoundSummary::from_round(&round);
        let ts = timestamp();
        summary.ts = Some(ts.clone());
        let mut first_error = None;
        for record in &mut summary.results {
            record.ts = Some(ts.clone());
            if let Err(err) = self.book(record) {
                first_error.get_or_insert(err);
            }
        }

        tracing::info!(
            round_id = %round_id,
            dealer_reward = round.dealer().reward(),
            net = summary.net(),
            "round finished"
        );
        self.observer().round_finished(&round);

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }

    fn book(&self, record: &SettlementRecord) -> Result<(), TableError> {
        self.store
            .add_balance(&record.player_id, record.reward)
            .map_err(|e| self.store_failure("add_balance", e))?;
        self.store
            .save_history_record(record)
            .map_err(|e| self.store_failure("save_history_record", e))
    }

    /// Drops the open round without settling anything.
    pub fn cancel(&self, round_id: &str) -> Result<(), TableError> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| TableError::StoragePoisoned)?;
        match guard.as_ref() {
            Some(r) if r.id() == round_id => {
                guard.take();
                tracing::info!(round_id = %round_id, "round cancelled");
                Ok(())
            }
            _ => Err(TableError::RoundNotFound(round_id.to_string())),
        }
    }

    /// Stops new rounds from opening. The open round plays on.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        tracing::info!("table paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        tracing::info!("table resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn deposit(&self, player_id: &str, amount: i64) -> Result<Player, TableError> {
        self.player(player_id)?;
        let player = self
            .store
            .add_balance(player_id, amount)
            .map_err(|e| self.store_failure("add_balance", e))?;
        tracing::info!(
            player_id = %player_id,
            amount,
            balance = player.balance,
            "deposit"
        );
        Ok(player)
    }

    pub fn reset_balances(&self, balance: i64) -> Result<(), TableError> {
        self.store
            .reset_balances(balance)
            .map_err(|e| self.store_failure("reset_balances", e))?;
        tracing::info!(balance, "balances reset");
        Ok(())
    }

    /// Updates the ceiling for new rounds and for the open one.
    pub fn set_max_bet(&self, amount: u64) -> Result<(), TableError> {
        if amount == 0 {
            return Err(SettingsError::InvalidValue("max_bet must be greater than 0".into()).into());
        }
        self.settings
            .write()
            .map_err(|_| TableError::StoragePoisoned)?
            .max_bet = amount;
        if let Some(round) = self.current_round() {
            round.set_max_bet(amount);
        }
        tracing::info!(max_bet = amount, "max bet updated");
        Ok(())
    }

    /// Picks the rule used whenever `player_id` deals.
    pub fn set_rule(&self, player_id: &str, rule_id: &str) -> Result<Player, TableError> {
        find_rule(rule_id)?;
        let mut player = self.player(player_id)?;
        player.rule_id = rule_id.to_string();
        self.store
            .save(&player)
            .map_err(|e| self.store_failure("save", e))?;
        Ok(player)
    }

    pub fn player_history(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<SettlementRecord>, TableError> {
        self.store
            .list_history(player_id, limit)
            .map_err(|e| self.store_failure("list_history", e))
    }

    pub fn active_players(&self) -> Result<Vec<Player>, TableError> {
        self.store
            .list_active()
            .map_err(|e| self.store_failure("list_active", e))
    }

    pub fn all_players(&self) -> Result<Vec<Player>, TableError> {
        self.store
            .list_all()
            .map_err(|e| self.store_failure("list_all", e))
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Player store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("The table is paused")]
    ServerPaused,
    #[error("Balance {balance} is below the {minimum} needed to deal")]
    BalanceTooLow { balance: i64, minimum: u64 },
    #[error("Round already active: {0}")]
    RoundAlreadyActive(RoundId),
    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),
    #[error("Round has not been dealt: {0}")]
    NotDealt(RoundId),
    #[error("No turn in progress in round {0}")]
    NoActiveTurn(RoundId),
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Player {0} is not the dealer")]
    NotDealer(String),
    #[error("Player {0} is seated in the open round")]
    AlreadyInRound(String),
    #[error("Table storage poisoned")]
    StoragePoisoned,
}

impl TableError {
    /// Taxonomy bucket, `None` for infrastructure failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TableError::Game(e) => Some(e.kind()),
            TableError::Store(StoreError::NotFound(_))
            | TableError::RoundNotFound(_)
            | TableError::PlayerNotFound(_) => Some(ErrorKind::NotFound),
            TableError::ServerPaused => Some(ErrorKind::ServerPaused),
            TableError::BalanceTooLow { .. } | TableError::Settings(_) => {
                Some(ErrorKind::Validation)
            }
            TableError::RoundAlreadyActive(_)
            | TableError::NotDealt(_)
            | TableError::NoActiveTurn(_)
            | TableError::NotDealer(_)
            | TableError::AlreadyInRound(_) => Some(ErrorKind::StateConflict),
            TableError::Store(StoreError::Backend(_)) | TableError::StoragePoisoned => None,
        }
    }
}

fn game_error_code(err: &GameError) -> &'static str {
    match err {
        GameError::InvalidCard { .. } => "invalid_card",
        GameError::RuleNotFound(_) => "rule_not_found",
        GameError::RoundAlreadyStarted => "round_already_started",
        GameError::RoundNotDealt => "round_not_dealt",
        GameError::RoundFinished => "round_finished",
        GameError::NoParticipants => "no_participants",
        GameError::InvalidBetAmount { .. } => "invalid_bet_amount",
        GameError::BetTooHigh { .. } => "bet_too_high",
        GameError::InsufficientBalance { .. } => "insufficient_balance",
        GameError::DealerCannotBet => "dealer_cannot_bet",
        GameError::AlreadyPlayed => "already_played",
        GameError::NotYourTurn => "not_your_turn",
        GameError::HandTooLow => "hand_too_low",
        GameError::CannotHit => "cannot_hit",
        GameError::CannotStand => "cannot_stand",
        GameError::NotStandingYet => "not_standing_yet",
        GameError::AlreadySettled => "already_settled",
        GameError::NotTimedOut => "not_timed_out",
        GameError::ParticipantNotFound(_) => "participant_not_found",
        GameError::DeckExhausted => "deck_exhausted",
    }
}

impl IntoErrorReply for TableError {
    fn error_code(&self) -> &'static str {
        match self {
            TableError::Game(e) => game_error_code(e),
            TableError::Store(StoreError::NotFound(_)) => "player_not_found",
            TableError::Store(StoreError::Backend(_)) => "store_error",
            TableError::Settings(_) => "invalid_settings",
            TableError::ServerPaused => "server_paused",
            TableError::BalanceTooLow { .. } => "balance_too_low",
            TableError::RoundAlreadyActive(_) => "round_already_active",
            TableError::RoundNotFound(_) => "round_not_found",
            TableError::NotDealt(_) => "round_not_dealt",
            TableError::NoActiveTurn(_) => "no_active_turn",
            TableError::PlayerNotFound(_) => "player_not_found",
            TableError::NotDealer(_) => "not_dealer",
            TableError::AlreadyInRound(_) => "already_in_round",
            TableError::StoragePoisoned => "table_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            TableError::Game(GameError::BetTooHigh { amount, max }) => Some(serde_json::json!({
                "amount": amount,
                "max": max
            })),
            TableError::Game(GameError::InsufficientBalance { balance, required }) => {
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                }))
            }
            TableError::BalanceTooLow { balance, minimum } => Some(serde_json::json!({
                "balance": balance,
                "minimum": minimum
            })),
            TableError::RoundNotFound(id) | TableError::RoundAlreadyActive(id) => {
                Some(serde_json::json!({ "round_id": id }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            TableError::StoragePoisoned => ErrorSeverity::Critical,
            TableError::Store(StoreError::Backend(_)) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}
