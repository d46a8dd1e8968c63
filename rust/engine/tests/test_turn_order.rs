use std::sync::{Arc, Mutex};
use std::time::Duration;

use xidach_engine::cards::cards_from_ids;
use xidach_engine::deck::Deck;
use xidach_engine::errors::GameError;
use xidach_engine::participant::{Participant, TurnStatus};
use xidach_engine::player::Player;
use xidach_engine::round::{Round, RoundStatus};
use xidach_engine::rules::default_rule;

fn round_with(bets: &[(&str, u64)]) -> Round {
    let round = Round::new(
        "r",
        Player::new("dealer", "Dealer", 10_000),
        default_rule().clone(),
        200,
        Duration::from_secs(60),
    );
    for (id, bet) in bets {
        round.player_bet(&Player::new(*id, *id, 1_000), *bet).unwrap();
    }
    round
}

/// Dealer 10,8 = 18; a: 10,9 = 19; b: 10,7 = 17; then a 2 on top of the deck.
fn fixed_deck() -> Deck {
    Deck::from_cards(cards_from_ids(&[9, 22, 35, 7, 21, 32, 1, 14]).unwrap())
}

#[test]
fn advance_visits_participants_then_dealer() {
    let round = round_with(&[("a", 10), ("b", 10)]);
    round.deal_with_deck(fixed_deck()).unwrap();
    assert!(round.current_playing().is_none());

    let first = round.advance_turn().unwrap();
    assert_eq!(first.id(), "a");
    assert_eq!(first.status(), TurnStatus::Playing);
    first.stand().unwrap();

    let second = round.advance_turn().unwrap();
    assert_eq!(second.id(), "b");
    second.stand().unwrap();

    let dealer = round.advance_turn().unwrap();
    assert!(dealer.is_dealer());
    assert_eq!(round.status(), RoundStatus::DealerPlaying);
    assert_eq!(round.advance_turn().unwrap_err(), GameError::AlreadyPlayed);
}

#[test]
fn advance_skips_settled_participants() {
    let round = round_with(&[("a", 10), ("b", 10), ("c", 10)]);
    round.deal().unwrap();
    let b = round.find_participant("b").unwrap();
    round.settle(&b, true).unwrap();

    let visited: Vec<String> = (0..3)
        .map(|_| round.advance_turn().unwrap().id().to_string())
        .collect();
    assert_eq!(visited, vec!["a", "c", "dealer"]);
}

#[test]
fn turn_callback_runs_outside_the_lock() {
    let round = Arc::new(round_with(&[("a", 10), ("b", 10)]));
    round.deal_with_deck(fixed_deck()).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let weak = Arc::downgrade(&round);
    let sink = Arc::clone(&seen);
    round.on_turn_started(Arc::new(move |seat: &Arc<Participant>| {
        // reading the round here would deadlock if the lock were still held
        if let Some(r) = weak.upgrade() {
            let current = r.current_playing().map(|p| p.id().to_string());
            assert_eq!(current.as_deref(), Some(seat.id()));
        }
        sink.lock().unwrap().push(seat.id().to_string());
    }));

    round.advance_turn().unwrap().stand().unwrap();
    round.advance_turn().unwrap().stand().unwrap();
    round.advance_turn().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "dealer"]);
}

#[test]
fn only_the_current_seat_may_act() {
    let round = round_with(&[("a", 10), ("b", 10)]);
    round.deal_with_deck(fixed_deck()).unwrap();
    let a = round.find_participant("a").unwrap();
    let b = round.find_participant("b").unwrap();

    assert_eq!(round.stand(&a), Err(GameError::NotYourTurn));
    round.advance_turn().unwrap();
    assert_eq!(round.stand(&b), Err(GameError::NotYourTurn));
    assert_eq!(round.hit(&b), Err(GameError::NotYourTurn));

    let card = round.hit(&a).unwrap();
    assert_eq!(card.id(), 1);
    assert_eq!(a.cards().len(), 3);
    assert_eq!(a.value(), 21);
    assert_eq!(round.hit(&a), Err(GameError::CannotHit));
    round.stand(&a).unwrap();
    assert_eq!(round.hit(&a), Err(GameError::NotYourTurn));
}

#[test]
fn pass_requires_the_timeout_to_elapse() {
    let round = round_with(&[("a", 10), ("b", 10)]);
    round.deal_with_deck(fixed_deck()).unwrap();
    let a = round.advance_turn().unwrap();
    let started = a.last_action_millis();

    assert_eq!(round.pass_at(&a, started + 59_000), Err(GameError::NotTimedOut));
    round.pass_at(&a, started + 60_000).unwrap();
    assert_eq!(a.status(), TurnStatus::Stood);
    assert_eq!(round.current_playing().unwrap().id(), "b");
}

#[test]
fn pass_ignores_the_floor() {
    // a holds 2,3: too low to stand normally
    let round = round_with(&[("a", 10)]);
    round
        .deal_with_deck(Deck::from_cards(cards_from_ids(&[9, 1, 7, 2]).unwrap()))
        .unwrap();
    let a = round.advance_turn().unwrap();
    assert_eq!(a.stand(), Err(GameError::HandTooLow));
    round.pass_at(&a, a.last_action_millis() + 60_000).unwrap();
    assert_eq!(a.status(), TurnStatus::Stood);
    assert!(round.current_playing().unwrap().is_dealer());
}

#[test]
fn dealer_timeout_is_five_times_longer() {
    let round = round_with(&[("a", 10)]);
    round
        .deal_with_deck(Deck::from_cards(cards_from_ids(&[9, 22, 7, 21]).unwrap()))
        .unwrap();
    round.advance_turn().unwrap().stand().unwrap();
    let dealer = round.advance_turn().unwrap();
    let started = dealer.last_action_millis();

    assert_eq!(
        round.pass_at(&dealer, started + 60_000),
        Err(GameError::NotTimedOut)
    );
    round.pass_at(&dealer, started + 300_000).unwrap();
    assert_eq!(round.status(), RoundStatus::Finished);
}

#[test]
fn full_round_settles_zero_sum() {
    let round = round_with(&[("a", 100), ("b", 50)]);
    round.deal_with_deck(fixed_deck()).unwrap();
    round.advance_turn().unwrap().stand().unwrap();
    round.advance_turn().unwrap().stand().unwrap();
    let dealer = round.advance_turn().unwrap();
    round.stand(&dealer).unwrap();

    let a = round.find_participant("a").unwrap();
    let b = round.find_participant("b").unwrap();
    assert_eq!(round.settle(&a, false), Ok(-100));
    assert_eq!(round.pending_settlements(), 1);
    assert!(!round.is_finished());
    assert_eq!(round.settle(&b, false), Ok(50));
    assert!(round.is_finished());

    assert_eq!(a.reward(), 100);
    assert_eq!(b.reward(), -50);
    assert_eq!(dealer.reward(), -50);
    let net: i64 = round.results().iter().map(|r| r.reward).sum();
    assert_eq!(net, 0);

    // settling again changes nothing
    assert_eq!(round.settle(&a, false), Ok(-100));
    assert_eq!(round.settle(&a, true), Ok(-100));
    assert_eq!(dealer.reward(), -50);
}

#[test]
fn settle_without_stand_needs_force() {
    let round = round_with(&[("a", 10)]);
    round.deal_with_deck(fixed_deck()).unwrap();
    let a = round.find_participant("a").unwrap();
    assert_eq!(round.settle(&a, false), Err(GameError::NotStandingYet));
    assert_eq!(round.pending_settlements(), 1);
    round.settle(&a, true).unwrap();
    assert!(round.is_finished());
}
