use xidach_engine::cards::{cards_from_ids, Card};
use xidach_engine::hand::{compare_hands, Hand, HandKind, Outcome, Role};

fn hand(ids: &[u8]) -> Hand {
    Hand::from_cards(cards_from_ids(ids).unwrap())
}

#[test]
fn card_strings_and_values() {
    let cases = [(0u8, "A♥", 1u8), (9, "10♥", 10), (10, "J♥", 10), (38, "K♣", 10), (51, "K♠", 10), (1, "2♥", 2)];
    for (id, text, value) in cases {
        let c = Card::try_from(id).unwrap();
        assert_eq!(c.to_string(), text);
        assert_eq!(c.value(), value, "value of {}", text);
    }
}

#[test]
fn hand_values_with_soft_aces() {
    let cases: [(&[u8], u8); 7] = [
        (&[0, 13, 5], 18),
        (&[0, 13, 7], 20),
        (&[0, 13, 8], 21),
        (&[0, 13, 9], 21),
        (&[0, 13, 10], 21),
        (&[0, 13, 5, 6], 15),
        (&[5, 6], 13),
    ];
    for (ids, want) in cases {
        assert_eq!(hand(ids).value(), want, "value of {:?}", ids);
    }
}

#[test]
fn value_is_stable_across_calls() {
    let h = hand(&[0, 13, 26, 4]);
    let first = h.value();
    for _ in 0..10 {
        assert_eq!(h.value(), first);
    }
}

#[test]
fn blackjack_detection() {
    assert!(!hand(&[0, 3]).is_blackjack());
    assert!(hand(&[0, 9]).is_blackjack());
    assert!(hand(&[9, 0]).is_blackjack());
    assert!(hand(&[0, 12]).is_blackjack());
    assert!(!hand(&[0, 12, 2]).is_blackjack());
    assert!(hand(&[0, 13]).is_double_blackjack());
    assert!(!hand(&[0, 1]).is_double_blackjack());
    assert!(!hand(&[1, 0]).is_double_blackjack());
}

#[test]
fn classification_is_total_over_small_hands() {
    // every two and three card hand from one suit gets exactly one kind
    for a in 0..13u8 {
        for b in 0..13u8 {
            for role in [Role::Dealer, Role::Participant] {
                let two = hand(&[a, b + 13]);
                let k = two.classify(role);
                let matches = [
                    HandKind::DoubleBlackJack,
                    HandKind::BlackJack,
                    HandKind::HighFive,
                    HandKind::Normal,
                    HandKind::Busted,
                    HandKind::TooHigh,
                    HandKind::TooLow,
                ]
                .iter()
                .filter(|&&x| x == k)
                .count();
                assert_eq!(matches, 1);
                for c in 0..13u8 {
                    let three = hand(&[a, b + 13, c + 26]);
                    let v = three.value();
                    let k = three.classify(role);
                    match k {
                        HandKind::TooLow => assert!(v < role.floor()),
                        HandKind::Normal => assert!(v >= role.floor() && v <= 21),
                        HandKind::Busted => assert!(v > 21 && v < 28),
                        HandKind::TooHigh => assert!(v >= 28),
                        other => panic!("three cards cannot be {:?}", other),
                    }
                }
            }
        }
    }
}

#[test]
fn compare_cases_between_dealer_and_participant() {
    let cases: [(&[u8], &[u8], Outcome); 6] = [
        (&[7, 7, 7], &[7, 7, 8], Outcome::Draw),
        (&[10, 12], &[5, 0, 11], Outcome::Win),
        (&[1, 2], &[0, 5, 7], Outcome::Draw),
        (&[1, 2], &[0, 5, 9], Outcome::Lose),
        (&[9, 5], &[0, 5, 7], Outcome::Win),
        (&[7, 8], &[0, 5, 7], Outcome::Win),
    ];
    for (dealer, participant, want) in cases {
        let got = compare_hands(&hand(dealer), Role::Dealer, &hand(participant), Role::Participant);
        assert_eq!(got, want, "{:?} vs {:?}", dealer, participant);
    }
}

#[test]
fn compare_ranks_before_values() {
    // 7,7,7 is 21 and normal; 7,7,8 is 22 and busted
    let normal = hand(&[6, 19, 32]);
    let busted = hand(&[6, 19, 33]);
    assert_eq!(normal.classify(Role::Dealer), HandKind::Normal);
    assert_eq!(busted.classify(Role::Participant), HandKind::Busted);
    assert_eq!(
        compare_hands(&normal, Role::Dealer, &busted, Role::Participant),
        Outcome::Win
    );

    // a five card 20 beats a three card 19 by kind
    let five = hand(&[1, 2, 3, 4, 5]);
    let three = hand(&[9, 4, 3]);
    assert_eq!(five.value(), 20);
    assert_eq!(three.value(), 19);
    assert_eq!(
        compare_hands(&five, Role::Participant, &three, Role::Dealer),
        Outcome::Win
    );
}

#[test]
fn compare_is_antisymmetric() {
    let hands: Vec<Hand> = vec![
        hand(&[0, 13]),
        hand(&[0, 9]),
        hand(&[1, 2, 3, 4, 5]),
        hand(&[9, 8]),
        hand(&[9, 7]),
        hand(&[9, 10, 1]),
        hand(&[9, 10, 11]),
        hand(&[1, 2]),
    ];
    for a in &hands {
        for b in &hands {
            for (ra, rb) in [(Role::Dealer, Role::Participant), (Role::Participant, Role::Dealer)] {
                let ab = compare_hands(a, ra, b, rb);
                let ba = compare_hands(b, rb, a, ra);
                assert_eq!(ab, ba.reversed(), "{} vs {}", a, b);
            }
        }
    }
}
