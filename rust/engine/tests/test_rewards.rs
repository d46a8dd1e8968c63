use xidach_engine::cards::cards_from_ids;
use xidach_engine::hand::Outcome;
use xidach_engine::participant::Participant;
use xidach_engine::player::Player;
use xidach_engine::round::{compare, reward};
use xidach_engine::rules::{find_rule, DEFAULT_RULE_ID};

fn seat(ids: &[u8], bet: u64, is_dealer: bool) -> Participant {
    let p = Participant::new(Player::new("x", "x", 10_000), bet, is_dealer);
    for c in cards_from_ids(ids).unwrap() {
        p.add_card(c);
    }
    p
}

fn gain(dealer: &[u8], participant: &[u8], rule_id: &str) -> i64 {
    let rule = find_rule(rule_id).unwrap();
    reward(rule, &seat(dealer, 0, true), &seat(participant, 1, false))
}

#[test]
fn rewards_under_primary_rule() {
    let cases: [(&[u8], &[u8], i64); 11] = [
        (&[7, 7, 7], &[7, 7, 8], 0),
        (&[10, 12], &[5, 0, 11], 1),
        (&[1, 2], &[0, 5, 7], 0),
        (&[1, 2], &[0, 5, 9], -1),
        (&[9, 5], &[0, 5, 7], 1),
        (&[7, 8], &[0, 5, 7], 1),
        (&[7, 8], &[0, 13], -3),
        (&[0, 13], &[26, 39], 0),
        (&[0, 13], &[1, 2], 3),
        (&[0, 10], &[1, 2], 2),
        (&[0, 9], &[4, 12], 2),
    ];
    for (dealer, participant, want) in cases {
        assert_eq!(
            gain(dealer, participant, DEFAULT_RULE_ID),
            want,
            "{:?} vs {:?}",
            dealer,
            participant
        );
    }
}

#[test]
fn rewards_under_normal_rule() {
    // only a participant's double blackjack pays extra
    assert_eq!(gain(&[7, 8], &[0, 13], "2"), -2);
    assert_eq!(gain(&[0, 13], &[1, 2], "2"), 1);
    assert_eq!(gain(&[0, 10], &[1, 2], "2"), 1);
    assert_eq!(gain(&[9, 7], &[1, 2, 3, 4, 5], "2"), -1);
}

#[test]
fn high_five_pays_double_under_primary_rule() {
    assert_eq!(gain(&[9, 7], &[1, 2, 3, 4, 5], "1"), -2);
    assert_eq!(gain(&[1, 2, 3, 4, 5], &[9, 7], "1"), 2);
}

#[test]
fn reward_scales_with_bet() {
    let rule = find_rule("1").unwrap();
    let dealer = seat(&[0, 13], 0, true);
    let participant = seat(&[9, 8], 150, false);
    assert_eq!(reward(rule, &dealer, &participant), 450);
}

#[test]
fn draw_pays_nothing_either_way() {
    let dealer = seat(&[9, 8], 0, true);
    let participant = seat(&[22, 21], 75, false);
    assert_eq!(compare(&dealer, &participant), Outcome::Draw);
    assert_eq!(reward(find_rule("1").unwrap(), &dealer, &participant), 0);
}
