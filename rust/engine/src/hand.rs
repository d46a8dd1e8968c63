use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Minimum value a participant must reach before standing.
pub const PARTICIPANT_FLOOR: u8 = 16;
/// Minimum value the dealer must reach before standing.
pub const DEALER_FLOOR: u8 = 15;
/// Values at or above this are penalized as `TooHigh` rather than `Busted`.
pub const TOO_HIGH_VALUE: u8 = 28;
pub const BEST_VALUE: u8 = 21;

/// Which side of the table a hand belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Dealer,
    Participant,
}

impl Role {
    pub fn floor(self) -> u8 {
        match self {
            Role::Dealer => DEALER_FLOOR,
            Role::Participant => PARTICIPANT_FLOOR,
        }
    }
}

/// Hand classification, declared strongest first.
///
/// The derived ordering is the comparison rank: a lower variant beats a higher one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandKind {
    /// Exactly two aces
    DoubleBlackJack,
    /// An ace and a ten-valued card, two cards only
    BlackJack,
    /// Five cards worth 21 or less
    HighFive,
    Normal,
    /// Over 21 but below 28
    Busted,
    /// 28 or more
    TooHigh,
    /// Below the role's floor
    TooLow,
}

impl HandKind {
    /// Kinds whose members never compare by value against each other.
    pub fn is_terminal(self) -> bool {
        matches!(self, HandKind::Busted | HandKind::TooHigh | HandKind::TooLow)
    }
}

/// Result of comparing one hand against another, from the first hand's side.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Draw => Outcome::Draw,
            Outcome::Lose => Outcome::Win,
        }
    }
}

/// Cards held by one seat in one round, in the order they were dealt.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Hand value with the soft-ace adjustment.
    ///
    /// The first ace may count as 11 (or 10 when 11 overshoots) as long as the
    /// hand holds fewer than four cards and the non-ace sum is below 12. Every
    /// other ace counts as 1.
    ///
    /// ```
    /// use xidach_engine::cards::cards_from_ids;
    /// use xidach_engine::hand::Hand;
    ///
    /// let hand = Hand::from_cards(cards_from_ids(&[0, 9]).unwrap());
    /// assert_eq!(hand.value(), 21);
    /// let hand = Hand::from_cards(cards_from_ids(&[0, 13]).unwrap());
    /// assert_eq!(hand.value(), 12);
    /// ```
    pub fn value(&self) -> u8 {
        u8::try_from(self.raw_value()).unwrap_or(u8::MAX)
    }

    // Wide enough for a whole deck; `value` saturates it into a u8.
    fn raw_value(&self) -> u16 {
        let best = u16::from(BEST_VALUE);
        let mut aces = 0u16;
        let mut sum = 0u16;
        for c in &self.cards {
            if c.is_ace() {
                aces += 1;
            } else {
                sum += u16::from(c.value());
            }
        }
        if aces == 0 {
            return sum;
        }
        if sum >= 12 || self.cards.len() >= 4 {
            return sum + aces;
        }
        let extra = aces - 1;
        if sum + 11 + extra <= best {
            return sum + 11 + extra;
        }
        if sum + 10 + extra <= best {
            return sum + 10 + extra;
        }
        sum + aces
    }

    pub fn is_double_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.cards.iter().all(|c| c.is_ace())
    }

    pub fn is_blackjack(&self) -> bool {
        match self.cards.as_slice() {
            [a, b] => (a.is_ace() && b.rank().is_ten()) || (a.rank().is_ten() && b.is_ace()),
            _ => false,
        }
    }

    pub fn is_high_five(&self) -> bool {
        self.cards.len() == 5 && self.value() <= BEST_VALUE
    }

    /// Classifies the hand for the given role. Exactly one kind applies.
    pub fn classify(&self, role: Role) -> HandKind {
        if self.is_double_blackjack() {
            return HandKind::DoubleBlackJack;
        }
        if self.is_blackjack() {
            return HandKind::BlackJack;
        }
        if self.is_high_five() {
            return HandKind::HighFive;
        }
        let value = self.value();
        if value < role.floor() {
            HandKind::TooLow
        } else if value >= TOO_HIGH_VALUE {
            HandKind::TooHigh
        } else if value > BEST_VALUE {
            HandKind::Busted
        } else {
            HandKind::Normal
        }
    }

    /// Human readable classification, e.g. `busted: 24`.
    pub fn label(&self, role: Role) -> String {
        let value = self.value();
        match self.classify(role) {
            HandKind::DoubleBlackJack => "double blackjack".to_string(),
            HandKind::BlackJack => "blackjack".to_string(),
            HandKind::HighFive => format!("high five: {value}"),
            HandKind::Normal => format!("{value} points"),
            HandKind::Busted => format!("busted: {value}"),
            HandKind::TooHigh => format!("too high: {value}"),
            HandKind::TooLow => format!("too low: {value}"),
        }
    }

    /// Renders the hand either face up with its label, or censored as
    /// `**, ** (2 cards)`.
    pub fn render(&self, censor: bool, role: Role) -> String {
        let mut out = String::new();
        if censor {
            for _ in 1..self.cards.len() {
                out.push_str("**, ");
            }
            let _ = write!(out, "** ({} cards)", self.cards.len());
            return out;
        }
        let faces: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        let _ = write!(out, "{} ({})", faces.join(", "), self.label(role));
        out
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", faces.join(", "))
    }
}

/// Compares hand `a` against hand `b`, each classified with its own role.
///
/// A stronger kind wins outright. Two terminal kinds (busted, too high, too
/// low) draw whatever their values. Otherwise the higher value wins, except
/// between two high fives where the lower value wins.
pub fn compare_hands(a: &Hand, a_role: Role, b: &Hand, b_role: Role) -> Outcome {
    let ka = a.classify(a_role);
    let kb = b.classify(b_role);
    if ka < kb {
        return Outcome::Win;
    }
    if ka > kb {
        return Outcome::Lose;
    }
    if ka.is_terminal() {
        return Outcome::Draw;
    }
    let by_value = match a.value().cmp(&b.value()) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Less => Outcome::Lose,
        std::cmp::Ordering::Equal => Outcome::Draw,
    };
    if ka == HandKind::HighFive {
        by_value.reversed()
    } else {
        by_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::cards_from_ids;

    fn hand(ids: &[u8]) -> Hand {
        Hand::from_cards(cards_from_ids(ids).unwrap())
    }

    #[test]
    fn soft_ace_values() {
        assert_eq!(hand(&[0, 9]).value(), 21);
        assert_eq!(hand(&[0, 13]).value(), 12);
        assert_eq!(hand(&[0, 13, 26]).value(), 13);
        assert_eq!(hand(&[0, 4]).value(), 16);
        assert_eq!(hand(&[0, 1, 2, 3]).value(), 10);
        assert_eq!(hand(&[0, 9, 10]).value(), 21);
        assert_eq!(hand(&[]).value(), 0);
    }

    #[test]
    fn ten_fallback_for_first_ace() {
        // A, 5, 6: eleven overshoots, ten fits
        assert_eq!(hand(&[0, 4, 5]).value(), 21);
        assert_eq!(hand(&[0, 1, 8]).value(), 21);
        // A, A, 9
        assert_eq!(hand(&[0, 13, 8]).value(), 21);
        // A, 6, 7: non-ace sum of 13 keeps the ace hard
        assert_eq!(hand(&[0, 5, 6]).value(), 14);
    }

    #[test]
    fn whole_deck_saturates_and_classifies_too_high() {
        let all = Hand::from_cards(crate::cards::full_deck());
        assert_eq!(all.raw_value(), 340);
        assert_eq!(all.value(), u8::MAX);
        assert_eq!(all.classify(Role::Participant), HandKind::TooHigh);
        assert_eq!(all.classify(Role::Dealer), HandKind::TooHigh);
    }

    #[test]
    fn classification_respects_priority_and_floor() {
        assert_eq!(hand(&[0, 13]).classify(Role::Participant), HandKind::DoubleBlackJack);
        assert_eq!(hand(&[12, 26]).classify(Role::Dealer), HandKind::BlackJack);
        assert_eq!(hand(&[0, 1, 2, 14, 15]).classify(Role::Participant), HandKind::HighFive);
        assert_eq!(hand(&[4, 9]).classify(Role::Participant), HandKind::TooLow);
        assert_eq!(hand(&[4, 9]).classify(Role::Dealer), HandKind::Normal);
        assert_eq!(hand(&[9, 10, 11]).classify(Role::Participant), HandKind::TooHigh);
        assert_eq!(hand(&[9, 10, 1]).classify(Role::Participant), HandKind::Busted);
        assert_eq!(hand(&[9, 6]).classify(Role::Participant), HandKind::Normal);
    }

    #[test]
    fn render_censored_and_open() {
        assert_eq!(hand(&[0, 9]).render(true, Role::Participant), "**, ** (2 cards)");
        assert_eq!(hand(&[1, 2, 3]).render(true, Role::Dealer), "**, **, ** (3 cards)");
        assert_eq!(
            hand(&[0, 9]).render(false, Role::Participant),
            "A♥, 10♥ (blackjack)"
        );
        assert_eq!(
            hand(&[9, 6]).render(false, Role::Participant),
            "10♥, 7♥ (17 points)"
        );
    }

    #[test]
    fn compare_by_kind_then_value() {
        let bj = hand(&[0, 9]);
        let low = hand(&[4, 12]);
        assert_eq!(compare_hands(&bj, Role::Dealer, &low, Role::Participant), Outcome::Win);
        assert_eq!(compare_hands(&low, Role::Participant, &bj, Role::Dealer), Outcome::Lose);

        let nineteen = hand(&[9, 8]);
        let twenty = hand(&[9, 22]);
        assert_eq!(
            compare_hands(&twenty, Role::Participant, &nineteen, Role::Participant),
            Outcome::Win
        );
        assert_eq!(
            compare_hands(&nineteen, Role::Dealer, &nineteen, Role::Participant),
            Outcome::Draw
        );
    }

    #[test]
    fn terminal_kinds_draw() {
        let a = hand(&[7, 7, 7]);
        let b = hand(&[7, 7, 8]);
        assert_eq!(a.classify(Role::Dealer), HandKind::Busted);
        assert_eq!(b.classify(Role::Participant), HandKind::Busted);
        assert_eq!(compare_hands(&a, Role::Dealer, &b, Role::Participant), Outcome::Draw);
    }

    #[test]
    fn high_five_prefers_lower_value() {
        let low_five = hand(&[0, 1, 2, 3, 14]); // 1+2+3+4+2 = 12
        let high_five = hand(&[1, 2, 3, 4, 5]); // 2+3+4+5+6 = 20
        assert_eq!(low_five.classify(Role::Dealer), HandKind::HighFive);
        assert_eq!(high_five.classify(Role::Participant), HandKind::HighFive);
        assert_eq!(
            compare_hands(&low_five, Role::Dealer, &high_five, Role::Participant),
            Outcome::Win
        );
    }
}
