use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Number of cards in a full deck.
pub const DECK_SIZE: u8 = 52;

/// One of the four suits, ordered the way card ids are laid out (`id / 13`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts (♥), ids 0..13
    Hearts,
    /// Diamonds (♦), ids 13..26
    Diamonds,
    /// Clubs (♣), ids 26..39
    Clubs,
    /// Spades (♠), ids 39..52
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Card rank, ordered the way card ids are laid out (`id % 13`).
/// The ace comes first because it is worth 1 before any soft adjustment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Ace (rank 0)
    Ace,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
}

impl Rank {
    pub fn from_index(v: u8) -> Rank {
        match v % 13 {
            0 => Rank::Ace,
            1 => Rank::Two,
            2 => Rank::Three,
            3 => Rank::Four,
            4 => Rank::Five,
            5 => Rank::Six,
            6 => Rank::Seven,
            7 => Rank::Eight,
            8 => Rank::Nine,
            9 => Rank::Ten,
            10 => Rank::Jack,
            11 => Rank::Queen,
            _ => Rank::King,
        }
    }

    /// Hard value of the rank: ace is 1, faces are 10.
    pub fn value(self) -> u8 {
        (self as u8).min(9) + 1
    }

    /// True for 10, J, Q and K.
    pub fn is_ten(self) -> bool {
        self.value() == 10
    }

    fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// A playing card identified by an integer in `[0, 52)`.
///
/// The rank is `id % 13` and the suit is `id / 13`. Cards are plain values
/// and never change after construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    pub fn id(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(self.0 % 13)
    }

    pub fn suit(self) -> Suit {
        match self.0 / 13 {
            0 => Suit::Hearts,
            1 => Suit::Diamonds,
            2 => Suit::Clubs,
            _ => Suit::Spades,
        }
    }

    pub fn value(self) -> u8 {
        self.rank().value()
    }

    pub fn is_ace(self) -> bool {
        self.rank() == Rank::Ace
    }
}

impl TryFrom<u8> for Card {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if id < DECK_SIZE {
            Ok(Card(id))
        } else {
            Err(GameError::InvalidCard { id })
        }
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().label(), self.suit().symbol())
    }
}

/// Builds cards from raw ids, failing on the first out-of-range id.
pub fn cards_from_ids(ids: &[u8]) -> Result<Vec<Card>, GameError> {
    ids.iter().map(|&id| Card::try_from(id)).collect()
}

pub fn full_deck() -> Vec<Card> {
    (0..DECK_SIZE).map(Card).collect()
}
