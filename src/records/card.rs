//! Playing cards as written in the database (`Ah`, `Td`, `9c`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FieldError;

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

impl Suit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Suit::Spades),
            'c' => Some(Suit::Clubs),
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Clubs => 'c',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
        }
    }
}

/// A single card: rank character followed by suit.
///
/// Ranks are `1`-`9`, `T`, `J`, `Q`, `K`, `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: char,
    suit: Suit,
}

impl Card {
    fn is_rank(c: char) -> bool {
        matches!(c, '1'..='9' | 'T' | 'J' | 'Q' | 'K' | 'A')
    }
}

impl FromStr for Card {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(rank), Some(suit), None) if Card::is_rank(rank) => {
                let suit = Suit::from_char(suit).ok_or_else(|| FieldError::Card(s.to_string()))?;
                Ok(Card { rank, suit })
            }
            _ => Err(FieldError::Card(s.to_string())),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.to_char())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
