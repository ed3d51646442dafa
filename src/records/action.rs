//! Per-street wagering actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FieldError;

/// Single-character action codes used in pdb streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCode {
    /// Blind bet
    Blind, // "B"
    /// Fold
    Fold, // "f"
    /// Check
    Check, // "k"
    /// Bet
    Bet, // "b"
    /// Call
    Call, // "c"
    /// Raise
    Raise, // "r"
    /// All-in
    AllIn, // "A"
    /// Player quit the game
    Quit, // "Q"
    /// Player was kicked from the game
    Kicked, // "K"
    /// No action on this street
    NoAction, // "-"
}

impl ActionCode {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'B' => Some(ActionCode::Blind),
            'f' => Some(ActionCode::Fold),
            'k' => Some(ActionCode::Check),
            'b' => Some(ActionCode::Bet),
            'c' => Some(ActionCode::Call),
            'r' => Some(ActionCode::Raise),
            'A' => Some(ActionCode::AllIn),
            'Q' => Some(ActionCode::Quit),
            'K' => Some(ActionCode::Kicked),
            '-' => Some(ActionCode::NoAction),
            _ => None,
        }
    }

    pub fn to_code(self) -> char {
        match self {
            ActionCode::Blind => 'B',
            ActionCode::Fold => 'f',
            ActionCode::Check => 'k',
            ActionCode::Bet => 'b',
            ActionCode::Call => 'c',
            ActionCode::Raise => 'r',
            ActionCode::AllIn => 'A',
            ActionCode::Quit => 'Q',
            ActionCode::Kicked => 'K',
            ActionCode::NoAction => '-',
        }
    }
}

/// The ordered actions one player took on one street, e.g. `Bc` or `-`.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actions(Vec<ActionCode>);

impl Actions {
    pub fn iter(&self) -> impl Iterator<Item = ActionCode> + '_ {
        self.0.iter().copied()
    }

    pub fn count(&self, code: ActionCode) -> usize {
        self.0.iter().filter(|&&c| c == code).count()
    }

    /// True when the street is just `-`.
    pub fn is_idle(&self) -> bool {
        self.0.iter().all(|&c| c == ActionCode::NoAction)
    }
}

impl FromStr for Actions {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FieldError::Action(String::new()));
        }
        s.chars()
            .map(ActionCode::from_code)
            .collect::<Option<Vec<_>>>()
            .map(Actions)
            .ok_or_else(|| FieldError::Action(s.to_string()))
    }
}

impl fmt::Display for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for code in &self.0 {
            write!(f, "{}", code.to_code())?;
        }
        Ok(())
    }
}

impl Serialize for Actions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Actions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
