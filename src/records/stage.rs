//! Betting stages and the `players/pot` fractions recorded at the end of each.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FieldError;

/// A stage of a hand. Serialized as its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "p")]
    Preflop,
    #[serde(rename = "f")]
    Flop,
    #[serde(rename = "t")]
    Turn,
    #[serde(rename = "r")]
    River,
    #[serde(rename = "s")]
    Showdown,
}

impl Stage {
    /// Streets a player can act on.
    pub const STREETS: [Stage; 4] = [Stage::Preflop, Stage::Flop, Stage::Turn, Stage::River];

    /// Stages that close with a recorded pot.
    pub const POTS: [Stage; 4] = [Stage::Flop, Stage::Turn, Stage::River, Stage::Showdown];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
        }
    }
}

/// Players remaining and pot size at the end of a stage (`3/120`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePot {
    pub num_players: u32,
    pub size: u64,
}

impl FromStr for StagePot {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::Stage(s.to_string());
        let (players, size) = s.split_once('/').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(players) || !all_digits(size) {
            return Err(invalid());
        }
        Ok(StagePot {
            num_players: players.parse().map_err(|_| invalid())?,
            size: size.parse().map_err(|_| invalid())?,
        })
    }
}
