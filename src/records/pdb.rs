//! Per-player (`pdb.<player>`) records.

use super::{Actions, Card, FieldFailure, Fields, Record, RecordKind, Stage, Timestamp};

const POCKET: &[&str] = &["card1", "card2"];

/// One player's view of one hand:
/// `player timestamp num_players position preflop flop turn river bankroll total_bet total_win [cards..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbRecord {
    /// Name as written on the line. Hands are keyed by the file's player name instead.
    pub player: String,
    pub timestamp: Timestamp,
    pub num_players: i64,
    pub position: i64,
    pub preflop: Actions,
    pub flop: Actions,
    pub turn: Actions,
    pub river: Actions,
    pub bankroll: i64,
    pub total_bet: i64,
    pub total_win: i64,
    /// Zero to two pocket cards; only known when shown down.
    pub pocket_cards: Vec<Card>,
}

impl PdbRecord {
    /// Actions per street (preflop, flop, turn, river).
    pub fn bets(&self) -> [(Stage, &Actions); 4] {
        [
            (Stage::Preflop, &self.preflop),
            (Stage::Flop, &self.flop),
            (Stage::Turn, &self.turn),
            (Stage::River, &self.river),
        ]
    }
}

impl Record for PdbRecord {
    const KIND: RecordKind = RecordKind::Pdb;

    fn from_tokens(fields: &mut Fields<'_, '_>) -> Result<Self, FieldFailure> {
        Ok(PdbRecord {
            player: fields.required("player")?.to_string(),
            timestamp: fields.timestamp()?,
            num_players: fields.integer("num_players")?,
            position: fields.integer("position")?,
            preflop: fields.typed("preflop")?,
            flop: fields.typed("flop")?,
            turn: fields.typed("turn")?,
            river: fields.typed("river")?,
            bankroll: fields.integer("bankroll")?,
            total_bet: fields.integer("total_bet")?,
            total_win: fields.integer("total_win")?,
            pocket_cards: fields.cards(POCKET)?,
        })
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
