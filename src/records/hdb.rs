//! Hand database (`hdb`) records.

use super::{Card, FieldFailure, Fields, Record, RecordKind, Stage, StagePot, Timestamp};

const BOARD: &[&str] = &["card1", "card2", "card3", "card4", "card5"];

/// One hand at a table: `timestamp dealer hand_num num_players flop turn river showdown [board..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdbRecord {
    pub timestamp: Timestamp,
    pub dealer: i64,
    pub hand_num: u64,
    pub num_players: i64,
    pub flop: StagePot,
    pub turn: StagePot,
    pub river: StagePot,
    pub showdown: StagePot,
    /// Zero to five community cards.
    pub board: Vec<Card>,
}

impl HdbRecord {
    /// Pot fractions in stage order (flop, turn, river, showdown).
    pub fn stage_pots(&self) -> [(Stage, StagePot); 4] {
        [
            (Stage::Flop, self.flop),
            (Stage::Turn, self.turn),
            (Stage::River, self.river),
            (Stage::Showdown, self.showdown),
        ]
    }
}

impl Record for HdbRecord {
    const KIND: RecordKind = RecordKind::Hdb;

    fn from_tokens(fields: &mut Fields<'_, '_>) -> Result<Self, FieldFailure> {
        Ok(HdbRecord {
            timestamp: fields.timestamp()?,
            dealer: fields.integer("dealer")?,
            hand_num: fields.integer("hand_num")?,
            num_players: fields.integer("num_players")?,
            flop: fields.typed("flop")?,
            turn: fields.typed("turn")?,
            river: fields.typed("river")?,
            showdown: fields.typed("showdown")?,
            board: fields.cards(BOARD)?,
        })
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
