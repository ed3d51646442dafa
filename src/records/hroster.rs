//! Hand roster (`hroster`) records.

use super::{FieldFailure, Fields, Record, RecordKind, Timestamp};

/// Players seated for one hand: `timestamp num_players name...`.
///
/// The name count is not checked against `num_players` here; the
/// synchronizer drops hands where they disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrosterRecord {
    pub timestamp: Timestamp,
    pub num_players: i64,
    pub players: Vec<String>,
}

impl Record for HrosterRecord {
    const KIND: RecordKind = RecordKind::Hroster;

    fn from_tokens(fields: &mut Fields<'_, '_>) -> Result<Self, FieldFailure> {
        Ok(HrosterRecord {
            timestamp: fields.timestamp()?,
            num_players: fields.integer("num_players")?,
            players: fields.rest().iter().map(|s| s.to_string()).collect(),
        })
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
