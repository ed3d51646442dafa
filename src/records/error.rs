//! Record validation errors.

use super::RecordKind;

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("is missing")]
    Missing,

    #[error("'{0}' is not an integer")]
    NotInteger(String),

    #[error("{0} is outside [100000000, 999999999]")]
    TimestampOutOfRange(i64),

    #[error("'{0}' is not a players/pot fraction")]
    Stage(String),

    #[error("'{0}' is not a card")]
    Card(String),

    #[error("'{0}' is not an action sequence")]
    Action(String),
}

/// A line that could not be turned into a record.
///
/// Carries the full token list so the log line is enough to find the
/// offending input again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} record: field '{field}' {reason} (tokens: {tokens:?})")]
pub struct ValidationError {
    pub kind: RecordKind,
    pub field: &'static str,
    pub reason: FieldError,
    pub tokens: Vec<String>,
}

/// A field-level failure before the record kind and tokens are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub reason: FieldError,
}

impl FieldFailure {
    pub fn new(field: &'static str, reason: FieldError) -> Self {
        Self { field, reason }
    }
}
