//! Typed records of the IRC poker database.
//!
//! Each table session stores three kinds of whitespace-tokenized text lines:
//!
//! - `hdb` - one line per hand: dealer, hand number, stage pots, board
//! - `hroster` - one line per hand: the players seated for it
//! - `pdb.<player>` - one line per hand the player took part in
//!
//! Parsing is validation: a line either becomes a fully-typed record or a
//! [`ValidationError`] naming the field that failed. Failures are logged here,
//! once, at error level; callers decide whether to skip or abort.

mod action;
mod card;
mod error;
mod hdb;
mod hroster;
mod pdb;
mod stage;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use action::{ActionCode, Actions};
pub use card::Card;
pub use error::{FieldError, FieldFailure, ValidationError};
pub use hdb::HdbRecord;
pub use hroster::HrosterRecord;
pub use pdb::PdbRecord;
pub use stage::{Stage, StagePot};

/// Seconds since the epoch, restricted to nine digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const MIN: u32 = 100_000_000;
    pub const MAX: u32 = 999_999_999;

    pub fn new(value: i64) -> Result<Self, FieldError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Timestamp(value as u32))
        } else {
            Err(FieldError::TimestampOutOfRange(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which stream a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Hdb,
    Hroster,
    Pdb,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Hdb => "hdb",
            RecordKind::Hroster => "hroster",
            RecordKind::Pdb => "pdb",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record kind that can be validated from a token list.
pub trait Record: Sized {
    const KIND: RecordKind;

    /// Build the record from positional tokens. Extra trailing tokens are ignored.
    fn from_tokens(fields: &mut Fields<'_, '_>) -> Result<Self, FieldFailure>;

    fn timestamp(&self) -> Timestamp;
}

/// Validate `tokens` as a record of kind `T`, logging the failure if any.
pub fn validate<T: Record>(tokens: &[&str]) -> Result<T, ValidationError> {
    let mut fields = Fields::new(tokens);
    T::from_tokens(&mut fields).map_err(|failure| {
        let err = ValidationError {
            kind: T::KIND,
            field: failure.field,
            reason: failure.reason,
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        };
        tracing::error!(kind = %err.kind, field = err.field, tokens = ?err.tokens, "{}", err);
        err
    })
}

/// Split a raw line on whitespace and validate it.
pub fn parse_line<T: Record>(line: &str) -> Result<T, ValidationError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    validate(&tokens)
}

/// Positional reader over a line's tokens.
pub struct Fields<'t, 's> {
    tokens: &'t [&'s str],
    pos: usize,
}

impl<'t, 's> Fields<'t, 's> {
    pub(crate) fn new(tokens: &'t [&'s str]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Next token, or `None` once the line is used up.
    pub(crate) fn optional(&mut self) -> Option<&'s str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn required(&mut self, field: &'static str) -> Result<&'s str, FieldFailure> {
        self.optional()
            .ok_or_else(|| FieldFailure::new(field, FieldError::Missing))
    }

    /// Everything not consumed yet.
    pub(crate) fn rest(&mut self) -> &'t [&'s str] {
        let tokens = self.tokens;
        let rest = &tokens[self.pos.min(tokens.len())..];
        self.pos = tokens.len();
        rest
    }

    pub(crate) fn integer<T: FromStr>(&mut self, field: &'static str) -> Result<T, FieldFailure> {
        let raw = self.required(field)?;
        raw.parse()
            .map_err(|_| FieldFailure::new(field, FieldError::NotInteger(raw.to_string())))
    }

    pub(crate) fn timestamp(&mut self) -> Result<Timestamp, FieldFailure> {
        let value: i64 = self.integer("timestamp")?;
        Timestamp::new(value).map_err(|reason| FieldFailure::new("timestamp", reason))
    }

    /// Parse a token with a `FromStr` impl that reports its own [`FieldError`].
    pub(crate) fn typed<T>(&mut self, field: &'static str) -> Result<T, FieldFailure>
    where
        T: FromStr<Err = FieldError>,
    {
        self.required(field)?
            .parse()
            .map_err(|reason| FieldFailure::new(field, reason))
    }

    /// Optional trailing cards, one per name in `names`.
    pub(crate) fn cards(
        &mut self,
        names: &'static [&'static str],
    ) -> Result<Vec<Card>, FieldFailure> {
        let mut cards = Vec::with_capacity(names.len());
        for &name in names {
            match self.optional() {
                Some(raw) => cards.push(
                    raw.parse()
                        .map_err(|reason| FieldFailure::new(name, reason))?,
                ),
                None => break,
            }
        }
        Ok(cards)
    }
}
