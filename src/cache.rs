//! Output file doubling as a replay cache.
//!
//! The file holds one JSON array of hands. When it exists it is streamed back
//! one element at a time ([`CacheReplay`]); otherwise a [`Recorder`] collects
//! the live hands and writes the whole array once extraction has finished.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::hand::Hand;

/// Errors reading or writing the cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is not a JSON array of hands: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Invalid hand in {}: {source}", path.display())]
    Hand {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Cache validity is existence alone; contents are not checked up front.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayState {
    Start,
    First,
    Rest,
    Done,
}

/// Streams the hands of an existing cache file in stored order.
///
/// Yields at most one `Err`, after which it is exhausted.
pub struct CacheReplay {
    path: PathBuf,
    reader: BufReader<File>,
    state: ReplayState,
}

impl CacheReplay {
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let file = File::open(path).map_err(|source| CacheError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Replaying hands from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            state: ReplayState::Start,
        })
    }

    /// Next byte that is not JSON whitespace, left unconsumed.
    fn peek(&mut self) -> Result<Option<u8>, CacheError> {
        loop {
            let next = self
                .reader
                .fill_buf()
                .map_err(|source| CacheError::Read {
                    path: self.path.clone(),
                    source,
                })?
                .first()
                .copied();
            match next {
                Some(b) if b.is_ascii_whitespace() => self.reader.consume(1),
                other => return Ok(other),
            }
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> CacheError {
        CacheError::Malformed {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn step(&mut self) -> Result<Option<Hand>, CacheError> {
        if self.state == ReplayState::Start {
            match self.peek()? {
                Some(b'[') => self.reader.consume(1),
                Some(_) => return Err(self.malformed("expected '['")),
                None => return Err(self.malformed("file is empty")),
            }
            self.state = ReplayState::First;
        }

        match self.peek()? {
            Some(b']') => {
                self.reader.consume(1);
                return Ok(None);
            }
            Some(b',') if self.state == ReplayState::Rest => {
                self.reader.consume(1);
                if self.peek()?.is_none() {
                    return Err(self.malformed("unexpected end of file"));
                }
            }
            Some(_) if self.state == ReplayState::Rest => {
                return Err(self.malformed("expected ',' or ']'"));
            }
            Some(_) => {}
            None => return Err(self.malformed("unexpected end of file")),
        }

        // Reads exactly one value; nothing past its closing brace is consumed.
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        let hand = Hand::deserialize(&mut de).map_err(|source| CacheError::Hand {
            path: self.path.clone(),
            source,
        })?;
        self.state = ReplayState::Rest;
        Ok(Some(hand))
    }
}

impl Iterator for CacheReplay {
    type Item = Result<Hand, CacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReplayState::Done {
            return None;
        }
        match self.step() {
            Ok(Some(hand)) => Some(Ok(hand)),
            Ok(None) => {
                self.state = ReplayState::Done;
                None
            }
            Err(e) => {
                self.state = ReplayState::Done;
                Some(Err(e))
            }
        }
    }
}

/// Accumulates live hands and writes them out in one atomic step.
#[derive(Debug)]
pub struct Recorder {
    path: PathBuf,
    hands: Vec<Hand>,
}

impl Recorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hands: Vec::new(),
        }
    }

    pub fn record(&mut self, hand: &Hand) {
        self.hands.push(hand.clone());
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Write every recorded hand as a JSON array, one hand per line.
    ///
    /// The array goes to a temporary file next to the target which is then
    /// renamed over it, so readers never see a partial cache.
    pub fn persist(self) -> Result<usize, CacheError> {
        info!("Saving to {}", self.path.display());
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

        let mut writer = BufWriter::new(tmp);
        writer.write_all(b"[").map_err(write_err)?;
        for (i, hand) in self.hands.iter().enumerate() {
            let sep: &[u8] = if i == 0 { b"\n" } else { b",\n" };
            writer.write_all(sep).map_err(write_err)?;
            serde_json::to_writer(&mut writer, hand)
                .map_err(|e| write_err(io::Error::from(e)))?;
        }
        writer.write_all(b"\n]\n").map_err(write_err)?;
        let tmp = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;

        let size = tmp.as_file().metadata().map_err(write_err)?.len();
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        info!(
            "Saved {} hands ({}) to {}",
            self.hands.len(),
            humansize::format_size(size, humansize::BINARY),
            self.path.display()
        );
        Ok(self.hands.len())
    }
}
