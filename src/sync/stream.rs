//! Forward-only record readers.
//!
//! A [`RecordStream`] reads one sub-stream (hdb, hroster or a single pdb file)
//! line by line and holds the most recently accepted record. It never rewinds:
//! [`RecordStream::seek`] only moves forward, so a record that was passed over
//! is gone for good.

use std::io::BufRead;

use crate::records::{parse_line, Record, Timestamp, ValidationError};

/// Errors from reading a sub-stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The line was read but is not a valid record. The line is consumed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{name} ended unexpectedly")]
    Truncated { name: String },

    #[error("failed to read {name}: {error}")]
    Io {
        name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Where a [`RecordStream::seek`] landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seek {
    /// The held record carries exactly the target timestamp.
    Found,
    /// The held record is past the target.
    Overshot(Timestamp),
    /// The stream ended before reaching the target.
    Exhausted,
}

/// Reads records of kind `T` from a line-oriented reader.
pub struct RecordStream<R, T> {
    name: String,
    reader: R,
    buf: Vec<u8>,
    /// False when the underlying data was cut short; reaching its end is then an error.
    complete: bool,
    current: Option<T>,
}

impl<R: BufRead, T: Record> RecordStream<R, T> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            buf: Vec::new(),
            complete: true,
            current: None,
        }
    }

    /// Treat the end of the data as a premature end of stream.
    pub fn truncated(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record the last successful [`seek`](Self::seek) stopped on.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Hand over the held record. The next [`seek`](Self::seek) reads on from
    /// the following line.
    pub fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }

    /// Read the next record, skipping blank lines. `Ok(None)` marks a clean end.
    pub fn next_record(&mut self) -> Result<Option<T>, StreamError> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .map_err(|error| StreamError::Io {
                    name: self.name.clone(),
                    error,
                })?;

            if read == 0 {
                if self.complete {
                    return Ok(None);
                }
                return Err(StreamError::Truncated {
                    name: self.name.clone(),
                });
            }

            let line = String::from_utf8_lossy(&self.buf);
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(parse_line(&line)?));
        }
    }

    /// Advance until the held record's timestamp is at or past `target`.
    ///
    /// A record already at or past `target` is kept as is. On a validation
    /// failure the bad line is consumed and the held record is unchanged, so the
    /// next seek resumes from the following line.
    pub fn seek(&mut self, target: Timestamp) -> Result<Seek, StreamError> {
        while self
            .current
            .as_ref()
            .map_or(true, |record| record.timestamp() < target)
        {
            match self.next_record()? {
                Some(record) => self.current = Some(record),
                None => return Ok(Seek::Exhausted),
            }
        }

        match self.current.as_ref().map(|record| record.timestamp()) {
            Some(ts) if ts == target => Ok(Seek::Found),
            Some(ts) => Ok(Seek::Overshot(ts)),
            None => Ok(Seek::Exhausted),
        }
    }
}
