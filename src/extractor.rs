//! Top-level entry point: configure once, then pull hands.
//!
//! ```no_run
//! use ircpoker::{Extractor, ExtractorOptions, Jobs};
//!
//! let extractor = Extractor::new(ExtractorOptions {
//!     input: Some("IRCdata.tgz".into()),
//!     output: Some("hands.json".into()),
//!     jobs: Jobs::All,
//!     ..Default::default()
//! })?;
//! let total = extractor.hands()?.filter_map(Result::ok).count();
//! println!("{total} hands");
//! # Ok::<(), ircpoker::ExtractError>(())
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::cache::{self, CacheReplay, Recorder};
use crate::error::ExtractError;
use crate::extract::{GroupSettings, LiveHands};
use crate::hand::Hand;

const INPUT_SUFFIXES: &[&str] = &[".tgz", ".tar.gz"];
const OUTPUT_SUFFIX: &str = ".json";

/// How many worker threads extract in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jobs {
    /// One per available core.
    All,
    Count(NonZeroUsize),
}

impl Jobs {
    /// Zero or a negative count (conventionally `-1`) means all cores.
    pub fn from_count(count: i64) -> Self {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Jobs::All, Jobs::Count)
    }

    /// The count as written in configuration, with `-1` for all cores.
    pub fn as_count(self) -> i64 {
        match self {
            Jobs::All => -1,
            Jobs::Count(n) => i64::try_from(n.get()).unwrap_or(i64::MAX),
        }
    }

    /// Number of worker threads to start.
    pub fn resolve(self) -> NonZeroUsize {
        match self {
            Jobs::All => std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            Jobs::Count(n) => n,
        }
    }

    fn is_single(self) -> bool {
        self == Jobs::Count(NonZeroUsize::MIN)
    }
}

impl Default for Jobs {
    fn default() -> Self {
        Jobs::Count(NonZeroUsize::MIN)
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jobs::All => write!(f, "all"),
            Jobs::Count(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Outer archive. Only needed when there is no cache to replay.
    pub input: Option<PathBuf>,
    /// Result file; replayed when it already exists.
    pub output: Option<PathBuf>,
    pub jobs: Jobs,
    /// Game type prefixes of the members to extract.
    pub game_types: BTreeSet<String>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            jobs: Jobs::default(),
            game_types: GroupSettings::default().game_types,
        }
    }
}

fn has_suffix(path: &Path, suffixes: &[&str]) -> bool {
    let name = path.to_string_lossy();
    suffixes.iter().any(|suffix| name.ends_with(suffix))
}

/// Poker hand extraction from an IRC database archive.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractorOptions,
}

impl Extractor {
    pub fn new(options: ExtractorOptions) -> Result<Self, ExtractError> {
        if let Some(input) = &options.input {
            if !has_suffix(input, INPUT_SUFFIXES) {
                return Err(ExtractError::InvalidInput {
                    path: input.clone(),
                });
            }
        }

        if let Some(output) = &options.output {
            if !has_suffix(output, &[OUTPUT_SUFFIX]) {
                return Err(ExtractError::InvalidOutput {
                    path: output.clone(),
                });
            }
            if cache::exists(output) && !options.jobs.is_single() {
                warn!(
                    "Parameter jobs={} will be ignored since output {} exists",
                    options.jobs,
                    output.display()
                );
            }
        }

        Ok(Self { options })
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// True when [`hands`](Self::hands) would replay the output file.
    pub fn is_cached(&self) -> bool {
        self.options.output.as_deref().is_some_and(cache::exists)
    }

    /// Start producing hands.
    ///
    /// Replays the output file when it exists. Otherwise extracts from the
    /// input archive and, if an output is configured, writes every hand to it
    /// once the stream has been drained.
    pub fn hands(&self) -> Result<HandStream, ExtractError> {
        if let Some(output) = self.options.output.as_deref().filter(|p| cache::exists(p)) {
            return Ok(HandStream {
                inner: Inner::Replay(CacheReplay::open(output)?),
            });
        }

        let input = self
            .options
            .input
            .as_deref()
            .ok_or(ExtractError::MissingInput)?;
        let settings = GroupSettings {
            game_types: self.options.game_types.clone(),
        };
        let live = LiveHands::start(input, self.options.jobs.resolve(), settings)?;

        let inner = match &self.options.output {
            Some(output) => Inner::Recording {
                live,
                recorder: Some(Recorder::new(output)),
            },
            None => Inner::Transient(live),
        };
        Ok(HandStream { inner })
    }
}

enum Inner {
    Replay(CacheReplay),
    Recording {
        live: LiveHands,
        recorder: Option<Recorder>,
    },
    Transient(LiveHands),
}

/// Hands from either the cache or a live extraction.
///
/// An `Err` item is terminal: a broken cache file, or a failure writing the
/// output after the last hand.
pub struct HandStream {
    inner: Inner,
}

impl HandStream {
    pub fn is_replay(&self) -> bool {
        matches!(self.inner, Inner::Replay(_))
    }
}

impl Iterator for HandStream {
    type Item = Result<Hand, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Replay(replay) => replay.next().map(|item| item.map_err(Into::into)),
            Inner::Transient(live) => live.next().map(Ok),
            Inner::Recording { live, recorder } => match live.next() {
                Some(hand) => {
                    if let Some(recorder) = recorder {
                        recorder.record(&hand);
                    }
                    Some(Ok(hand))
                }
                None => match recorder.take()?.persist() {
                    Ok(_) => None,
                    Err(e) => Some(Err(e.into())),
                },
            },
        }
    }
}
