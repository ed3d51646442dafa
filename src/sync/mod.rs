//! Merge-join of one table session's streams into hands.
//!
//! The [`Synchronizer`] walks the hdb stream in order and, for each hand,
//! moves the roster cursor and every seated player's pdb cursor forward to the
//! same timestamp. A hand is emitted only when all of them line up.
//!
//! # Failure policy
//!
//! - A line that fails validation drops only the hand being assembled; the
//!   failing stream resumes at its next line.
//! - A player without a pdb stream, or whose cursor lands past the timestamp,
//!   drops only that hand. Cursors are never rewound.
//! - Each roster line is consumed by the hdb line it matches, and a timestamp
//!   is emitted at most once per session.
//! - hdb or hroster running out ends the session cleanly.
//! - A truncated or unreadable stream, or an hdb/hroster player-count
//!   disagreement, ends the session with an error. Hands already yielded stand.

mod stream;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::BufRead;

use tracing::{debug, error};

use crate::hand::{Hand, TableSession};
use crate::records::{HdbRecord, HrosterRecord, PdbRecord, Timestamp};

pub use stream::{RecordStream, Seek, StreamError};

/// Errors that end a table session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("hdb lists {hdb} players but hroster lists {hroster} at {timestamp}")]
    PlayerCountMismatch {
        timestamp: Timestamp,
        hdb: i64,
        hroster: i64,
    },
}

/// Outcome of one pass over the next hdb record.
enum Step {
    Emit(Hand),
    Skip,
    End,
}

/// Lazily produces the hands of one table session.
///
/// Yields `Ok(hand)` for each complete hand. After the session ends - cleanly
/// or with a single `Err` - it yields `None` forever.
pub struct Synchronizer<R> {
    session: TableSession,
    hdb: RecordStream<R, HdbRecord>,
    roster: RecordStream<R, HrosterRecord>,
    players: HashMap<String, RecordStream<R, PdbRecord>>,
    emitted: HashSet<Timestamp>,
    finished: bool,
}

impl<R: BufRead> Synchronizer<R> {
    pub fn new(
        session: TableSession,
        hdb: RecordStream<R, HdbRecord>,
        roster: RecordStream<R, HrosterRecord>,
        players: HashMap<String, RecordStream<R, PdbRecord>>,
    ) -> Self {
        Self {
            session,
            hdb,
            roster,
            players,
            emitted: HashSet::new(),
            finished: false,
        }
    }

    fn step(&mut self) -> Result<Step, SessionError> {
        let hdb = match self.hdb.next_record() {
            Ok(Some(hdb)) => hdb,
            Ok(None) => return Ok(Step::End),
            Err(StreamError::Invalid(_)) => return Ok(Step::Skip),
            Err(err) => return Err(err.into()),
        };
        let ts = hdb.timestamp;

        // A matched roster line serves one hdb line only.
        let roster = match self.roster.seek(ts) {
            Ok(Seek::Found) => match self.roster.take_current() {
                Some(roster) => roster,
                None => return Ok(Step::End),
            },
            Ok(Seek::Overshot(next)) => {
                debug!(
                    "Record hroster missing at timestamp {} (next is {}), skipping {}",
                    ts,
                    next,
                    self.session.hand_id(ts)
                );
                return Ok(Step::Skip);
            }
            Ok(Seek::Exhausted) => return Ok(Step::End),
            Err(StreamError::Invalid(_)) => return Ok(Step::Skip),
            Err(err) => return Err(err.into()),
        };

        if self.emitted.contains(&ts) {
            debug!(
                "Hand {} already extracted, skipping repeated timestamp",
                self.session.hand_id(ts)
            );
            return Ok(Step::Skip);
        }

        if hdb.num_players != roster.num_players {
            return Err(SessionError::PlayerCountMismatch {
                timestamp: ts,
                hdb: hdb.num_players,
                hroster: roster.num_players,
            });
        }

        for player in &roster.players {
            let Some(stream) = self.players.get_mut(player) else {
                debug!(
                    "Record pdb.{} missing at timestamp {}, skipping {}",
                    player,
                    ts,
                    self.session.hand_id(ts)
                );
                return Ok(Step::Skip);
            };
            match stream.seek(ts) {
                Ok(Seek::Found) => {}
                Ok(Seek::Overshot(_)) | Ok(Seek::Exhausted) => {
                    debug!(
                        "Record pdb.{} missing at timestamp {}, skipping {}",
                        player,
                        ts,
                        self.session.hand_id(ts)
                    );
                    return Ok(Step::Skip);
                }
                Err(StreamError::Invalid(_)) => return Ok(Step::Skip),
                Err(err) => return Err(err.into()),
            }
        }

        let seats: BTreeMap<String, &PdbRecord> = roster
            .players
            .iter()
            .filter_map(|player| {
                self.players
                    .get(player)
                    .and_then(RecordStream::current)
                    .map(|pdb| (player.clone(), pdb))
            })
            .collect();

        if usize::try_from(hdb.num_players).ok() != Some(seats.len()) {
            error!(
                "Roster at timestamp {} names {} distinct players for {} seats, skipping {}",
                ts,
                seats.len(),
                hdb.num_players,
                self.session.hand_id(ts)
            );
            return Ok(Step::Skip);
        }

        let hand = Hand::assemble(&self.session, &hdb, seats);
        self.emitted.insert(ts);
        debug!("Hand {} extracted", hand.id);
        Ok(Step::Emit(hand))
    }
}

impl<R: BufRead> Iterator for Synchronizer<R> {
    type Item = Result<Hand, SessionError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.step() {
                Ok(Step::Emit(hand)) => return Some(Ok(hand)),
                Ok(Step::Skip) => continue,
                Ok(Step::End) => self.finished = true,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
