//! Extraction of one table session (one outer archive member).

use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::path::Path;

use tracing::{debug, error, info};

use crate::archive::{self, NestedArchive, SubStream};
use crate::hand::{Hand, TableSession};
use crate::records::Record;
use crate::sync::{RecordStream, SessionError, StreamError, Synchronizer};

/// Game types extracted when nothing else is configured.
pub const DEFAULT_GAME_TYPES: &[&str] = &["holdem3"];

const MEMBER_SUFFIX: &str = ".tgz";
const PDB_MARKER: &str = "pdb/pdb.";

type Stream<T> = RecordStream<Cursor<Vec<u8>>, T>;

/// Settings shared read-only by every group extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSettings {
    pub game_types: BTreeSet<String>,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            game_types: DEFAULT_GAME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Work out which table session a member holds, if it is one we extract.
///
/// `IRCdata/holdem3.199901.tgz` is game `holdem3`, folder `holdem3/199901`.
pub fn table_session(member: &str, game_types: &BTreeSet<String>) -> Option<TableSession> {
    let file_name = member.rsplit('/').next().unwrap_or(member);
    let stem = file_name.strip_suffix(MEMBER_SUFFIX)?;
    let game = stem.split('.').next().unwrap_or(stem);
    if !game_types.contains(game) {
        return None;
    }
    Some(TableSession::new(game, stem.replace('.', "/")))
}

fn stream<T: Record>(file: SubStream, complete: bool) -> Stream<T> {
    let stream = RecordStream::new(file.name, Cursor::new(file.data));
    if file.complete && complete {
        stream
    } else {
        stream.truncated()
    }
}

/// Extract every hand of the table session stored in `member`.
///
/// Never fails: anything that goes wrong is logged and ends this session with
/// the hands produced so far (possibly none).
pub fn extract_group(archive_path: &Path, member: &str, settings: &GroupSettings) -> Vec<Hand> {
    let Some(session) = table_session(member, &settings.game_types) else {
        debug!("Skipping {}", member);
        return Vec::new();
    };

    let file = match archive::read_member(archive_path, member) {
        Ok(Some(file)) => file,
        Ok(None) => {
            error!("File {} not found", member);
            return Vec::new();
        }
        Err(e) => {
            error!("{}, skipping {}", e, member);
            return Vec::new();
        }
    };
    info!("Extracting {}", member);

    let mut nested = NestedArchive::load(member, &file.data);
    let complete = file.complete && nested.is_complete();
    drop(file);

    let hdb_name = format!("{}/hdb", session.folder);
    let Some(hdb) = nested.take(&hdb_name) else {
        error!("File {} not found", hdb_name);
        return Vec::new();
    };
    debug!("File {} extracted", hdb_name);

    let roster_name = format!("{}/hroster", session.folder);
    let Some(roster) = nested.take(&roster_name) else {
        error!("File {} not found", roster_name);
        return Vec::new();
    };
    debug!("File {} extracted", roster_name);

    let players: HashMap<String, _> = nested
        .take_matching(PDB_MARKER)
        .into_iter()
        .map(|(player, file)| (player, stream(file, true)))
        .collect();
    debug!(
        "File {}/pdb extracted, {} files in total",
        session.folder,
        players.len()
    );

    // A damaged archive ends the session once the hdb data runs out.
    let hdb = stream(hdb, complete);
    let roster = stream(roster, true);

    let mut hands = Vec::new();
    for result in Synchronizer::new(session, hdb, roster, players) {
        match result {
            Ok(hand) => hands.push(hand),
            Err(SessionError::Stream(StreamError::Truncated { name })) => {
                error!("{} ended unexpectedly, skipping the rest of {}", name, member);
            }
            Err(e) => error!("{}, skipping the rest of {}", e, member),
        }
    }
    debug!("Closing all files for {}", member);
    hands
}
