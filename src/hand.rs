//! Synchronized hand records - the extractor's output.
//!
//! A [`Hand`] joins one hdb record, the roster for the same timestamp, and one
//! pdb record per seated player. The serialized field names are the cache
//! file format, so renaming any of them invalidates existing caches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::{Actions, Card, HdbRecord, PdbRecord, Stage, Timestamp};

/// One table session inside the outer archive, e.g. `holdem3/199901`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableSession {
    /// Game type prefix of the member name (`holdem3`).
    pub game: String,
    /// Directory holding the session's streams inside the nested archive.
    pub folder: String,
}

impl TableSession {
    pub fn new(game: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            folder: folder.into(),
        }
    }

    /// Deterministic hand identity: folder path with `/` flattened, then the timestamp.
    pub fn hand_id(&self, timestamp: Timestamp) -> String {
        format!("{}_{}", self.folder.replace('/', "_"), timestamp)
    }
}

/// A fully cross-referenced poker hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    #[serde(rename = "_id")]
    pub id: String,
    pub board: Vec<Card>,
    pub dealer: i64,
    pub game: String,
    pub hand_num: u64,
    pub num_players: i64,
    pub players: BTreeMap<String, PlayerHand>,
    pub pots: Vec<Pot>,
}

/// One player's part in a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub total_bet: i64,
    pub bankroll: i64,
    pub bets: Vec<StreetBets>,
    pub pocket_cards: Vec<Card>,
    pub position: i64,
    pub total_win: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetBets {
    pub actions: Actions,
    pub stage: Stage,
}

/// Chips in the pot and players left at the end of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub num_players: u32,
    pub stage: Stage,
    pub size: u64,
}

impl Hand {
    /// Build a hand from records already matched on timestamp.
    ///
    /// The caller guarantees every `seats` record carries `hdb.timestamp`.
    pub fn assemble(
        session: &TableSession,
        hdb: &HdbRecord,
        seats: BTreeMap<String, &PdbRecord>,
    ) -> Self {
        debug_assert!(seats.values().all(|p| p.timestamp == hdb.timestamp));

        let players = seats
            .into_iter()
            .map(|(name, pdb)| (name, PlayerHand::from(pdb)))
            .collect();

        let pots = hdb
            .stage_pots()
            .iter()
            .map(|&(stage, pot)| Pot {
                num_players: pot.num_players,
                stage,
                size: pot.size,
            })
            .collect();

        Hand {
            id: session.hand_id(hdb.timestamp),
            board: hdb.board.clone(),
            dealer: hdb.dealer,
            game: session.game.clone(),
            hand_num: hdb.hand_num,
            num_players: hdb.num_players,
            players,
            pots,
        }
    }
}

impl From<&PdbRecord> for PlayerHand {
    fn from(pdb: &PdbRecord) -> Self {
        PlayerHand {
            total_bet: pdb.total_bet,
            bankroll: pdb.bankroll,
            bets: pdb
                .bets()
                .iter()
                .map(|&(stage, actions)| StreetBets {
                    actions: actions.clone(),
                    stage,
                })
                .collect(),
            pocket_cards: pdb.pocket_cards.clone(),
            position: pdb.position,
            total_win: pdb.total_win,
        }
    }
}
