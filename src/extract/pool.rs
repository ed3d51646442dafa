//! Parallel extraction over every member of the outer archive.
//!
//! Members are handed to a rayon pool a few at a time. Each worker runs one
//! [`extract_group`] to completion and sends its hands back over a channel, so
//! results surface in completion order. New members are only submitted when
//! the consumer pulls, which keeps memory bounded by what the consumer drains.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{error, info};

use super::group::{extract_group, GroupSettings};
use crate::archive;
use crate::error::ExtractError;
use crate::hand::Hand;

/// Members allowed in flight per worker thread.
const IN_FLIGHT_PER_WORKER: usize = 2;

/// Hands of one finished member.
struct MemberResult {
    member: String,
    hands: Vec<Hand>,
}

/// Lazy, completion-ordered stream of every hand in the outer archive.
pub struct LiveHands {
    archive: Arc<PathBuf>,
    settings: Arc<GroupSettings>,
    pool: rayon::ThreadPool,
    pending: std::vec::IntoIter<String>,
    in_flight: usize,
    max_in_flight: usize,
    result_tx: Sender<MemberResult>,
    result_rx: Receiver<MemberResult>,
    current: std::vec::IntoIter<Hand>,
    members_done: usize,
    total: usize,
}

impl LiveHands {
    /// List the archive's members and start a pool of `workers` threads.
    ///
    /// Nothing is extracted until the first hand is requested.
    pub fn start(
        archive_path: &Path,
        workers: NonZeroUsize,
        settings: GroupSettings,
    ) -> Result<Self, ExtractError> {
        info!(
            "Initializing poker hand data extraction from {}",
            archive_path.display()
        );
        let members = archive::member_names(archive_path)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("ircpoker-extract-{i}"))
            .build()?;

        let (result_tx, result_rx) = mpsc::channel();
        Ok(Self {
            archive: Arc::new(archive_path.to_path_buf()),
            settings: Arc::new(settings),
            pool,
            pending: members.into_iter(),
            in_flight: 0,
            max_in_flight: workers.get() * IN_FLIGHT_PER_WORKER,
            result_tx,
            result_rx,
            current: Vec::new().into_iter(),
            members_done: 0,
            total: 0,
        })
    }

    /// Hands extracted so far.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Members whose extraction has finished and been collected.
    pub fn members_done(&self) -> usize {
        self.members_done
    }

    fn submit(&mut self) {
        while self.in_flight < self.max_in_flight {
            let Some(member) = self.pending.next() else {
                break;
            };
            let archive = Arc::clone(&self.archive);
            let settings = Arc::clone(&self.settings);
            let result_tx = self.result_tx.clone();

            self.pool.spawn(move || {
                let hands = panic::catch_unwind(AssertUnwindSafe(|| {
                    extract_group(&archive, &member, &settings)
                }))
                .unwrap_or_else(|_| {
                    error!("Extraction of {} panicked, skipping it", member);
                    Vec::new()
                });
                // Ignore send errors (consumer may have stopped early)
                let _ = result_tx.send(MemberResult { member, hands });
            });
            self.in_flight += 1;
        }
    }
}

impl Iterator for LiveHands {
    type Item = Hand;

    fn next(&mut self) -> Option<Hand> {
        loop {
            if let Some(hand) = self.current.next() {
                return Some(hand);
            }

            self.submit();
            if self.in_flight == 0 {
                return None;
            }

            // We hold a sender ourselves, so this only returns once a worker reports.
            let result = self.result_rx.recv().ok()?;
            self.in_flight -= 1;
            self.members_done += 1;

            if result.hands.is_empty() {
                continue;
            }
            self.total += result.hands.len();
            info!(
                "{} hands extracted from {}, {} hands extracted by far",
                result.hands.len(),
                result.member,
                self.total
            );
            self.current = result.hands.into_iter();
        }
    }
}
