//! Errors surfaced by [`Extractor`](crate::Extractor).
//!
//! Per-hand and per-session problems never show up here; they are logged and
//! skipped inside the extraction. What remains is bad configuration, an outer
//! archive that cannot be listed, and cache I/O.

use std::path::PathBuf;

use crate::archive::ArchiveError;
use crate::cache::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Input file {} must be a .tgz archive", path.display())]
    InvalidInput { path: PathBuf },

    #[error("Output file {} must be a .json file", path.display())]
    InvalidOutput { path: PathBuf },

    #[error("No input archive configured and no cached output to replay")]
    MissingInput,

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
