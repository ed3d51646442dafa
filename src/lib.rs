//! ircpoker - poker hand extraction from the IRC poker database
//!
//! Turns the nested `.tgz` archive of the IRC poker database into a stream of
//! fully cross-referenced [`Hand`]s, optionally cached as one JSON file.

pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod hand;
pub mod logging;
pub mod records;
pub mod sync;

pub use config::Config;
pub use error::ExtractError;
pub use extractor::{Extractor, ExtractorOptions, HandStream, Jobs};
pub use hand::{Hand, PlayerHand, Pot, StreetBets, TableSession};
