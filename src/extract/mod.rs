//! Hand extraction from the outer archive: one table session at a time in
//! [`group`], fanned out over a worker pool in [`pool`].

pub mod group;
pub mod pool;

pub use group::{extract_group, table_session, GroupSettings, DEFAULT_GAME_TYPES};
pub use pool::LiveHands;
