//! Command handlers for the ircpoker binary

pub mod completions;
pub mod config;
pub mod extract;
