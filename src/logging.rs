//! Log output setup for the command-line tool.
//!
//! The library only emits `tracing` events; this installs the subscriber that
//! prints them to stderr. Precedence: `-q`/`-v` flags, then `RUST_LOG`, then
//! the configured level.

use tracing_subscriber::EnvFilter;

/// Level forced by command-line flags, if any.
pub fn flag_level(verbose: u8, quiet: bool) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

pub fn filter(configured: &str, verbose: u8, quiet: bool) -> EnvFilter {
    if let Some(level) = flag_level(verbose, quiet) {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
}

/// Install the stderr subscriber. A second call is a no-op.
pub fn init(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
