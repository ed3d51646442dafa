//! Command-line definitions, shared by the binary and the man page generator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "ircpoker")]
#[command(version, long_version = long_version())]
#[command(about = "Extract poker hands from the IRC poker database")]
#[command(
    long_about = "Extract poker hands from the IRC poker database archive.\n\n\
    Every table session in the archive is cross-referenced (hand database, roster \
    and per-player records) into complete hands. With an output file the hands are \
    saved as one JSON array, and later runs replay that file instead of extracting again."
)]
pub struct Cli {
    /// Configuration file (default: ~/.config/ircpoker/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract hands and print how many were found
    #[command(long_about = "Extract hands from the input archive.\n\n\
        If the output file already exists it is replayed instead and the input \
        archive is not read.\n\n\
        EXAMPLES:\n    \
        ircpoker extract --input IRCdata.tgz --output hands.json --jobs -1\n    \
        ircpoker extract --output hands.json --print | head")]
    Extract(ExtractArgs),

    /// Inspect the configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Outer archive (.tgz)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Result file (.json); replayed when it exists
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads, -1 for all cores
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub jobs: Option<i64>,

    /// Game type to extract (repeatable, replaces the configured list)
    #[arg(short, long = "game-type", value_name = "GAME")]
    pub game_types: Vec<String>,

    /// Write every hand to stdout as one JSON line
    #[arg(long)]
    pub print: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Print the default configuration file location
    Path,
}

/// `--version` detail: build date, plus the commit for development builds.
fn long_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let date = env!("IRCPOKER_BUILD_DATE");
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) => format!("{version} (commit {sha}, built {date})"),
        None => format!("{version} (built {date})"),
    }
}
