//! ircpoker command-line entry point

mod commands;

use anyhow::Result;
use clap::Parser;

use ircpoker::cli::{Cli, Commands, ConfigCommands};
use ircpoker::{logging, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(logging::filter(&config.log.level, cli.verbose, cli.quiet));

    match cli.command {
        Commands::Extract(args) => commands::extract::handle(&config, args),
        Commands::Config(ConfigCommands::Show) => commands::config::handle_show(&config),
        Commands::Config(ConfigCommands::Path) => commands::config::handle_path(),
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
