//! Shell completions handler

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use ircpoker::cli::Cli;

/// Write the completion script for `shell` to stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ircpoker", &mut std::io::stdout());
    Ok(())
}
