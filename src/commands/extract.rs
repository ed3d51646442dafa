//! Extract command handler

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use ircpoker::cli::ExtractArgs;
use ircpoker::{Config, Extractor, ExtractorOptions, Hand, Jobs};

/// Configured options with command-line flags applied on top.
fn options(config: &Config, args: ExtractArgs) -> ExtractorOptions {
    let mut options = config.extractor_options();
    if args.input.is_some() {
        options.input = args.input;
    }
    if args.output.is_some() {
        options.output = args.output;
    }
    if let Some(jobs) = args.jobs {
        options.jobs = Jobs::from_count(jobs);
    }
    if !args.game_types.is_empty() {
        options.game_types = args.game_types.into_iter().collect();
    }
    options
}

fn write_hand(out: &mut impl Write, hand: &Hand) -> io::Result<()> {
    serde_json::to_writer(&mut *out, hand)?;
    out.write_all(b"\n")
}

/// Run the extraction and report how many hands it produced.
///
/// With `--print` each hand goes to stdout as one JSON line and the total is
/// only logged.
pub fn handle(config: &Config, args: ExtractArgs) -> Result<()> {
    let print = args.print;
    let extractor = Extractor::new(options(config, args))?;
    let hands = extractor.hands()?;

    let mut out = BufWriter::new(io::stdout().lock());
    let mut total = 0usize;
    for hand in hands {
        let hand = hand?;
        total += 1;
        if print {
            match write_hand(&mut out, &hand) {
                Ok(()) => {}
                // Downstream closed (e.g. `| head`)
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
                Err(e) => return Err(e).context("Failed to write hand"),
            }
        }
    }

    info!("{} hands extracted in total", total);
    if !print {
        writeln!(out, "{} hands extracted", total)?;
    }
    out.flush()?;
    Ok(())
}
