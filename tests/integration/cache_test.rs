//! Output file persistence and replay

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use ircpoker::{Extractor, ExtractorOptions, Hand, Jobs};

use crate::helpers::{standard_archive, HOLDEM_HANDS};

fn extractor(input: Option<&Path>, output: &Path, jobs: Jobs) -> Extractor {
    Extractor::new(ExtractorOptions {
        input: input.map(Path::to_path_buf),
        output: Some(output.to_path_buf()),
        jobs,
        ..Default::default()
    })
    .unwrap()
}

fn drain(extractor: &Extractor) -> Vec<Hand> {
    extractor.hands().unwrap().map(Result::unwrap).collect()
}

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());
    let output = dir.path().join("hands.json");
    (dir, input, output)
}

#[test]
fn output_is_written_after_the_stream_is_drained() {
    let (_dir, input, output) = setup();

    let extractor = extractor(Some(&input), &output, Jobs::from_count(2));
    assert!(!extractor.is_cached());
    let hands = drain(&extractor);
    assert_eq!(hands.len(), HOLDEM_HANDS);
    assert!(output.is_file());

    let saved: Vec<Hand> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved, hands);
}

#[test]
fn second_run_replays_identical_sequence() {
    let (_dir, input, output) = setup();

    let first = drain(&extractor(Some(&input), &output, Jobs::All));

    // Removing the input proves the replay never touches it.
    std::fs::remove_file(&input).unwrap();
    let replayed = extractor(None, &output, Jobs::All);
    assert!(replayed.is_cached());
    let stream = replayed.hands().unwrap();
    assert!(stream.is_replay());
    let second: Vec<Hand> = stream.map(Result::unwrap).collect();

    assert_eq!(second, first);
}

#[test]
fn partially_consumed_stream_writes_nothing() {
    let (_dir, input, output) = setup();

    let extractor = extractor(Some(&input), &output, Jobs::default());
    let first = extractor.hands().unwrap().next();
    assert!(first.is_some());
    assert!(!output.exists());
}

#[test]
fn existing_output_wins_over_input() {
    let (_dir, input, output) = setup();
    std::fs::write(&output, "[]").unwrap();

    let hands = drain(&extractor(Some(&input), &output, Jobs::from_count(4)));
    assert!(hands.is_empty());
}

#[test]
fn corrupt_cache_surfaces_one_error() {
    let (_dir, input, output) = setup();
    std::fs::write(&output, "not json").unwrap();

    let items: Vec<_> = extractor(Some(&input), &output, Jobs::default())
        .hands()
        .unwrap()
        .collect();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_err());
}

#[test]
fn unwritable_output_is_the_final_item() {
    let (dir, input, _) = setup();
    let output = dir.path().join("no-such-dir").join("hands.json");

    let items: Vec<_> = extractor(Some(&input), &output, Jobs::default())
        .hands()
        .unwrap()
        .collect();
    assert_eq!(items.len(), HOLDEM_HANDS + 1);
    assert!(items[..HOLDEM_HANDS].iter().all(Result::is_ok));
    assert!(items[HOLDEM_HANDS].is_err());
}
