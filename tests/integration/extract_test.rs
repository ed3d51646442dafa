//! End-to-end extraction over fixture archives

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::Path;

use tempfile::TempDir;

use ircpoker::extract::{extract_group, GroupSettings, LiveHands};
use ircpoker::{Extractor, ExtractorOptions, Hand, Jobs};

use crate::helpers::{
    session_a, standard_archive, write_outer, Session, ALL_HANDS, HOLDEM_HANDS,
};

fn extract(input: &Path, jobs: Jobs, game_types: &[&str]) -> Vec<Hand> {
    let extractor = Extractor::new(ExtractorOptions {
        input: Some(input.to_path_buf()),
        output: None,
        jobs,
        game_types: game_types.iter().map(|s| s.to_string()).collect(),
    })
    .unwrap();
    let stream = extractor.hands().unwrap();
    assert!(!stream.is_replay());
    stream.map(Result::unwrap).collect()
}

fn ids(hands: &[Hand]) -> BTreeSet<String> {
    hands.iter().map(|h| h.id.clone()).collect()
}

#[test]
fn extracts_every_complete_holdem_hand() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let hands = extract(&input, Jobs::from_count(2), &["holdem3"]);
    assert_eq!(hands.len(), HOLDEM_HANDS);

    let expected: BTreeSet<String> = [
        "holdem3_199901_123456789",
        "holdem3_199901_123456800",
        "holdem3_199901_123456810",
        "holdem3_199902_223456789",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(ids(&hands), expected);
}

#[test]
fn every_hand_is_consistent() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    for hand in extract(&input, Jobs::All, &["holdem3", "7stud"]) {
        assert_eq!(hand.players.len() as i64, hand.num_players);
        assert_eq!(hand.pots.len(), 4);
        assert!(hand.board.len() <= 5);
        for player in hand.players.values() {
            assert_eq!(player.bets.len(), 4);
            assert!(player.pocket_cards.len() <= 2);
        }
        assert!(hand.id.starts_with(&hand.game));
    }
}

#[test]
fn missing_and_malformed_pdb_lines_drop_only_their_hands() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let hands = extract(&input, Jobs::default(), &["holdem3"]);
    let session_b: Vec<&str> = hands
        .iter()
        .filter(|h| h.id.starts_with("holdem3_199902_"))
        .map(|h| h.id.as_str())
        .collect();
    assert_eq!(session_b, vec!["holdem3_199902_223456789"]);

    let hand = hands
        .iter()
        .find(|h| h.id == "holdem3_199902_223456789")
        .unwrap();
    let names: Vec<&str> = hand.players.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["carol", "dave"]);
}

#[test]
fn hands_of_one_session_keep_hdb_order() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let hands = extract(&input, Jobs::All, &["holdem3"]);
    let session_a: Vec<&str> = hands
        .iter()
        .filter(|h| h.id.starts_with("holdem3_199901_"))
        .map(|h| h.id.as_str())
        .collect();
    assert_eq!(
        session_a,
        vec![
            "holdem3_199901_123456789",
            "holdem3_199901_123456800",
            "holdem3_199901_123456810",
        ]
    );
}

#[test]
fn hand_fields_come_from_all_three_streams() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let hands = extract(&input, Jobs::default(), &["holdem3"]);
    let hand = hands
        .iter()
        .find(|h| h.id == "holdem3_199901_123456800")
        .unwrap();

    assert_eq!(hand.game, "holdem3");
    assert_eq!(hand.dealer, 2);
    assert_eq!(hand.hand_num, 6);
    assert_eq!(hand.board.len(), 5);
    assert_eq!(hand.pots[3].size, 80);

    let alice = &hand.players["alice"];
    assert_eq!(alice.position, 2);
    assert_eq!(alice.total_bet, 40);
    assert_eq!(alice.total_win, 80);
    assert_eq!(alice.pocket_cards.len(), 2);
    assert_eq!(hand.players["bob"].bankroll, 1000);
}

#[test]
fn game_types_select_members() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    assert_eq!(extract(&input, Jobs::default(), &["holdem3", "7stud"]).len(), ALL_HANDS);

    let stud = extract(&input, Jobs::default(), &["7stud"]);
    assert_eq!(stud.len(), 1);
    assert_eq!(stud[0].id, "7stud_199901_423456789");
    assert_eq!(stud[0].game, "7stud");
}

#[test]
fn repeated_runs_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let single = extract(&input, Jobs::default(), &["holdem3"]);
    let parallel = extract(&input, Jobs::from_count(4), &["holdem3"]);
    assert_eq!(single.len(), parallel.len());
    assert_eq!(ids(&single), ids(&parallel));
}

#[test]
fn empty_outer_archive_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.tgz");
    write_outer(&input, &[], &[]);

    assert!(extract(&input, Jobs::All, &["holdem3"]).is_empty());
}

#[test]
fn group_extraction_of_one_member() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());
    let settings = GroupSettings::default();

    assert_eq!(
        extract_group(&input, "IRCdata/holdem3.199901.tgz", &settings).len(),
        3
    );
    assert!(extract_group(&input, "IRCdata/holdem3.199903.tgz", &settings).is_empty());
    assert!(extract_group(&input, "IRCdata/README", &settings).is_empty());
    assert!(extract_group(&input, "IRCdata/holdem3.200001.tgz", &settings).is_empty());
}

#[test]
fn missing_pdb_file_drops_hands_of_that_player() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("IRCdata.tgz");
    let full = session_a();
    let without_bob = Session {
        pdb: &full.pdb[..1],
        ..full
    };
    write_outer(&input, &[without_bob], &[]);

    assert!(extract(&input, Jobs::default(), &["holdem3"]).is_empty());
}

#[test]
fn player_count_mismatch_ends_only_its_session() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("IRCdata.tgz");
    let broken = Session {
        member: "IRCdata/holdem3.199904.tgz",
        folder: "holdem3/199904",
        hdb: Some("523456789 1 1 1 1/10 0/0 0/0 0/0\n523456800 1 2 3 3/10 0/0 0/0 0/0\n523456810 1 3 1 1/10 0/0 0/0 0/0\n"),
        hroster: Some("523456789 1 gina\n523456800 1 gina\n523456810 1 gina\n"),
        pdb: &[(
            "gina",
            "gina 523456789 1 1 Bc - - - 500 10 20\n\
             gina 523456800 1 1 Bc - - - 500 10 20\n\
             gina 523456810 1 1 Bc - - - 500 10 20\n",
        )],
    };
    write_outer(&input, &[broken, session_a()], &[]);

    let hands = extract(&input, Jobs::from_count(2), &["holdem3"]);
    let found = ids(&hands);
    assert!(found.contains("holdem3_199904_523456789"));
    assert!(!found.contains("holdem3_199904_523456810"));
    assert_eq!(hands.len(), 1 + 3);
}

#[test]
fn truncated_nested_archive_keeps_earlier_hands() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("IRCdata.tgz");

    // The nested archive stops halfway; whatever it yields must still be
    // complete hands and the other session is unaffected.
    let mut damaged = session_a().to_tgz();
    damaged.truncate(damaged.len() / 2);

    let file = std::fs::File::create(&input).unwrap();
    let mut builder = tar::Builder::new(flate2::write::GzEncoder::new(
        file,
        flate2::Compression::default(),
    ));
    for (name, data) in [
        ("IRCdata/holdem3.199901.tgz", damaged),
        ("IRCdata/holdem3.199902.tgz", crate::helpers::session_b().to_tgz()),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data.as_slice()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();

    let hands = extract(&input, Jobs::from_count(2), &["holdem3"]);
    assert!(ids(&hands).contains("holdem3_199902_223456789"));
    for hand in &hands {
        assert_eq!(hand.players.len() as i64, hand.num_players);
    }
    assert!(hands.len() <= 4);
}

#[test]
fn live_hands_count_members_and_hands() {
    let dir = TempDir::new().unwrap();
    let input = standard_archive(dir.path());

    let mut live = LiveHands::start(
        &input,
        NonZeroUsize::new(3).unwrap(),
        GroupSettings::default(),
    )
    .unwrap();
    let hands: Vec<Hand> = live.by_ref().collect();
    assert_eq!(hands.len(), HOLDEM_HANDS);
    assert_eq!(live.total(), HOLDEM_HANDS);
    // four sessions plus the README
    assert_eq!(live.members_done(), 5);
}
