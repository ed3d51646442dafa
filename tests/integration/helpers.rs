//! Fixture archives shaped like the IRC poker database.
//!
//! The standard fixture holds:
//!
//! - `holdem3.199901`: three complete hands (alice, bob)
//! - `holdem3.199902`: three hands of which only the first survives; dave's
//!   second line has an invalid action and he has no line for the third
//! - `holdem3.199903`: no hroster file, so nothing
//! - `7stud.199901`: one complete hand, only extracted when `7stud` is enabled
//! - a `README` that is not a session at all

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Hands in the standard fixture with the default game types.
pub const HOLDEM_HANDS: usize = 4;

/// Hands in the standard fixture with `holdem3` and `7stud` enabled.
pub const ALL_HANDS: usize = 5;

/// Build a gzip-compressed tar holding `files` in order.
pub fn tgz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// One table session: folder inside its archive plus its text files.
pub struct Session<'a> {
    pub member: &'a str,
    pub folder: &'a str,
    pub hdb: Option<&'a str>,
    pub hroster: Option<&'a str>,
    pub pdb: &'a [(&'a str, &'a str)],
}

impl Session<'_> {
    pub fn to_tgz(&self) -> Vec<u8> {
        let mut files: Vec<(String, &[u8])> = Vec::new();
        if let Some(hdb) = self.hdb {
            files.push((format!("{}/hdb", self.folder), hdb.as_bytes()));
        }
        if let Some(hroster) = self.hroster {
            files.push((format!("{}/hroster", self.folder), hroster.as_bytes()));
        }
        for (player, data) in self.pdb {
            files.push((format!("{}/pdb/pdb.{}", self.folder, player), data.as_bytes()));
        }
        let refs: Vec<(&str, &[u8])> = files.iter().map(|(n, d)| (n.as_str(), *d)).collect();
        tgz(&refs)
    }
}

/// Write an outer archive of sessions plus any extra raw members.
pub fn write_outer(path: &Path, sessions: &[Session<'_>], extra: &[(&str, &[u8])]) {
    let nested: Vec<(String, Vec<u8>)> = sessions
        .iter()
        .map(|s| (s.member.to_string(), s.to_tgz()))
        .collect();

    let file = File::create(path).expect("create outer archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let entries = nested
        .iter()
        .map(|(n, d)| (n.as_str(), d.as_slice()))
        .chain(extra.iter().copied());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, data)
            .expect("append member");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

pub fn session_a() -> Session<'static> {
    Session {
        member: "IRCdata/holdem3.199901.tgz",
        folder: "holdem3/199901",
        hdb: Some(
            "123456789 1 5 2 2/10 3/20 0/0 0/0\n\
             123456800 2 6 2 2/20 2/40 2/60 2/80 As Kd Qh Jc Ts\n\
             123456810 1 7 2 2/10 0/0 0/0 0/0\n",
        ),
        hroster: Some(
            "123456789 2 alice bob\n\
             123456800 2 alice bob\n\
             123456810 2 alice bob\n",
        ),
        pdb: &[
            (
                "alice",
                "alice 123456789 2 1 Bc - - - 990 10 20\n\
                 alice 123456800 2 2 Bc b b b 1000 40 80 Ah Ad\n\
                 alice 123456810 2 1 Bc - - - 1040 10 20\n",
            ),
            (
                "bob",
                "bob 123456789 2 2 Bk - - - 1010 10 0\n\
                 bob 123456800 2 1 Bc c c c 1000 40 0 2c 7d\n\
                 bob 123456810 2 2 Bk - - - 960 10 0\n",
            ),
        ],
    }
}

pub fn session_b() -> Session<'static> {
    Session {
        member: "IRCdata/holdem3.199902.tgz",
        folder: "holdem3/199902",
        hdb: Some(
            "223456789 1 1 2 2/10 0/0 0/0 0/0\n\
             223456800 2 2 2 2/10 0/0 0/0 0/0\n\
             223456810 1 3 2 2/10 0/0 0/0 0/0\n",
        ),
        hroster: Some(
            "223456789 2 carol dave\n\
             223456800 2 carol dave\n\
             223456810 2 carol dave\n",
        ),
        pdb: &[
            (
                "carol",
                "carol 223456789 2 1 Bc - - - 500 10 20\n\
                 carol 223456800 2 2 Bc - - - 510 10 20\n\
                 carol 223456810 2 1 Bc - - - 520 10 20\n",
            ),
            (
                "dave",
                "dave 223456789 2 2 Bk - - - 500 10 0\n\
                 dave 223456800 2 1 Bx - - - 490 10 0\n",
            ),
        ],
    }
}

pub fn session_no_roster() -> Session<'static> {
    Session {
        member: "IRCdata/holdem3.199903.tgz",
        folder: "holdem3/199903",
        hdb: Some("323456789 1 1 1 1/10 0/0 0/0 0/0\n"),
        hroster: None,
        pdb: &[("erin", "erin 323456789 1 1 Bc - - - 500 10 20\n")],
    }
}

pub fn session_stud() -> Session<'static> {
    Session {
        member: "IRCdata/7stud.199901.tgz",
        folder: "7stud/199901",
        hdb: Some("423456789 1 1 1 1/10 0/0 0/0 0/0\n"),
        hroster: Some("423456789 1 frank\n"),
        pdb: &[("frank", "frank 423456789 1 1 Bc - - - 500 10 20\n")],
    }
}

/// Write the standard fixture into `dir` and return its path.
pub fn standard_archive(dir: &Path) -> PathBuf {
    let path = dir.join("IRCdata.tgz");
    write_outer(
        &path,
        &[session_a(), session_no_roster(), session_b(), session_stud()],
        &[("IRCdata/README", b"IRC poker database\n")],
    );
    path
}
