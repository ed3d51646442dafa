//! Read access to the outer archive and to the nested per-session archives.
//!
//! tar only supports sequential access, so every lookup rescans the outer
//! archive from the start and nested archives are read into memory once.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, Entry};
use tracing::error;

/// Errors opening or scanning an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Failed to open archive {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to read archive {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// One file read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubStream {
    pub name: String,
    pub data: Vec<u8>,
    /// False when reading stopped before the end of the file.
    pub complete: bool,
}

fn is_gzip(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".tgz") || name.ends_with(".gz")
}

/// Open a tar archive on disk, decompressing it when the name says so.
fn open(path: &Path) -> Result<Archive<Box<dyn Read>>, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(Archive::new(reader))
}

/// Entry path as stored, without a leading `./`.
fn entry_name<R: Read>(entry: &Entry<'_, R>) -> String {
    let raw = entry.path_bytes();
    let name = String::from_utf8_lossy(&raw);
    name.trim_start_matches("./").to_string()
}

/// Read an entry to its end, keeping whatever arrived before a failure.
fn read_entry<R: Read>(mut entry: Entry<'_, R>) -> SubStream {
    let name = entry_name(&entry);
    let expected = entry.size();
    let mut data = Vec::new();
    let complete = match entry.read_to_end(&mut data) {
        Ok(_) => data.len() as u64 == expected,
        Err(e) => {
            error!("Failed to read {}: {}", name, e);
            false
        }
    };
    SubStream {
        name,
        data,
        complete,
    }
}

/// Names of all regular files in the outer archive, in archive order.
pub fn member_names(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let read_err = |source| ArchiveError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut archive = open(path)?;
    let mut names = Vec::new();
    for entry in archive.entries().map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.header().entry_type().is_file() {
            names.push(entry_name(&entry));
        }
    }
    Ok(names)
}

/// Read the member called `name` out of the outer archive.
///
/// `Ok(None)` means the archive holds no such file.
pub fn read_member(path: &Path, name: &str) -> Result<Option<SubStream>, ArchiveError> {
    let read_err = |source| ArchiveError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut archive = open(path)?;
    for entry in archive.entries().map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.header().entry_type().is_file() && entry_name(&entry) == name {
            return Ok(Some(read_entry(entry)));
        }
    }
    Ok(None)
}

/// The regular files of one gzip-compressed nested archive, held in memory.
#[derive(Debug, Default)]
pub struct NestedArchive {
    files: Vec<SubStream>,
    complete: bool,
}

impl NestedArchive {
    /// Unpack `data` as a `.tgz`. Reading stops at the first damaged entry;
    /// the files read up to that point are kept.
    pub fn load(name: &str, data: &[u8]) -> Self {
        let mut archive = Archive::new(GzDecoder::new(data));
        let mut files = Vec::new();

        let entries = match archive.entries() {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to open nested archive {}: {}", name, e);
                return Self::default();
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Nested archive {} ended unexpectedly: {}", name, e);
                    return Self {
                        files,
                        complete: false,
                    };
                }
            };
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let file = read_entry(entry);
            let complete = file.complete;
            files.push(file);
            if !complete {
                return Self {
                    files,
                    complete: false,
                };
            }
        }

        Self {
            files,
            complete: true,
        }
    }

    /// False when the archive itself was cut short.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    /// Remove and return the file called `name`.
    pub fn take(&mut self, name: &str) -> Option<SubStream> {
        let idx = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.swap_remove(idx))
    }

    /// Remove and return every file whose name contains `marker`, paired
    /// with the text after the last occurrence of it.
    pub fn take_matching(&mut self, marker: &str) -> Vec<(String, SubStream)> {
        let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.name.contains(marker));
        self.files = rest;

        matching
            .into_iter()
            .filter_map(|f| {
                let (_, key) = f.name.rsplit_once(marker)?;
                Some((key.to_string(), f))
            })
            .collect()
    }
}
