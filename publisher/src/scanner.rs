//! Artefact discovery in the build output directory.
//!
//! The build writes its artefact under a name carrying a variable token (a
//! content hash or version stamp), so the publisher has to find it by pattern
//! and pick the freshest one.

use crate::config::ArtefactPattern;
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::cmp::Ordering;
use std::io;
use std::time::SystemTime;

/// A file in the output directory whose name matches the artefact pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path to the file.
    pub path: Utf8PathBuf,
    /// File name component, used for tie-breaking.
    pub file_name: String,
    /// Last modification time.
    pub modified: SystemTime,
}

impl Candidate {
    /// Order candidates by freshness.
    ///
    /// Later modification times rank higher. Equal times fall back to the
    /// byte-wise order of the file name, so the lexically greatest name ranks
    /// highest and selection never depends on directory iteration order.
    #[must_use]
    pub fn freshness(&self, other: &Self) -> Ordering {
        self.modified
            .cmp(&other.modified)
            .then_with(|| self.file_name.cmp(&other.file_name))
    }
}

/// Scan `dir` for regular files whose names match `pattern`.
///
/// A missing directory yields no candidates. Subdirectories are ignored, and
/// symbolic links are followed. Entries that vanish before their metadata is
/// read, and dangling symbolic links, are skipped.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read, or if a
/// matching entry's metadata cannot be queried for any reason other than the
/// entry being gone.
pub fn scan_artefacts(dir: &Utf8Path, pattern: &ArtefactPattern) -> io::Result<Vec<Candidate>> {
    if !dir.is_dir() {
        trace!("output directory {dir} does not exist");
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let file_name = entry.file_name();

        if !pattern.matches(file_name) {
            continue;
        }

        let metadata = match std::fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!("skipping {file_name}: target is gone");
                continue;
            }
            Err(err) => return Err(err),
        };
        if !metadata.is_file() {
            continue;
        }

        trace!("candidate artefact {file_name}");
        candidates.push(Candidate {
            path: entry.path().to_owned(),
            file_name: file_name.to_owned(),
            modified: metadata.modified()?,
        });
    }

    Ok(candidates)
}

/// Select the freshest candidate according to [`Candidate::freshness`].
#[must_use]
pub fn select_latest(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().max_by(Candidate::freshness)
}
