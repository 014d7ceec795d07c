//! Copying the selected artefact to its published path.
//!
//! The copy is written to a temporary file next to the destination and renamed
//! over it, so readers of the published path see either the previous artefact
//! or the new one, never a partial file.

use crate::error::{PublisherError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use tempfile::NamedTempFile;

/// Publishes artefacts to a fixed destination path.
pub struct Stager {
    destination: Utf8PathBuf,
}

impl Stager {
    /// Create a stager for the given destination file.
    #[must_use]
    pub fn new(destination: Utf8PathBuf) -> Self {
        Self { destination }
    }

    /// Return the destination path.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Copy `source` to the destination, creating parent directories and
    /// overwriting any existing file. Returns the number of bytes copied.
    ///
    /// The published file takes the source file's permissions.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::CopyFailed`] if the destination directory
    /// cannot be created or the copy cannot be completed.
    pub fn stage(&self, source: &Utf8Path) -> Result<u64> {
        self.copy_into_place(source)
            .map_err(|e| PublisherError::CopyFailed {
                source_path: source.to_owned(),
                destination: self.destination.clone(),
                reason: e.to_string(),
            })
    }

    fn copy_into_place(&self, source: &Utf8Path) -> io::Result<u64> {
        let parent = self.destination_dir();
        fs::create_dir_all(parent)?;

        let mut input = fs::File::open(source)?;
        let permissions = input.metadata()?.permissions();

        let mut staged = NamedTempFile::new_in(parent)?;
        let bytes = io::copy(&mut input, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        fs::set_permissions(staged.path(), permissions)?;

        staged.persist(&self.destination).map_err(|e| e.error)?;
        Ok(bytes)
    }

    fn destination_dir(&self) -> &Utf8Path {
        match self.destination.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        }
    }
}
