//! The publish operation: build, select, copy.
//!
//! Steps run in order and the first failure aborts the rest. In particular a
//! failed build never reaches the scan, so an artefact left over from an
//! earlier run cannot be published by mistake.

use crate::builder::{BuildConfig, Builder};
use crate::config::Settings;
use crate::error::{PublisherError, Result};
use crate::exec::CommandExecutor;
use crate::scanner::{scan_artefacts, select_latest};
use crate::stager::Stager;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};

/// What a successful publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// The artefact that was selected.
    pub source: Utf8PathBuf,
    /// The published path it was copied to.
    pub destination: Utf8PathBuf,
    /// Number of bytes copied.
    pub bytes: u64,
}

/// Publishes the latest build artefact for a repository.
pub struct Publisher<'a> {
    settings: &'a Settings,
    root: &'a Utf8Path,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Publisher<'a> {
    /// Create a publisher for the repository at `root`.
    #[must_use]
    pub fn new(settings: &'a Settings, root: &'a Utf8Path, executor: &'a dyn CommandExecutor) -> Self {
        Self {
            settings,
            root,
            executor,
        }
    }

    /// Run the build, then promote its latest artefact.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::BuildFailed`] if the build fails (nothing else
    /// runs), otherwise any error from [`Self::promote`].
    pub fn publish(&self) -> Result<PublishReport> {
        let builder = Builder::new(BuildConfig {
            command: self.settings.build.command.clone(),
            working_dir: self.root.to_owned(),
        });
        builder.run(self.executor)?;
        info!("build finished: {}", builder.command_line());

        self.promote()
    }

    /// Select the latest matching artefact and copy it to the published path,
    /// without running the build.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::NoArtefactFound`] when nothing matches (the
    /// published path is left untouched), [`PublisherError::ScanFailed`] when
    /// the output directory cannot be listed and [`PublisherError::CopyFailed`]
    /// when the copy fails.
    pub fn promote(&self) -> Result<PublishReport> {
        let artefact = &self.settings.artefact;
        let output_dir = self.root.join(&artefact.output_dir);

        let candidates =
            scan_artefacts(&output_dir, &artefact.pattern).map_err(|e| PublisherError::ScanFailed {
                dir: output_dir.clone(),
                reason: e.to_string(),
            })?;
        debug!("{} candidate artefact(s) in {output_dir}", candidates.len());

        let selected = select_latest(candidates).ok_or_else(|| PublisherError::NoArtefactFound {
            dir: output_dir.clone(),
            pattern: artefact.pattern.to_string(),
        })?;

        let stager = Stager::new(self.root.join(&artefact.destination));
        let bytes = stager.stage(&selected.path)?;
        info!("published {} to {}", selected.path, stager.destination());

        Ok(PublishReport {
            source: selected.path,
            destination: stager.destination().to_owned(),
            bytes,
        })
    }
}
