//! Static-site build invocation.
//!
//! The site generator is an opaque collaborator: this module runs it as a
//! subprocess, waits for it, and turns a nonzero exit into
//! [`PublisherError::BuildFailed`].

use crate::error::{PublisherError, Result};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Configuration for the build step.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Directory the command runs in (the repository root).
    pub working_dir: Utf8PathBuf,
}

/// Runs the configured build command.
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    /// Create a new builder with the given configuration.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Return the command line as a single display string.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.config.command.join(" ")
    }

    /// Run the build to completion.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::BuildFailed`] if the command is empty, cannot
    /// be started, or exits unsuccessfully.
    pub fn run(&self, executor: &dyn CommandExecutor) -> Result<()> {
        let command_line = self.command_line();
        let Some((program, rest)) = self.config.command.split_first() else {
            return Err(PublisherError::BuildFailed {
                command: command_line,
                code: None,
                reason: "no build command configured".to_owned(),
            });
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        debug!("running build: {command_line} (in {})", self.config.working_dir);

        let output = executor
            .run(program, &args, self.working_dir())
            .map_err(|e| match e {
                PublisherError::Io(io) => PublisherError::BuildFailed {
                    command: command_line.clone(),
                    code: None,
                    reason: format!("failed to start: {io}"),
                },
                other => other,
            })?;

        if !output.stdout.is_empty() {
            debug!("build output:\n{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PublisherError::BuildFailed {
                command: command_line,
                code: output.status.code(),
                reason: stderr.trim().to_owned(),
            });
        }

        Ok(())
    }

    fn working_dir(&self) -> &Utf8Path {
        &self.config.working_dir
    }
}
