//! Error types for the site publisher.
//!
//! Every failure is fatal to the invocation. The variants carry enough context
//! for the CLI to print an actionable message, and [`PublisherError::exit_code`]
//! maps them onto the process exit status.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while publishing artefacts or installing the hook.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// The external build command failed to start or exited unsuccessfully.
    #[error("build command `{command}` failed ({}): {reason}", describe_exit(.code))]
    BuildFailed {
        /// The command line that was run.
        command: String,
        /// Exit code reported by the process, if it exited normally.
        code: Option<i32>,
        /// Description of the failure, usually the command's stderr.
        reason: String,
    },

    /// No file in the output directory matched the artefact pattern.
    #[error("no artefact matching {pattern} found in {dir}")]
    NoArtefactFound {
        /// The directory that was scanned.
        dir: Utf8PathBuf,
        /// The filename pattern that was applied.
        pattern: String,
    },

    /// The output directory exists but could not be listed.
    #[error("failed to scan {dir} for artefacts: {reason}")]
    ScanFailed {
        /// The directory that was scanned.
        dir: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// Creating the destination directory or copying the artefact failed.
    #[error("failed to copy {source_path} to {destination}: {reason}")]
    CopyFailed {
        /// The selected artefact.
        source_path: Utf8PathBuf,
        /// The published path.
        destination: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The hook script could not be written or made executable.
    #[error("failed to write hook {path}: {reason}")]
    WriteFailed {
        /// Path of the hook script.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// A configuration file named explicitly does not exist.
    #[error("configuration file {path} not found")]
    ConfigNotFound {
        /// The requested configuration path.
        path: Utf8PathBuf,
    },

    /// The configuration could not be parsed or failed validation.
    #[error("invalid configuration {path}: {reason}")]
    InvalidConfig {
        /// Path of the configuration file (or where it was expected).
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A git query failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed.
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// A command did not finish within its timeout and was killed.
    #[error("`{command}` timed out after {seconds} seconds")]
    TimedOut {
        /// The program that was run.
        command: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The project metadata prebuild could not read or write its files.
    #[error("project metadata prebuild failed: {reason}")]
    Prebuild {
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write user-facing output.
    #[error("failed to write output")]
    OutputFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl PublisherError {
    /// Return the process exit code for this error.
    ///
    /// A build that exited with a nonzero code propagates that code so the
    /// hook (or any caller) sees the generator's own status. Every other
    /// failure maps to `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_publisher::error::PublisherError;
    ///
    /// let err = PublisherError::BuildFailed {
    ///     command: "hugo".to_owned(),
    ///     code: Some(2),
    ///     reason: "template error".to_owned(),
    /// };
    /// assert_eq!(err.exit_code(), 2);
    /// ```
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BuildFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated without an exit code".to_owned(),
        |code| format!("exit code {code}"),
    )
}

/// Result type alias using [`PublisherError`].
pub type Result<T> = std::result::Result<T, PublisherError>;
