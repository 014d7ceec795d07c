//! Site publisher library.
//!
//! Runs a static-site build, picks the freshest fingerprinted artefact it
//! produced and copies it to a stable, committed path. It also installs a git
//! hook that repeats the publish and stages the result, and can enrich the
//! site's project list with link-preview metadata before a build.
//!
//! # Modules
//!
//! - [`builder`] - Static-site build invocation
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Settings loaded from `site-publisher.toml`
//! - [`error`] - Error types and exit codes
//! - [`exec`] - External command execution
//! - [`git`] - Repository and hooks directory queries
//! - [`hook`] - Hook script generation and installation
//! - [`output`] - User-facing confirmation messages
//! - [`prebuild`] - Project metadata enrichment
//! - [`publisher`] - The build, select and copy pipeline
//! - [`scanner`] - Artefact discovery and freshest-file selection
//! - [`stager`] - Copying the artefact to its published path

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod hook;
pub mod output;
pub mod prebuild;
pub mod publisher;
pub mod scanner;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
