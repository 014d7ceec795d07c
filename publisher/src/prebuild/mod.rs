//! Project metadata prebuild.
//!
//! Enriches the site's project list with link-preview cards before a build.
//! Each project page is fetched once, in order; a page that cannot be fetched
//! is recorded on its card and never aborts the run.

mod card;
mod fetch;
mod meta;
mod projects;

pub use card::{Card, LARGE_IMAGE_CARD, SUMMARY_CARD, build_card};
pub use fetch::{FetchError, HttpFetcher, PageFetcher, USER_AGENT};
pub use meta::{PageMeta, parse_page_meta};
pub use projects::{Project, parse_projects};

use crate::config::PrebuildSettings;
use crate::error::{PublisherError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::fs;

/// Format of `generated_at`: UTC with seconds precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// What a prebuild run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrebuildReport {
    /// The JSON file that was written.
    pub output: Utf8PathBuf,
    /// Number of projects in the file.
    pub projects: usize,
    /// Number of projects whose page could not be fetched.
    pub failures: usize,
}

#[derive(Debug, Serialize)]
struct EnrichedProject {
    #[serde(flatten)]
    project: Project,
    card: Card,
}

#[derive(Debug, Serialize)]
struct Payload {
    generated_at: String,
    projects: Vec<EnrichedProject>,
}

/// Runs the project metadata prebuild for a repository.
pub struct Prebuild<'a> {
    settings: &'a PrebuildSettings,
    root: &'a Utf8Path,
    fetcher: &'a dyn PageFetcher,
}

impl<'a> Prebuild<'a> {
    /// Create a prebuild for the repository at `root`.
    #[must_use]
    pub fn new(settings: &'a PrebuildSettings, root: &'a Utf8Path, fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            settings,
            root,
            fetcher,
        }
    }

    /// Read the projects file, build a card for every project and write the
    /// enriched list stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Prebuild`] if the projects file is missing or
    /// malformed, or the output cannot be written. Fetch failures are not
    /// errors.
    pub fn run(&self, now: DateTime<Utc>) -> Result<PrebuildReport> {
        let projects_path = self.root.join(&self.settings.projects);
        let contents = fs::read_to_string(&projects_path).map_err(|e| PublisherError::Prebuild {
            reason: format!("failed to read {projects_path}: {e}"),
        })?;
        let projects = parse_projects(&contents).map_err(|e| PublisherError::Prebuild {
            reason: format!("failed to parse {projects_path}: {e}"),
        })?;

        let mut failures = 0;
        let enriched: Vec<EnrichedProject> = projects
            .into_iter()
            .map(|mut project| {
                let card = self.card_for(&project);
                if card.error.is_some() {
                    failures += 1;
                }
                project.extra.remove("card");
                EnrichedProject { project, card }
            })
            .collect();

        let payload = Payload {
            generated_at: now.format(TIMESTAMP_FORMAT).to_string(),
            projects: enriched,
        };
        let output = self.root.join(&self.settings.output);
        write_payload(&output, &payload)?;

        Ok(PrebuildReport {
            output,
            projects: payload.projects.len(),
            failures,
        })
    }

    fn card_for(&self, project: &Project) -> Card {
        let Some(url) = project.page_url() else {
            return Card::fallback(project);
        };

        debug!("fetching {url}");
        match self.fetcher.fetch(url) {
            Ok(html) => {
                let meta = parse_page_meta(&html);
                let title_fallback = if meta.title.is_empty() {
                    project.name_or_empty()
                } else {
                    meta.title.as_str()
                };
                build_card(url, &meta, title_fallback, project.description_or_empty())
            }
            Err(e) => {
                warn!("could not fetch metadata for {url}: {e}");
                Card {
                    error: Some(format!("fetch_failed: {e}")),
                    ..Card::fallback(project)
                }
            }
        }
    }
}

fn write_payload(output: &Utf8Path, payload: &Payload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload).map_err(|e| PublisherError::Prebuild {
        reason: format!("failed to serialise projects: {e}"),
    })?;

    if let Some(parent) = output.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PublisherError::Prebuild {
            reason: format!("failed to create {parent}: {e}"),
        })?;
    }
    fs::write(output, json).map_err(|e| PublisherError::Prebuild {
        reason: format!("failed to write {output}: {e}"),
    })
}
