//! Configuration loading for the site publisher.
//!
//! Settings live in an optional `site-publisher.toml` at the repository root.
//! Every table and key falls back to a default matching a Hugo site that
//! fingerprints its stylesheet, so a repository following that layout needs no
//! configuration at all. Paths are relative to the repository root.
//!
//! ```toml
//! [build]
//! command = ["hugo", "--gc", "--minify"]
//!
//! [artefact]
//! output_dir = "public/css"
//! pattern = "style.*.css"
//! destination = "static/css/style.css"
//!
//! [hook]
//! name = "pre-push"
//! publisher = "site-publisher"
//!
//! [prebuild]
//! projects = "data/projects.yaml"
//! output = "data/projects_enriched.json"
//! timeout_secs = 15
//! ```

use crate::error::{PublisherError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the configuration file looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "site-publisher.toml";

/// Top-level settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// How to invoke the static-site build.
    pub build: BuildSettings,
    /// Where to find the build artefact and where to publish it.
    pub artefact: ArtefactSettings,
    /// Lifecycle hook installation.
    pub hook: HookSettings,
    /// Project metadata enrichment.
    pub prebuild: PrebuildSettings,
}

/// Settings for the external build command.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Program and arguments; the first element is the program.
    pub command: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            command: vec!["hugo".to_owned(), "--gc".to_owned(), "--minify".to_owned()],
        }
    }
}

/// Settings describing the artefact to publish.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArtefactSettings {
    /// Directory the build writes the artefact into.
    pub output_dir: Utf8PathBuf,
    /// Filename pattern with a variable token, for example `style.*.css`.
    pub pattern: ArtefactPattern,
    /// Fixed path that receives a copy of the selected artefact.
    pub destination: Utf8PathBuf,
}

impl Default for ArtefactSettings {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from("public/css"),
            pattern: ArtefactPattern::default(),
            destination: Utf8PathBuf::from("static/css/style.css"),
        }
    }
}

/// Settings for the version-control hook.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HookSettings {
    /// Hook file name inside the hooks directory.
    pub name: String,
    /// Shell command the hook uses to invoke this tool.
    pub publisher: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            name: "pre-push".to_owned(),
            publisher: "site-publisher".to_owned(),
        }
    }
}

/// Settings for the project metadata prebuild.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PrebuildSettings {
    /// YAML list of projects.
    pub projects: Utf8PathBuf,
    /// JSON file receiving the enriched projects.
    pub output: Utf8PathBuf,
    /// Per-request timeout when fetching project pages.
    pub timeout_secs: u64,
}

impl PrebuildSettings {
    const fn default_timeout_secs() -> u64 {
        15
    }
}

impl Default for PrebuildSettings {
    fn default() -> Self {
        Self {
            projects: Utf8PathBuf::from("data/projects.yaml"),
            output: Utf8PathBuf::from("data/projects_enriched.json"),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// A validated filename pattern for build artefacts.
///
/// Patterns use glob syntax and are matched against file names only, never
/// against directory components. Matching is case-sensitive and a leading dot
/// must be matched literally.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtefactPattern {
    raw: String,
    compiled: Pattern,
}

impl ArtefactPattern {
    /// The pattern used when none is configured.
    pub const DEFAULT: &'static str = "style.*.css";

    /// Parse a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not valid glob syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_publisher::config::ArtefactPattern;
    ///
    /// let pattern = ArtefactPattern::parse("style.*.css")?;
    /// assert!(pattern.matches("style.3f2a9c.css"));
    /// assert!(!pattern.matches("print.3f2a9c.css"));
    /// # Ok::<(), glob::PatternError>(())
    /// ```
    pub fn parse(raw: &str) -> std::result::Result<Self, glob::PatternError> {
        Ok(Self {
            raw: raw.to_owned(),
            compiled: Pattern::new(raw)?,
        })
    }

    /// Return true when `file_name` matches the pattern.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.compiled.matches_with(
            file_name,
            MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            },
        )
    }

    /// Return the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for ArtefactPattern {
    fn default() -> Self {
        Self {
            raw: Self::DEFAULT.to_owned(),
            compiled: Pattern::new(Self::DEFAULT).unwrap_or_default(),
        }
    }
}

impl TryFrom<String> for ArtefactPattern {
    type Error = glob::PatternError;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ArtefactPattern> for String {
    fn from(pattern: ArtefactPattern) -> Self {
        pattern.raw
    }
}

impl fmt::Display for ArtefactPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Settings {
    /// Load settings for the repository rooted at `root`.
    ///
    /// When `explicit` is given, that file must exist. Otherwise
    /// `site-publisher.toml` in `root` is read if present and defaults apply
    /// when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::ConfigNotFound`] for a missing explicit file
    /// and [`PublisherError::InvalidConfig`] when parsing or validation fails.
    pub fn load(root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let path = explicit.map_or_else(|| root.join(CONFIG_FILE_NAME), Utf8Path::to_path_buf);

        if !path.exists() {
            if explicit.is_some() {
                return Err(PublisherError::ConfigNotFound { path });
            }
            debug!("no configuration at {path}; using defaults");
            let settings = Self::default();
            settings.validate(&path)?;
            return Ok(settings);
        }

        debug!("loading configuration from {path}");
        let contents = std::fs::read_to_string(&path)?;
        Self::parse(&contents, &path)
    }

    /// Parse and validate settings from TOML text.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::InvalidConfig`] when the text is not valid
    /// TOML, contains unknown keys, or fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use site_publisher::config::Settings;
    ///
    /// let settings = Settings::parse(
    ///     "[artefact]\npattern = \"main.*.css\"\n",
    ///     Utf8Path::new("site-publisher.toml"),
    /// )?;
    /// assert_eq!(settings.artefact.pattern.as_str(), "main.*.css");
    /// assert_eq!(settings.hook.name, "pre-push");
    /// # Ok::<(), site_publisher::error::PublisherError>(())
    /// ```
    pub fn parse(contents: &str, path: &Utf8Path) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| PublisherError::InvalidConfig {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Utf8Path) -> Result<()> {
        let invalid = |reason: &str| PublisherError::InvalidConfig {
            path: path.to_owned(),
            reason: reason.to_owned(),
        };

        if self.build.command.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(invalid("build.command must name a program"));
        }
        if self.artefact.destination.file_name().is_none() {
            return Err(invalid("artefact.destination must name a file"));
        }

        let name = self.hook.name.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid("hook.name must be a plain file name"));
        }
        if self.hook.publisher.trim().is_empty() {
            return Err(invalid("hook.publisher must not be empty"));
        }

        Ok(())
    }

    /// Render the effective settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::InvalidConfig`] if serialisation fails.
    pub fn to_toml(&self, path: &Utf8Path) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PublisherError::InvalidConfig {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }
}
