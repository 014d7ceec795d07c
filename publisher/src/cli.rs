//! CLI argument definitions for the site publisher.
//!
//! Kept apart from the binary so parsing can be tested without running
//! anything.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "SITE_PUBLISHER_CONFIG";

/// Build a static site and publish its latest artefact to a stable path.
#[derive(Parser, Debug)]
#[command(name = "site-publisher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build a static site and publish its latest artefact to a stable path.\n\n",
    "Static-site generators fingerprint assets (style.3f9a1c.css), so the file name ",
    "changes on every build. site-publisher runs the build, picks the most recently ",
    "modified file matching the configured pattern and copies it to a fixed path ",
    "that templates and other tools can reference.\n\n",
    "Settings are read from site-publisher.toml in the repository root when present.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build and publish the stylesheet:\n",
    "    $ site-publisher\n\n",
    "  Publish the latest existing artefact without rebuilding:\n",
    "    $ site-publisher publish --skip-build\n\n",
    "  Install the pre-push hook:\n",
    "    $ site-publisher install-hook\n\n",
    "  Refresh project link previews:\n",
    "    $ site-publisher prebuild\n",
))]
pub struct Cli {
    /// Subcommand to execute (defaults to `publish`).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file [default: site-publisher.toml in the repository root].
    #[arg(long, global = true, value_name = "PATH", env = CONFIG_ENV)]
    pub config: Option<Utf8PathBuf>,

    /// Repository root [default: current directory].
    #[arg(short = 'C', long = "root", global = true, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress confirmation messages (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build the site and publish the latest artefact (default).
    Publish(PublishArgs),

    /// Install the git hook that publishes and stages the artefact.
    InstallHook(InstallHookArgs),

    /// Enrich the project list with link-preview metadata.
    Prebuild,

    /// Print the effective configuration as TOML.
    ShowConfig,
}

/// Arguments for the publish command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishArgs {
    /// Publish the latest existing artefact without running the build.
    #[arg(long)]
    pub skip_build: bool,
}

/// Arguments for the install-hook command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallHookArgs {
    /// Print the hook script instead of installing it.
    #[arg(long)]
    pub print: bool,
}

impl Cli {
    /// Return the command to run, treating no subcommand as `publish`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use site_publisher::cli::{Cli, Command, PublishArgs};
    ///
    /// let cli = Cli::parse_from(["site-publisher"]);
    /// assert_eq!(cli.effective_command(), Command::Publish(PublishArgs::default()));
    /// ```
    #[must_use]
    pub fn effective_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Publish(PublishArgs::default()))
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
