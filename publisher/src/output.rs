//! Output formatting for the publisher CLI.
//!
//! Confirmations go to stderr so stdout stays free for commands that print
//! data (`show-config`, `install-hook --print`).

use crate::prebuild::PrebuildReport;
use crate::publisher::PublishReport;
use camino::Utf8Path;
use std::io::Write;

/// Format the confirmation printed after a publish.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use site_publisher::output::publish_message;
/// use site_publisher::publisher::PublishReport;
///
/// let report = PublishReport {
///     source: Utf8PathBuf::from("public/css/style.def456.css"),
///     destination: Utf8PathBuf::from("static/css/style.css"),
///     bytes: 2048,
/// };
/// assert_eq!(
///     publish_message(&report),
///     "Published public/css/style.def456.css -> static/css/style.css (2048 bytes)"
/// );
/// ```
#[must_use]
pub fn publish_message(report: &PublishReport) -> String {
    let unit = if report.bytes == 1 { "byte" } else { "bytes" };
    format!(
        "Published {} -> {} ({} {unit})",
        report.source, report.destination, report.bytes
    )
}

/// Format the confirmation printed after installing the hook.
#[must_use]
pub fn hook_message(name: &str, path: &Utf8Path) -> String {
    format!("Installed {name} hook at {path}")
}

/// Format the confirmation printed after the project metadata prebuild.
#[must_use]
pub fn prebuild_message(report: &PrebuildReport) -> String {
    let plural = if report.projects == 1 { "project" } else { "projects" };
    let mut message = format!("Wrote {} ({} {plural})", report.output, report.projects);
    if report.failures > 0 {
        message.push_str(&format!(", {} fetch failure(s) recorded", report.failures));
    }
    message
}

/// Write a line to stderr, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn publish_message_uses_singular_for_one_byte() {
        let report = PublishReport {
            source: Utf8PathBuf::from("a.css"),
            destination: Utf8PathBuf::from("b.css"),
            bytes: 1,
        };
        assert!(publish_message(&report).ends_with("(1 byte)"));
    }

    #[test]
    fn hook_message_names_hook_and_path() {
        let msg = hook_message("pre-push", Utf8Path::new("/repo/.git/hooks/pre-push"));
        assert_eq!(msg, "Installed pre-push hook at /repo/.git/hooks/pre-push");
    }

    #[test]
    fn prebuild_message_mentions_failures_only_when_present() {
        let mut report = PrebuildReport {
            output: Utf8PathBuf::from("data/projects_enriched.json"),
            projects: 3,
            failures: 0,
        };
        assert_eq!(
            prebuild_message(&report),
            "Wrote data/projects_enriched.json (3 projects)"
        );

        report.failures = 1;
        assert!(prebuild_message(&report).contains("1 fetch failure(s)"));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
