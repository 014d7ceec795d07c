//! Lifecycle hook generation and installation.
//!
//! The hook re-runs the publisher whenever git fires it and stages the
//! published file, so the committed copy tracks the latest build. It never
//! commits or pushes anything itself.

use crate::error::{PublisherError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Render the hook script body.
///
/// `publisher` is inserted verbatim as a shell command (it may carry its own
/// arguments, such as `cargo run -q --`). `config` is the configuration file
/// the publisher must read, relative to the repository root or absolute; when
/// it is `None` the publisher falls back to its default lookup. `destination`
/// is the published path relative to the repository root. Both paths are
/// shell-quoted.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use site_publisher::hook::render_hook_script;
///
/// let body = render_hook_script("site-publisher", None, Utf8Path::new("static/css/style.css"));
/// assert!(body.starts_with("#!/usr/bin/env bash\n"));
/// assert!(body.contains("site-publisher publish\n"));
/// assert!(body.contains("git add -- 'static/css/style.css'\n"));
///
/// let body = render_hook_script("site-publisher", Some(Utf8Path::new("ci.toml")), Utf8Path::new("assets/site.css"));
/// assert!(body.contains("site-publisher --config 'ci.toml' publish\n"));
/// ```
#[must_use]
pub fn render_hook_script(publisher: &str, config: Option<&Utf8Path>, destination: &Utf8Path) -> String {
    let config = config.map_or_else(String::new, |path| format!(" --config {}", shell_quote(path.as_str())));
    let destination = shell_quote(destination.as_str());
    format!(
        r#"#!/usr/bin/env bash
# Installed by site-publisher. Manual edits are overwritten on reinstall.
set -euo pipefail

repo_root="$(git rev-parse --show-toplevel)"
cd "$repo_root"

{publisher}{config} publish
git add -- {destination}
"#
    )
}

/// Quote `value` for a POSIX shell using single quotes.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Writes a hook script to a fixed location.
#[derive(Debug, Clone)]
pub struct HookInstaller {
    path: Utf8PathBuf,
    body: String,
}

impl HookInstaller {
    /// Create an installer writing `body` to `path`.
    #[must_use]
    pub fn new(path: Utf8PathBuf, body: String) -> Self {
        Self { path, body }
    }

    /// Return the hook path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the script body that will be written.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Write the hook, replacing any previous content, and make it executable.
    ///
    /// Installing repeatedly leaves the same content and mode as installing
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::WriteFailed`] if the hooks directory cannot be
    /// created, or the script cannot be written or made executable.
    pub fn install(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| self.write_failed(format!("failed to create hooks directory: {e}")))?;
        }

        fs::write(&self.path, &self.body)
            .map_err(|e| self.write_failed(format!("failed to write script: {e}")))?;

        self.make_executable()
    }

    #[cfg(unix)]
    fn make_executable(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        // rwxr-xr-x
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o755))
            .map_err(|e| self.write_failed(format!("failed to set permissions: {e}")))
    }

    #[cfg(not(unix))]
    fn make_executable(&self) -> Result<()> {
        Ok(())
    }

    fn write_failed(&self, reason: String) -> PublisherError {
        PublisherError::WriteFailed {
            path: self.path.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn hooks_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("non-UTF8 path");
        (temp, root)
    }

    #[test]
    fn rendered_script_is_byte_exact() {
        let body = render_hook_script("site-publisher", None, Utf8Path::new("static/css/style.css"));
        let expected = concat!(
            "#!/usr/bin/env bash\n",
            "# Installed by site-publisher. Manual edits are overwritten on reinstall.\n",
            "set -euo pipefail\n",
            "\n",
            "repo_root=\"$(git rev-parse --show-toplevel)\"\n",
            "cd \"$repo_root\"\n",
            "\n",
            "site-publisher publish\n",
            "git add -- 'static/css/style.css'\n",
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn explicit_config_is_passed_to_the_publisher() {
        let body = render_hook_script(
            "cargo run -q --",
            Some(Utf8Path::new("config/it's.toml")),
            Utf8Path::new("assets/site.css"),
        );

        assert!(body.contains("\ncargo run -q -- --config 'config/it'\\''s.toml' publish\n"));
        assert!(body.ends_with("git add -- 'assets/site.css'\n"));
    }

    #[rstest]
    #[case::plain("static/style.css", "'static/style.css'")]
    #[case::spaces("my site/style.css", "'my site/style.css'")]
    #[case::single_quote("it's/style.css", r"'it'\''s/style.css'")]
    fn shell_quote_variants(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(shell_quote(input), expected);
    }

    #[test]
    fn install_creates_hooks_directory() {
        let (_temp, root) = hooks_root();
        let installer = HookInstaller::new(root.join(".git/hooks/pre-push"), "#!/bin/sh\n".to_owned());

        installer.install().expect("install should succeed");

        assert_eq!(fs::read_to_string(installer.path()).expect("read"), "#!/bin/sh\n");
    }

    #[test]
    fn install_truncates_previous_content() {
        let (_temp, root) = hooks_root();
        let path = root.join("pre-push");
        fs::write(&path, "#!/bin/sh\necho a much longer previous hook body\n").expect("seed");

        HookInstaller::new(path.clone(), "#!/bin/sh\n".to_owned())
            .install()
            .expect("install should succeed");

        assert_eq!(fs::read_to_string(&path).expect("read"), "#!/bin/sh\n");
    }

    #[cfg(unix)]
    #[test]
    fn install_marks_script_executable_even_if_previously_not() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, root) = hooks_root();
        let path = root.join("pre-push");
        fs::write(&path, "old").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");

        HookInstaller::new(path.clone(), "new".to_owned())
            .install()
            .expect("install should succeed");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn install_into_a_file_path_fails_with_write_failed() {
        let (_temp, root) = hooks_root();
        let blocker = root.join("hooks");
        fs::write(&blocker, "not a directory").expect("seed");

        let err = HookInstaller::new(blocker.join("pre-push"), "body".to_owned())
            .install()
            .expect_err("install should fail");

        assert!(matches!(err, PublisherError::WriteFailed { .. }));
    }
}
