//! Git queries needed to install the lifecycle hook.
//!
//! Only read-only `git rev-parse` queries are issued here; staging the
//! published file is left to the installed hook itself. Queries should run
//! through an executor with [`GIT_TIMEOUT`] so a wedged git never hangs the
//! installer.

use crate::error::{PublisherError, Result};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::time::Duration;

/// Timeout for git queries.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Return the top-level directory of the working tree containing `cwd`.
///
/// # Errors
///
/// Returns [`PublisherError::Git`] if `cwd` is not inside a git working tree
/// or git cannot be run.
pub fn repository_root(executor: &dyn CommandExecutor, cwd: &Utf8Path) -> Result<Utf8PathBuf> {
    let root = rev_parse(executor, &["--show-toplevel"], cwd, "rev-parse --show-toplevel")?;
    debug!("repository root: {root}");
    Ok(Utf8PathBuf::from(root))
}

/// Return the hooks directory for the repository containing `cwd`.
///
/// Honours `core.hooksPath` and linked worktrees because git resolves the
/// path itself. Relative answers are anchored at `cwd`.
///
/// # Errors
///
/// Returns [`PublisherError::Git`] if the query fails.
pub fn hooks_dir(executor: &dyn CommandExecutor, cwd: &Utf8Path) -> Result<Utf8PathBuf> {
    let reported = rev_parse(executor, &["--git-path", "hooks"], cwd, "rev-parse --git-path")?;
    Ok(anchor(cwd, &reported))
}

/// Return the path of the named hook.
///
/// # Errors
///
/// Returns [`PublisherError::Git`] if the hooks directory cannot be resolved.
pub fn hook_path(executor: &dyn CommandExecutor, cwd: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
    Ok(hooks_dir(executor, cwd)?.join(name))
}

fn anchor(cwd: &Utf8Path, reported: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(reported);
    if path.is_absolute() {
        path.to_owned()
    } else {
        cwd.join(path)
    }
}

fn rev_parse(
    executor: &dyn CommandExecutor,
    args: &[&str],
    cwd: &Utf8Path,
    operation: &'static str,
) -> Result<String> {
    let mut full_args = vec!["rev-parse"];
    full_args.extend_from_slice(args);

    let output = executor
        .run("git", &full_args, cwd)
        .map_err(|e| match e {
            PublisherError::Io(io) => PublisherError::Git {
                operation,
                message: format!("failed to run git: {io}"),
            },
            other => other,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PublisherError::Git {
            operation,
            message: stderr.trim().to_owned(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if stdout.is_empty() {
        return Err(PublisherError::Git {
            operation,
            message: "git returned an empty path".to_owned(),
        });
    }
    Ok(stdout)
}
