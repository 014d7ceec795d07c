//! External command execution.
//!
//! The build step and git queries both go through [`CommandExecutor`] so that
//! tests can replay scripted outputs instead of spawning processes.

use crate::error::{PublisherError, Result};
use camino::Utf8Path;
use log::trace;
use std::io::{self, Read};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs `cmd` with `args` in `cwd` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned, or
    /// [`PublisherError::TimedOut`] if it exceeds the executor's timeout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use site_publisher::exec::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor::new();
    /// let output = executor.run("hugo", &["version"], Utf8Path::new("."))?;
    /// assert!(output.status.success());
    /// # Ok::<(), site_publisher::error::PublisherError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<Output>;
}

/// Executes commands on the host system, optionally with a timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor {
    timeout: Option<Duration>,
}

impl SystemCommandExecutor {
    /// Create an executor that waits for commands indefinitely.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Create an executor that kills commands running longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<Output> {
        trace!("running {cmd} {args:?} in {cwd}");

        let mut command = Command::new(cmd);
        command.args(args).current_dir(cwd.as_std_path());

        match self.timeout {
            None => command.output().map_err(PublisherError::from),
            Some(timeout) => run_with_timeout(command, cmd, timeout),
        }
    }
}

/// Runs a command, killing it if it does not finish within `timeout`.
///
/// stdout and stderr are drained on reader threads while waiting, so a child
/// that writes more than a pipe buffer is not stalled into a timeout.
fn run_with_timeout(mut command: Command, program: &str, timeout: Duration) -> Result<Output> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn()?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Output {
            status,
            stdout: collect(stdout)?,
            stderr: collect(stderr)?,
        }),
        None => {
            // Best effort: the child may already have exited.
            if child.kill().is_err() {
                trace!("failed to kill timed-out {program}");
            }
            if child.wait().is_err() {
                trace!("failed to reap timed-out {program}");
            }
            Err(PublisherError::TimedOut {
                command: program.to_owned(),
                seconds: timeout.as_secs(),
            })
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>> {
    let Some(reader) = reader else {
        return Ok(Vec::new());
    };
    let bytes = reader
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(bytes)
}
