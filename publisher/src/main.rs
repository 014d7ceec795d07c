//! Site publisher CLI entrypoint.
//!
//! Builds the site and publishes its latest artefact by default. The other
//! subcommands install the git hook, run the project metadata prebuild and
//! print the effective configuration.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use log::{LevelFilter, debug};
use site_publisher::cli::{Cli, Command, InstallHookArgs, PublishArgs};
use site_publisher::config::Settings;
use site_publisher::error::{PublisherError, Result};
use site_publisher::exec::SystemCommandExecutor;
use site_publisher::git::{GIT_TIMEOUT, hook_path, repository_root};
use site_publisher::hook::{HookInstaller, render_hook_script};
use site_publisher::output::{hook_message, prebuild_message, publish_message, write_stderr_line};
use site_publisher::prebuild::{HttpFetcher, Prebuild};
use site_publisher::publisher::Publisher;
use std::io::Write;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Initialise `env_logger`. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for_verbosity(verbosity))
        .format_timestamp(None)
        .parse_default_env();
    if let Err(err) = builder.try_init() {
        debug!("keeping the installed logger: {err}");
    }
}

fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let root = resolve_root(cli.root.as_deref())?;
    debug!("working root: {root}");

    match cli.effective_command() {
        Command::Publish(args) => run_publish(cli, &root, &args, stderr),
        Command::InstallHook(args) => run_install_hook(cli, &root, &args, stdout, stderr),
        Command::Prebuild => run_prebuild(cli, &root, stderr),
        Command::ShowConfig => run_show_config(cli, &root, stdout),
    }
}

fn run_publish(cli: &Cli, root: &Utf8Path, args: &PublishArgs, stderr: &mut dyn Write) -> Result<()> {
    let settings = Settings::load(root, cli.config.as_deref())?;
    let executor = SystemCommandExecutor::new();
    let publisher = Publisher::new(&settings, root, &executor);

    let report = if args.skip_build {
        publisher.promote()?
    } else {
        publisher.publish()?
    };

    if !cli.quiet {
        write_stderr_line(stderr, publish_message(&report));
    }
    Ok(())
}

/// Installs the hook into the repository containing `root`. Settings are read
/// from the repository root, and an explicit configuration file is passed on
/// to the hook, so the hook stages the path the publisher writes.
fn run_install_hook(
    cli: &Cli,
    root: &Utf8Path,
    args: &InstallHookArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let git = SystemCommandExecutor::with_timeout(GIT_TIMEOUT);
    let repo_root = repository_root(&git, root)?;
    let settings = Settings::load(&repo_root, cli.config.as_deref())?;
    let config = match cli.config.as_deref() {
        Some(path) => Some(hook_config_path(path, &resolve_root(None)?, &repo_root)),
        None => None,
    };

    let body = render_hook_script(
        &settings.hook.publisher,
        config.as_deref(),
        &settings.artefact.destination,
    );
    if args.print {
        return stdout
            .write_all(body.as_bytes())
            .map_err(|source| PublisherError::OutputFailed { source });
    }

    let installer = HookInstaller::new(hook_path(&git, &repo_root, &settings.hook.name)?, body);
    installer.install()?;

    if !cli.quiet {
        write_stderr_line(stderr, hook_message(&settings.hook.name, installer.path()));
    }
    Ok(())
}

/// Resolve an explicit configuration path for the hook, which runs from the
/// repository root. Paths inside the repository become repo-relative so the
/// hook survives the checkout moving; others stay absolute.
fn hook_config_path(config: &Utf8Path, cwd: &Utf8Path, repo_root: &Utf8Path) -> Utf8PathBuf {
    let absolute = if config.is_absolute() {
        config.to_owned()
    } else {
        cwd.join(config)
    };
    if let Ok(relative) = absolute.strip_prefix(repo_root) {
        return relative.to_owned();
    }
    absolute
}

fn run_prebuild(cli: &Cli, root: &Utf8Path, stderr: &mut dyn Write) -> Result<()> {
    let settings = Settings::load(root, cli.config.as_deref())?;
    let fetcher = HttpFetcher::new(Duration::from_secs(settings.prebuild.timeout_secs));

    let report = Prebuild::new(&settings.prebuild, root, &fetcher).run(Utc::now())?;

    if !cli.quiet {
        write_stderr_line(stderr, prebuild_message(&report));
    }
    Ok(())
}

fn run_show_config(cli: &Cli, root: &Utf8Path, stdout: &mut dyn Write) -> Result<()> {
    let settings = Settings::load(root, cli.config.as_deref())?;
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(site_publisher::config::CONFIG_FILE_NAME));
    let rendered = settings.to_toml(&path)?;
    stdout
        .write_all(rendered.as_bytes())
        .map_err(|source| PublisherError::OutputFailed { source })
}

fn resolve_root(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_owned());
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| PublisherError::Io(e.into_io_error()))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            err.exit_code()
        }
    }
}
