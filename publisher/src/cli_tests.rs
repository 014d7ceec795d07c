//! Tests for publisher CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

fn parse(args: &[&str]) -> Cli {
    temp_env::with_var_unset(CONFIG_ENV, || Cli::parse_from(args))
}

#[test]
fn cli_parses_defaults() {
    let cli = parse(&["site-publisher"]);
    assert!(cli.command.is_none());
    assert!(cli.config.is_none());
    assert!(cli.root.is_none());
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn no_subcommand_means_publish() {
    let cli = parse(&["site-publisher"]);
    assert_eq!(
        cli.effective_command(),
        Command::Publish(PublishArgs { skip_build: false })
    );
}

#[rstest]
#[case::publish(&["site-publisher", "publish"], Command::Publish(PublishArgs::default()))]
#[case::skip_build(
    &["site-publisher", "publish", "--skip-build"],
    Command::Publish(PublishArgs { skip_build: true })
)]
#[case::install_hook(
    &["site-publisher", "install-hook"],
    Command::InstallHook(InstallHookArgs::default())
)]
#[case::install_hook_print(
    &["site-publisher", "install-hook", "--print"],
    Command::InstallHook(InstallHookArgs { print: true })
)]
#[case::prebuild(&["site-publisher", "prebuild"], Command::Prebuild)]
#[case::show_config(&["site-publisher", "show-config"], Command::ShowConfig)]
fn cli_parses_subcommands(#[case] args: &[&str], #[case] expected: Command) {
    assert_eq!(parse(args).effective_command(), expected);
}

#[test]
fn global_flags_are_accepted_after_subcommand() {
    let cli = parse(&[
        "site-publisher",
        "publish",
        "-C",
        "/srv/site",
        "--config",
        "ci.toml",
        "-vv",
    ]);
    assert_eq!(cli.root, Some(Utf8PathBuf::from("/srv/site")));
    assert_eq!(cli.config, Some(Utf8PathBuf::from("ci.toml")));
    assert_eq!(cli.verbosity, 2);
}

#[test]
fn config_can_come_from_environment() {
    let cli = temp_env::with_var(CONFIG_ENV, Some("from-env.toml"), || {
        Cli::parse_from(["site-publisher"])
    });
    assert_eq!(cli.config, Some(Utf8PathBuf::from("from-env.toml")));
}

#[test]
fn flag_overrides_environment() {
    let cli = temp_env::with_var(CONFIG_ENV, Some("from-env.toml"), || {
        Cli::parse_from(["site-publisher", "--config", "flag.toml"])
    });
    assert_eq!(cli.config, Some(Utf8PathBuf::from("flag.toml")));
}

#[test]
fn verbose_conflicts_with_quiet() {
    let result = temp_env::with_var_unset(CONFIG_ENV, || {
        Cli::try_parse_from(["site-publisher", "-v", "-q"])
    });
    assert!(result.is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    let result = temp_env::with_var_unset(CONFIG_ENV, || {
        Cli::try_parse_from(["site-publisher", "deploy"])
    });
    assert!(result.is_err());
}
