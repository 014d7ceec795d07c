//! Behaviour-driven tests for hook installation.
//!
//! These scenarios cover the installed script's content and mode, idempotent
//! reinstallation, resolving the hooks directory through git, and running the
//! installed hook against a real repository.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use site_publisher::config::Settings;
use site_publisher::exec::{CommandExecutor, SystemCommandExecutor};
use site_publisher::git::{GIT_TIMEOUT, hook_path, repository_root};
use site_publisher::hook::{HookInstaller, render_hook_script};
use std::fs;
use support::temp_root;
use tempfile::TempDir;

mod support;

struct HookWorld {
    _temp: TempDir,
    root: Utf8PathBuf,
    settings: Settings,
    hook: Option<Utf8PathBuf>,
    hook_succeeded: Option<bool>,
    skip_assertions: bool,
}

#[fixture]
fn world() -> HookWorld {
    let (temp, root) = temp_root();
    HookWorld {
        _temp: temp,
        root,
        settings: Settings::default(),
        hook: None,
        hook_succeeded: None,
        skip_assertions: false,
    }
}

impl HookWorld {
    fn default_hook_path(&self) -> Utf8PathBuf {
        self.root.join("hooks").join(&self.settings.hook.name)
    }

    fn rendered(&self) -> String {
        render_hook_script(&self.settings.hook.publisher, None, &self.settings.artefact.destination)
    }

    fn install_at(&mut self, path: Utf8PathBuf) {
        HookInstaller::new(path.clone(), self.rendered())
            .install()
            .expect("install should succeed");
        self.hook = Some(path);
    }

    fn git(&self, args: &[&str]) -> std::process::Output {
        SystemCommandExecutor::with_timeout(GIT_TIMEOUT)
            .run("git", args, &self.root)
            .expect("git should run")
    }

    fn script(&self) -> String {
        let hook = self.hook.as_deref().expect("hook has not been installed");
        fs::read_to_string(hook).expect("read hook")
    }
}

#[given("an empty hooks directory")]
fn given_empty_hooks_dir(world: &mut HookWorld) {
    fs::create_dir_all(world.root.join("hooks")).expect("create hooks dir");
}

#[given("a hooks directory with an existing pre-push hook")]
fn given_existing_hook(world: &mut HookWorld) {
    given_empty_hooks_dir(world);
    fs::write(
        world.default_hook_path(),
        "#!/bin/sh\n# hand-written hook that runs a long, unrelated check\nmake lint\n",
    )
    .expect("write existing hook");
}

#[given("a git repository")]
fn given_git_repository(world: &mut HookWorld) {
    let git = SystemCommandExecutor::with_timeout(GIT_TIMEOUT);
    let initialised = git
        .run("git", &["init", "-q"], &world.root)
        .is_ok_and(|output| output.status.success());
    if !initialised {
        world.skip_assertions = true;
        rstest_bdd::skip!("git is not available; skipping repository scenario");
    }
}

#[given("a publisher that writes the published file")]
fn given_stub_publisher(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let has_bash = SystemCommandExecutor::with_timeout(GIT_TIMEOUT)
        .run("bash", &["-c", "true"], &world.root)
        .is_ok_and(|output| output.status.success());
    if !has_bash {
        world.skip_assertions = true;
        rstest_bdd::skip!("bash is not available; skipping hook execution scenario");
    }

    let stub = world.root.join("fake-publisher");
    let destination = &world.settings.artefact.destination;
    let parent = destination.parent().map_or("", Utf8Path::as_str);
    fs::write(
        &stub,
        format!("#!/bin/sh\nmkdir -p '{parent}'\nprintf 'body{{}}' > '{destination}'\n"),
    )
    .expect("write stub publisher");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).expect("chmod stub");
    }
    world.settings.hook.publisher = stub.into_string();
}

#[when("the hook is installed")]
fn when_installed(world: &mut HookWorld) {
    let path = world.default_hook_path();
    world.install_at(path);
}

#[when("the hook is installed through git")]
fn when_installed_through_git(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let git = SystemCommandExecutor::with_timeout(GIT_TIMEOUT);
    let repo_root = repository_root(&git, &world.root).expect("repository root");
    let path = hook_path(&git, &repo_root, &world.settings.hook.name).expect("hook path");
    world.install_at(path);
}

#[when("the hook runs from a subdirectory")]
fn when_hook_runs(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let subdir = world.root.join("content/posts");
    fs::create_dir_all(&subdir).expect("create subdirectory");
    let hook = world.hook.as_deref().expect("hook has not been installed");

    let output = SystemCommandExecutor::with_timeout(GIT_TIMEOUT)
        .run(hook.as_str(), &[], &subdir)
        .expect("hook should start");
    world.hook_succeeded = Some(output.status.success());
}

#[then("the hook succeeds")]
fn then_hook_succeeds(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    assert_eq!(world.hook_succeeded, Some(true));
}

#[then("the published file is staged")]
fn then_published_file_staged(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let output = world.git(&["diff", "--cached", "--name-only"]);
    let staged = String::from_utf8_lossy(&output.stdout);
    let destination = world.settings.artefact.destination.as_str();
    assert!(
        staged.lines().any(|line| line == destination),
        "staged files: {staged}"
    );
}

#[then("no commit is created")]
fn then_no_commit(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let output = world.git(&["rev-parse", "--verify", "-q", "HEAD"]);
    assert!(!output.status.success(), "HEAD exists after running the hook");
}

#[then("the hook script runs the publisher")]
fn then_runs_publisher(world: &mut HookWorld) {
    let script = world.script();
    assert!(script.starts_with("#!/usr/bin/env bash\n"));
    assert!(script.contains("\nsite-publisher publish\n"));
}

#[then("the hook script stages {destination}")]
fn then_stages(world: &mut HookWorld, destination: String) {
    assert!(
        world.script().contains(&format!("git add -- '{destination}'\n")),
        "hook does not stage {destination}"
    );
}

#[then("the hook script matches a single installation")]
fn then_matches_single_install(world: &mut HookWorld) {
    assert_eq!(world.script(), world.rendered());
}

#[then("the hook script is inside the git directory")]
fn then_inside_git_dir(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    let hook = world.hook.as_deref().expect("hook has not been installed");
    assert!(
        hook.ends_with(Utf8Path::new(".git/hooks/pre-push")),
        "unexpected hook path {hook}"
    );
}

#[then("the hook script is executable")]
fn then_executable(world: &mut HookWorld) {
    if world.skip_assertions {
        return;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let hook = world.hook.as_deref().expect("hook has not been installed");
        let mode = fs::metadata(hook).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[scenario(
    path = "tests/features/hook.feature",
    name = "Installing writes an executable hook script"
)]
fn scenario_install(world: HookWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/hook.feature",
    name = "Installing twice leaves the same hook"
)]
fn scenario_install_twice(world: HookWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/hook.feature",
    name = "An existing hook is replaced"
)]
fn scenario_replace_existing(world: HookWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/hook.feature",
    name = "The hook lands in the repository's hooks directory"
)]
fn scenario_git_hooks_dir(world: HookWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/hook.feature",
    name = "Running the hook stages the published file"
)]
fn scenario_hook_stages_file(world: HookWorld) {
    let _ = world;
}
