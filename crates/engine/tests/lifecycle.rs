//! Integration tests for the install/dispatch lifecycle
//!
//! These tests drive a real `git` executable, isolated from the developer's
//! configuration, and run real subordinate scripts.

#![allow(clippy::unwrap_used, clippy::panic)]

use githooks_config::GitCli;
use githooks_config::GitProvider;
use githooks_core::{Error, Trigger};
use githooks_engine::hooks::synthesize;
use githooks_engine::install::{self, HooksDir, InstallAction, open_repository};
use githooks_engine::{Dispatcher, HookResolver, InstallState, ProcessRunner, template};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Git isolated from the developer's configuration
fn isolated_git(temp: &TempDir) -> GitCli {
    GitCli::new()
        .unwrap()
        .with_env("GIT_CONFIG_GLOBAL", temp.path().join("gitconfig"))
        .with_env("GIT_CONFIG_NOSYSTEM", "1")
        .with_env("GIT_CEILING_DIRECTORIES", temp.path())
        .with_env("GIT_AUTHOR_NAME", "Test")
        .with_env("GIT_AUTHOR_EMAIL", "test@example.com")
        .with_env("GIT_COMMITTER_NAME", "Test")
        .with_env("GIT_COMMITTER_EMAIL", "test@example.com")
}

fn init_repo(git: &GitCli, temp: &TempDir) -> PathBuf {
    let dir = temp.path().join("repo");
    git.init(&dir).unwrap();
    fs::canonicalize(dir).unwrap()
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn trigger(name: &str) -> &'static Trigger {
    Trigger::lookup(name).unwrap()
}

#[test]
fn test_install_then_list_then_uninstall() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);

    assert_eq!(install::list(&git, &root).unwrap(), InstallState::NotInstalled);

    let repo = open_repository(&git, &root).unwrap();
    let hooks = HooksDir::of(&repo);
    let report = install::install(&hooks, false).unwrap();
    assert!(report.is_success());

    match install::list(&git, &root).unwrap() {
        InstallState::Installed(statuses) => {
            assert_eq!(statuses.len(), Trigger::all().len());
            assert!(statuses.iter().all(|s| s.entry.is_managed()));
        }
        other => panic!("expected installed, got {other:?}"),
    }

    install::uninstall(&hooks).unwrap();
    assert_eq!(install::list(&git, &root).unwrap(), InstallState::NotInstalled);
}

#[test]
fn test_list_outside_repository() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let plain = temp.path().join("plain");
    fs::create_dir_all(&plain).unwrap();

    assert_eq!(install::list(&git, &plain).unwrap(), InstallState::NotARepository);
    assert!(matches!(
        open_repository(&git, &plain),
        Err(Error::NotARepository { .. })
    ));
}

#[test]
fn test_reinstall_conflict_leaves_hooks_byte_identical() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let hooks = HooksDir::of(&open_repository(&git, &root).unwrap());

    install::install(&hooks, false).unwrap();
    let before: Vec<Vec<u8>> = Trigger::all()
        .iter()
        .map(|t| fs::read(hooks.hook_path(t)).unwrap())
        .collect();

    assert!(matches!(
        install::install(&hooks, false),
        Err(Error::ExistingHooksConflict { .. })
    ));

    let after: Vec<Vec<u8>> = Trigger::all()
        .iter()
        .map(|t| fs::read(hooks.hook_path(t)).unwrap())
        .collect();
    assert_eq!(before, after);

    let forced = install::install(&hooks, true).unwrap();
    assert_eq!(forced.count(InstallAction::Reinstalled), Trigger::all().len());
}

#[test]
fn test_git_sample_hooks_are_not_touched() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let hooks = HooksDir::of(&open_repository(&git, &root).unwrap());
    let samples: Vec<_> = fs::read_dir(hooks.path())
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name())
                .filter(|n| n.to_string_lossy().ends_with(".sample"))
                .collect()
        })
        .unwrap_or_default();

    install::install(&hooks, false).unwrap();
    install::uninstall(&hooks).unwrap();

    for sample in samples {
        assert!(hooks.path().join(sample).exists());
    }
}

#[test]
#[cfg(unix)]
fn test_gate_trigger_aborts_on_failure() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let marker = temp.path().join("ran-second");

    write_script(&root.join(".githooks/pre-commit/10-fail"), "exit 3");
    write_script(
        &root.join(".githooks/pre-commit/20-never"),
        &format!("touch '{}'", marker.display()),
    );

    let resolver = HookResolver::new(&root, temp.path().join("home"));
    let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&root));
    let outcome = dispatcher.dispatch(trigger("pre-commit"), &[], None).unwrap();

    assert_eq!(outcome.status, 3);
    assert!(outcome.aborted);
    assert!(!marker.exists());
}

#[test]
#[cfg(unix)]
fn test_advisory_trigger_runs_everything() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let marker = temp.path().join("ran-second");

    write_script(&root.join(".githooks/post-commit/10-fail"), "exit 1");
    write_script(
        &root.join(".githooks/post-commit/20-runs"),
        &format!("touch '{}'", marker.display()),
    );

    let resolver = HookResolver::new(&root, temp.path().join("home"));
    let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&root));
    let outcome = dispatcher.dispatch(trigger("post-commit"), &[], None).unwrap();

    assert_eq!(outcome.status, 0);
    assert_eq!(outcome.executed, 2);
    assert!(marker.exists());
}

#[test]
#[cfg(unix)]
fn test_stdin_reaches_every_script_in_every_scope() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let home = temp.path().join("home");
    let out = temp.path().join("out");

    let record = format!("cat >> '{}'", out.display());
    write_script(&root.join(".githooks/pre-push/project"), &record);
    write_script(&home.join("pre-push/global"), &record);

    let resolver = HookResolver::new(&root, &home);
    let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&root));
    let input = b"refs/heads/main 1111 refs/heads/main 2222\n";
    let args = [OsString::from("origin"), OsString::from("/tmp/remote.git")];

    let outcome = dispatcher
        .dispatch(trigger("pre-push"), &args, Some(input))
        .unwrap();

    assert_eq!(outcome.status, 0);
    let recorded = fs::read(&out).unwrap();
    assert_eq!(recorded, [&input[..], &input[..]].concat());
}

#[test]
#[cfg(unix)]
fn test_scripts_run_from_repository_root() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let out = temp.path().join("cwd");

    write_script(
        &root.join(".githooks/post-checkout/pwd"),
        &format!("pwd -P > '{}'", out.display()),
    );

    let resolver = HookResolver::new(&root, temp.path().join("home"));
    let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&root));
    let args = ["0000", "1111", "1"].map(OsString::from);
    dispatcher
        .dispatch(trigger("post-checkout"), &args, None)
        .unwrap();

    let cwd = fs::read_to_string(&out).unwrap();
    assert_eq!(Path::new(cwd.trim()), root.as_path());
}

#[test]
#[cfg(unix)]
fn test_displaced_hook_keeps_running() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let root = init_repo(&git, &temp);
    let repo = open_repository(&git, &root).unwrap();
    let hooks = HooksDir::of(&repo);
    let out = temp.path().join("legacy");

    write_script(
        &hooks.hook_path(trigger("commit-msg")),
        &format!("echo \"$1\" > '{}'", out.display()),
    );
    let report = install::install(&hooks, false).unwrap();
    assert_eq!(report.count(InstallAction::BackedUp), 1);

    let resolver = HookResolver::new(&root, temp.path().join("home")).with_legacy_hooks(&repo.hooks_dir);
    let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&root));
    dispatcher
        .dispatch(trigger("commit-msg"), &[OsString::from("MSG")], None)
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "MSG\n");
}

#[test]
fn test_global_template_reaches_new_repositories() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let template_dir = temp.path().join("template");

    let report = template::install_global(&git, &template_dir).unwrap();
    assert!(report.install.is_success());

    let root = init_repo(&git, &temp);
    match install::list(&git, &root).unwrap() {
        InstallState::Installed(statuses) => {
            assert!(statuses.iter().all(|s| s.entry.is_managed()));
        }
        other => panic!("expected installed, got {other:?}"),
    }

    let hook = fs::read_to_string(root.join(".git/hooks/pre-commit")).unwrap();
    assert_eq!(hook, synthesize(trigger("pre-commit")));
}

#[test]
fn test_uninstall_global_round_trip() {
    let temp = TempDir::new().unwrap();
    let git = isolated_git(&temp);
    let template_dir = temp.path().join("template");

    assert!(matches!(
        template::uninstall_global(&git),
        Err(Error::NotExistHooks)
    ));

    template::install_global(&git, &template_dir).unwrap();
    let report = template::uninstall_global(&git).unwrap();

    assert!(report.removed_dir);
    assert_eq!(
        git.global_config_get(githooks_config::git::TEMPLATE_DIR_KEY)
            .unwrap(),
        None
    );
    assert!(matches!(
        template::uninstall_global(&git),
        Err(Error::NotExistHooks)
    ));
}
