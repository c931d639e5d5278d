mod common;

use std::path::Path;

use builddag::errors::BuildError;
use builddag::gitsync::BranchSync;
use builddag::proc::mock::MockRunner;

use common::init_tracing;

const SETTINGS: &str = "appsettings.json";

fn sync_with(runner: &MockRunner) -> Result<(), BuildError> {
    BranchSync::new(runner, "main", Path::new(SETTINGS)).sync()
}

#[test]
fn on_mainline_issues_exactly_one_pull() {
    init_tracing();
    let runner = MockRunner::new();
    runner.on("git branch --show-current", &["main"]);

    sync_with(&runner).unwrap();

    assert_eq!(
        runner.commands(),
        vec!["git branch --show-current", "git pull"]
    );
}

#[test]
fn feature_branch_runs_the_full_sequence_in_order() {
    init_tracing();
    let runner = MockRunner::new();
    runner.on("git branch --show-current", &["feature/probe"]);
    runner.on("git remote", &["origin"]);

    sync_with(&runner).unwrap();

    assert_eq!(
        runner.commands(),
        vec![
            "git branch --show-current",
            "git checkout appsettings.json",
            "git checkout main",
            "git remote",
            "git pull",
            "git checkout feature/probe",
            "git merge main",
        ]
    );
}

#[test]
fn fork_pulls_from_the_upstream_remote() {
    init_tracing();
    let runner = MockRunner::new();
    runner.on("git branch --show-current", &["feature/probe"]);
    runner.on("git remote", &["origin", "upstream"]);

    sync_with(&runner).unwrap();

    assert!(runner
        .commands()
        .contains(&"git pull --set-upstream upstream main".to_string()));
    assert!(!runner.commands().iter().any(|c| c == "git pull"));
}

#[test]
fn command_failure_aborts_the_remaining_sequence() {
    init_tracing();
    let runner = MockRunner::new();
    runner.on("git branch --show-current", &["feature/probe"]);
    runner.fail("git checkout main", 1);

    let err = sync_with(&runner).unwrap_err();
    match err {
        BuildError::CommandFailed { command, code } => {
            assert_eq!(command, "git checkout main");
            assert_eq!(code, 1);
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }

    // Nothing after the failing checkout ran: no pull, no merge, and the
    // branch pointer was never switched back.
    assert_eq!(
        runner.commands(),
        vec![
            "git branch --show-current",
            "git checkout appsettings.json",
            "git checkout main",
        ]
    );
}

#[test]
fn detached_head_is_a_configuration_error() {
    init_tracing();
    let runner = MockRunner::new();
    // `git branch --show-current` prints nothing on a detached HEAD; the
    // unscripted mock default is empty output.

    match sync_with(&runner).unwrap_err() {
        BuildError::ConfigError(msg) => assert!(msg.contains("branch"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}
