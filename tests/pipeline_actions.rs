mod common;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use builddag::config::BuildContext;
use builddag::pipeline::standard_graph;
use builddag::proc::mock::MockRunner;

use common::{init_tracing, test_config};

#[test]
fn restore_and_build_receive_the_solution() {
    init_tracing();
    let runner = MockRunner::new();
    let mut config = test_config();
    config.solution = Some(PathBuf::from("PowerUp.sln"));
    let ctx = BuildContext::new(config, Box::new(runner.clone()));

    let mut graph = standard_graph().unwrap();
    graph.run("compile", &ctx).unwrap();

    assert_eq!(
        runner.commands(),
        vec![
            "dotnet restore PowerUp.sln",
            "dotnet build PowerUp.sln -c Debug --no-restore",
        ]
    );
}

#[test]
fn restore_and_build_without_a_solution_let_the_toolchain_choose() {
    init_tracing();
    let runner = MockRunner::new();
    let ctx = BuildContext::new(test_config(), Box::new(runner.clone()));

    let mut graph = standard_graph().unwrap();
    graph.run("compile", &ctx).unwrap();

    assert_eq!(
        runner.commands(),
        vec!["dotnet restore", "dotnet build -c Debug --no-restore"]
    );
}

#[test]
fn pack_receives_the_project_and_output_directory() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("appsettings.json");
    fs::write(&settings_path, r#"{ "AllowedHosts": "*" }"#).unwrap();

    let runner = MockRunner::new();
    runner.on(
        "dotnet --list-runtimes",
        &["Microsoft.NETCore.App 6.0.4 [/usr/share/dotnet/shared/Microsoft.NETCore.App]"],
    );

    let mut config = test_config();
    config.pack_project = Some(PathBuf::from("src/PowerUp.Watcher/PowerUp.Watcher.csproj"));
    config.settings_path = settings_path;
    let ctx = BuildContext::new(config, Box::new(runner.clone()));

    let mut graph = standard_graph().unwrap();
    graph.run("pack", &ctx).unwrap();

    assert_eq!(
        runner.commands().last().map(String::as_str),
        Some(
            "dotnet pack src/PowerUp.Watcher/PowerUp.Watcher.csproj \
             -c Debug --no-build --no-restore -o output"
        )
    );
}

#[test]
fn clean_removes_build_dirs_and_resets_the_output_directory() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    let output = dir.path().join("output");

    // Matching directories, at several depths.
    fs::create_dir_all(source.join("app/bin/Debug")).unwrap();
    fs::write(source.join("app/bin/Debug/app.dll"), b"x").unwrap();
    fs::create_dir_all(source.join("app/obj")).unwrap();
    fs::write(source.join("app/obj/project.assets.json"), b"{}").unwrap();
    fs::create_dir_all(source.join("app/nested/bin")).unwrap();

    // Non-matching siblings that must survive.
    fs::create_dir_all(source.join("binder")).unwrap();
    fs::write(source.join("binder/keep.txt"), b"keep").unwrap();
    fs::write(source.join("app/Program.cs"), b"keep").unwrap();

    // Stale output to be reset.
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("stale.nupkg"), b"old").unwrap();

    let runner = MockRunner::new();
    let mut config = test_config();
    config.source_dir = source.clone();
    config.output_dir = output.clone();
    let ctx = BuildContext::new(config, Box::new(runner.clone()));

    let mut graph = standard_graph().unwrap();
    graph.run("clean", &ctx).unwrap();

    assert!(!source.join("app/bin").exists());
    assert!(!source.join("app/obj").exists());
    assert!(!source.join("app/nested/bin").exists());

    assert!(source.join("binder/keep.txt").exists(), "'binder' is not 'bin'");
    assert!(source.join("app/Program.cs").exists());

    assert!(output.is_dir());
    assert_eq!(
        fs::read_dir(&output).unwrap().count(),
        0,
        "output directory is recreated empty"
    );

    // clean is pure filesystem work; no command runs.
    assert!(runner.commands().is_empty());
}
