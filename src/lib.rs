// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod gitsync;
pub mod graph;
pub mod logging;
pub mod pipeline;
pub mod probe;
pub mod proc;
pub mod settings;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::{BuildConfig, BuildContext};
use crate::errors::Result;
use crate::graph::TargetGraph;
use crate::proc::CommandRunner;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - configuration resolution (once, before the graph exists)
/// - the standard target graph
/// - the real process runner
pub fn run(args: CliArgs) -> Result<()> {
    let config = BuildConfig::resolve(&args)?;
    info!(
        target = %args.target,
        configuration = %config.configuration,
        "starting build"
    );

    let runner = CommandRunner::in_dir(&config.root_dir);
    let ctx = BuildContext::new(config, Box::new(runner));

    let mut graph = pipeline::standard_graph()?;

    if args.dry_run {
        print_dry_run(&graph, &args.target, &ctx)?;
        return Ok(());
    }

    graph.run(&args.target, &ctx)
}

/// Simple dry-run output: the resolved execution order, nothing executed.
fn print_dry_run(graph: &TargetGraph, requested: &str, ctx: &BuildContext) -> Result<()> {
    let plan = graph.plan(requested, ctx)?;

    println!("builddag dry-run");
    println!("  requested: {requested}");
    println!("  configuration: {}", ctx.config.configuration);
    println!();
    println!("execution order ({}):", plan.len());
    for name in plan {
        println!("  - {name}");
    }
    Ok(())
}
