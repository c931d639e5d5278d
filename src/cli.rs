// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::Configuration;

/// Command-line arguments for `builddag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "builddag",
    version,
    about = "Run build targets in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Name of the target to run, including everything it depends on.
    #[arg(value_name = "TARGET", default_value = crate::pipeline::DEFAULT_TARGET)]
    pub target: String,

    /// Build configuration.
    ///
    /// Defaults to `release` on a CI server (the `CI` environment variable
    /// is set), `debug` otherwise.
    #[arg(long, value_enum, value_name = "CONFIGURATION")]
    pub configuration: Option<Configuration>,

    /// Path to the settings document updated by the runtime probe.
    #[arg(long, value_name = "PATH", default_value = "appsettings.json")]
    pub settings: String,

    /// Solution file passed to restore and build. When omitted, the
    /// toolchain picks one up from the working directory.
    #[arg(long, value_name = "PATH")]
    pub solution: Option<String>,

    /// Project packed by the pack target. When omitted, the toolchain
    /// picks one up from the working directory.
    #[arg(long, value_name = "PATH")]
    pub pack_project: Option<String>,

    /// Resolve and print the execution order, but don't run any target.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
