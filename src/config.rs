// src/config.rs

//! Build configuration resolved once at startup.
//!
//! Nothing in here is ambient or mutable: the CLI arguments and environment
//! are folded into a plain [`BuildConfig`] before the target graph is
//! constructed, and every target action receives it through [`BuildContext`].

use std::env;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::CliArgs;
use crate::errors::Result;
use crate::proc::ProcessRunner;

/// Build configuration passed to the underlying toolchain (`-c` flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    /// Default configuration for this host: `Release` on a build server,
    /// `Debug` for a local build.
    pub fn default_for_host() -> Self {
        if is_server_build() {
            Configuration::Release
        } else {
            Configuration::Debug
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::Debug => write!(f, "Debug"),
            Configuration::Release => write!(f, "Release"),
        }
    }
}

/// Whether this invocation was started by a build server rather than a
/// developer shell.
fn is_server_build() -> bool {
    env::var_os("CI").is_some()
}

/// Immutable per-invocation configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub configuration: Configuration,

    /// Repository root; all other paths are relative to it.
    pub root_dir: PathBuf,
    /// Directory scanned by `clean` for `**/bin` and `**/obj`.
    pub source_dir: PathBuf,
    /// Directory receiving packed artifacts.
    pub output_dir: PathBuf,

    /// Settings document rewritten by the runtime probe and protected by
    /// branch synchronization.
    pub settings_path: PathBuf,

    /// Solution file passed to `restore`, if any.
    pub solution: Option<PathBuf>,
    /// Project packed by `pack`, if any.
    pub pack_project: Option<PathBuf>,

    /// Tool package id installed/updated from the output directory.
    pub package_id: String,

    /// Name of the mainline branch merged by the `pull` target.
    pub mainline_branch: String,
}

impl BuildConfig {
    /// Resolve the effective configuration from CLI arguments and the
    /// environment. This happens exactly once, before the graph exists.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let configuration = args
            .configuration
            .unwrap_or_else(Configuration::default_for_host);
        let root_dir = env::current_dir()?;

        Ok(Self {
            configuration,
            source_dir: root_dir.join("src"),
            output_dir: root_dir.join("output"),
            settings_path: root_dir.join(&args.settings),
            root_dir,
            solution: args.solution.as_deref().map(PathBuf::from),
            pack_project: args.pack_project.as_deref().map(PathBuf::from),
            package_id: "PowerUp.Watcher".to_string(),
            mainline_branch: "main".to_string(),
        })
    }
}

/// Everything a target action gets to see: the resolved configuration and
/// the process boundary. Threaded by reference through the whole run.
pub struct BuildContext {
    pub config: BuildConfig,
    pub runner: Box<dyn ProcessRunner>,
}

impl BuildContext {
    pub fn new(config: BuildConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }
}
