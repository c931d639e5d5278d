// src/proc/mod.rs

//! External process boundary.
//!
//! Target actions never spawn processes directly; they go through the
//! [`ProcessRunner`] trait so tests can substitute a scripted double
//! (see [`mock`]) without touching the host system.

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::errors::{BuildError, Result};

pub mod mock;

/// Abstract external command interface.
///
/// Commands run to completion synchronously; there is no concurrency in a
/// build run, so blocking here is the intended behaviour.
pub trait ProcessRunner: Debug {
    /// Run `program` with `args`, capturing stdout as lines.
    ///
    /// A non-zero exit status is an error; stdout captured up to that
    /// point is discarded.
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>>;
}

/// Implementation that spawns real OS processes via `std::process`.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Working directory for spawned commands; `None` inherits the
    /// current process's directory.
    pub cwd: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

impl ProcessRunner for CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>> {
        let rendered = render_command(program, args);
        info!(command = %rendered, "running command");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        // stderr is inherited so toolchain diagnostics reach the operator
        // unchanged; only stdout is captured for the caller.
        cmd.stderr(std::process::Stdio::inherit());

        let output = cmd.output()?;

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.to_string())
            .collect();

        for line in &lines {
            debug!(command = %rendered, "stdout: {}", line);
        }

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            return Err(BuildError::CommandFailed {
                command: rendered,
                code,
            });
        }

        Ok(lines)
    }
}

/// Render a command line for logs and error messages.
pub fn render_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
