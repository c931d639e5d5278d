// src/gitsync.rs

//! Branch synchronization: merge the mainline branch into the working
//! branch before building, without losing committed state.
//!
//! The settings document carries machine-specific edits written by the
//! runtime probe; those are reverted before switching branches so they
//! never block or pollute the merge. That discard is deliberate data
//! loss, limited to exactly that one file.
//!
//! The sequence is a single linear pass. Any command failure (including a
//! merge conflict) aborts immediately, leaving the repository in whatever
//! state the last successful step produced; recovery is the operator's
//! job.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{BuildError, Result};
use crate::proc::ProcessRunner;

/// One synchronization pass over the version-control client.
pub struct BranchSync<'a> {
    runner: &'a dyn ProcessRunner,
    mainline: &'a str,
    settings_file: &'a Path,
}

impl<'a> BranchSync<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, mainline: &'a str, settings_file: &'a Path) -> Self {
        Self {
            runner,
            mainline,
            settings_file,
        }
    }

    /// Bring the working branch up to date with mainline.
    ///
    /// On the mainline branch this is a single `pull`. On any other
    /// branch: revert the settings file, switch to mainline, pull (from
    /// the `upstream` remote when this clone is a fork), switch back, and
    /// merge mainline in.
    pub fn sync(&self) -> Result<()> {
        let branch = self.current_branch()?;

        if branch == self.mainline {
            info!(branch = %branch, "on mainline; pulling directly");
            self.git(&["pull"])?;
            return Ok(());
        }

        info!(
            branch = %branch,
            mainline = %self.mainline,
            "syncing working branch with mainline"
        );

        // Drop local probe edits so they can't interfere with the merge.
        let settings = self.settings_file.to_string_lossy();
        self.git(&["checkout", &*settings])?;

        self.git(&["checkout", self.mainline])?;

        if self.is_fork()? {
            debug!("upstream remote present; pulling from fork upstream");
            self.git(&["pull", "--set-upstream", "upstream", self.mainline])?;
        } else {
            self.git(&["pull"])?;
        }

        self.git(&["checkout", branch.as_str()])?;
        self.git(&["merge", self.mainline])?;

        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let lines = self.git(&["branch", "--show-current"])?;
        lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                BuildError::ConfigError(
                    "could not determine the current branch (detached HEAD?)".to_string(),
                )
            })
    }

    /// A clone is a fork when it carries a remote named `upstream`.
    fn is_fork(&self) -> Result<bool> {
        let remotes = self.git(&["remote"])?;
        Ok(remotes.iter().any(|r| r.trim() == "upstream"))
    }

    fn git(&self, args: &[&str]) -> Result<Vec<String>> {
        self.runner.run("git", args)
    }
}
