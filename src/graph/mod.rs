// src/graph/mod.rs

//! The target dependency graph engine.
//!
//! - [`target`] holds the `Target` record and its edge kinds.
//! - [`builder`] is the fluent two-phase construction API.
//! - [`resolve`] computes the required set and a deterministic
//!   topological execution order.
//!
//! [`TargetGraph`] itself executes the resolved order, strictly
//! sequentially, halting on the first failure.

pub mod builder;
pub mod resolve;
pub mod target;

use std::collections::HashMap;

use anyhow::Error as AnyError;
use tracing::{debug, info};

use crate::config::BuildContext;
use crate::errors::{BuildError, Result};

pub use builder::{GraphBuilder, TargetHandle};
pub use target::{Target, TargetName};

/// A validated set of targets, ready to resolve and run.
///
/// The graph is constructed fresh per invocation; per-run execution state
/// lives on the targets and is discarded with the graph.
#[derive(Debug)]
pub struct TargetGraph {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
}

impl TargetGraph {
    pub(crate) fn new(targets: Vec<Target>, index: HashMap<String, usize>) -> Self {
        Self { targets, index }
    }

    /// All target names, in declaration order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    /// Resolve the execution order for `requested` without running
    /// anything. This is what `--dry-run` prints.
    pub fn plan(&self, requested: &str, ctx: &BuildContext) -> Result<Vec<&str>> {
        let order = self.resolve_indices(requested, ctx)?;
        Ok(order
            .into_iter()
            .map(|idx| self.targets[idx].name.as_str())
            .collect())
    }

    /// Resolve and execute `requested` and everything it requires.
    ///
    /// Each target's action runs at most once per invocation. The first
    /// failing action halts the run; targets later in the order are never
    /// started, and completed targets keep their side effects.
    pub fn run(&mut self, requested: &str, ctx: &BuildContext) -> Result<()> {
        let order = self.resolve_indices(requested, ctx)?;

        info!(
            requested,
            order = ?order.iter().map(|&i| self.targets[i].name.as_str()).collect::<Vec<_>>(),
            "resolved execution order"
        );

        for idx in order {
            let name = self.targets[idx].name.clone();

            if self.targets[idx].executed {
                debug!(target = %name, "already executed in this run; skipping");
                continue;
            }

            info!(target = %name, "running target");
            let target = &mut self.targets[idx];
            if let Some(action) = &target.action {
                action(ctx).map_err(|err| BuildError::TargetFailed {
                    target: name.clone(),
                    source: AnyError::new(err),
                })?;
            }
            target.executed = true;
            debug!(target = %name, "target completed");
        }

        Ok(())
    }

    fn resolve_indices(&self, requested: &str, ctx: &BuildContext) -> Result<Vec<usize>> {
        let &idx = self
            .index
            .get(requested)
            .ok_or_else(|| BuildError::TargetNotFound(requested.to_string()))?;
        resolve::resolve(&self.targets, idx, ctx)
    }
}
