// src/graph/builder.rs

//! Fluent two-phase construction of a [`TargetGraph`].
//!
//! Targets are declared by name and wired with chainable calls:
//!
//! ```
//! use builddag::graph::GraphBuilder;
//!
//! let mut b = GraphBuilder::new();
//! b.target("clean").before(["restore"]);
//! b.target("restore").executes(|_ctx| Ok(()));
//! b.target("compile").depends_on(["restore"]).executes(|_ctx| Ok(()));
//! let graph = b.build().unwrap();
//! # let _ = graph;
//! ```
//!
//! Edges reference targets by name, so forward references are fine; all
//! names are checked when [`GraphBuilder::build`] runs.

use std::collections::HashMap;

use crate::config::BuildContext;
use crate::errors::{BuildError, Result};
use crate::graph::target::Target;
use crate::graph::TargetGraph;

/// Collects target declarations before validation.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a target, or return a handle to an already-declared one so
    /// it can be wired in several steps. Declaration order is remembered
    /// and used to break scheduling ties deterministically.
    pub fn target(&mut self, name: &str) -> TargetHandle<'_> {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.targets.len();
                self.targets.push(Target::new(name));
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        TargetHandle { builder: self, idx }
    }

    /// Validate the declarations and produce an executable graph.
    ///
    /// Unknown edge references and self-references are configuration
    /// errors. Cycles are detected later, at resolution time, over the
    /// set of targets that actually participate in a run.
    pub fn build(self) -> Result<TargetGraph> {
        for target in &self.targets {
            let edges = target
                .depends_on
                .iter()
                .chain(&target.before)
                .chain(&target.after)
                .chain(&target.dependent_for);

            for referenced in edges {
                if !self.index.contains_key(referenced) {
                    return Err(BuildError::ConfigError(format!(
                        "target '{}' references unknown target '{}'",
                        target.name, referenced
                    )));
                }
                if referenced == &target.name {
                    return Err(BuildError::ConfigError(format!(
                        "target '{}' cannot reference itself",
                        target.name
                    )));
                }
            }
        }

        Ok(TargetGraph::new(self.targets, self.index))
    }
}

/// Chainable handle to one declared target.
pub struct TargetHandle<'a> {
    builder: &'a mut GraphBuilder,
    idx: usize,
}

impl TargetHandle<'_> {
    fn target_mut(&mut self) -> &mut Target {
        &mut self.builder.targets[self.idx]
    }

    /// The named targets must complete successfully before this one runs.
    pub fn depends_on<'n>(mut self, names: impl IntoIterator<Item = &'n str>) -> Self {
        let t = self.target_mut();
        t.depends_on.extend(names.into_iter().map(String::from));
        self
    }

    /// If any of the named targets is scheduled, this target runs first.
    /// Does not force either side into the schedule.
    pub fn before<'n>(mut self, names: impl IntoIterator<Item = &'n str>) -> Self {
        let t = self.target_mut();
        t.before.extend(names.into_iter().map(String::from));
        self
    }

    /// If any of the named targets is scheduled, this target runs last.
    /// Does not force either side into the schedule.
    pub fn after<'n>(mut self, names: impl IntoIterator<Item = &'n str>) -> Self {
        let t = self.target_mut();
        t.after.extend(names.into_iter().map(String::from));
        self
    }

    /// If any of the named targets is scheduled, this target is scheduled
    /// too, and runs before it. Equivalent to the named target declaring
    /// `depends_on` this one, declared from the dependency's side.
    pub fn dependent_for<'n>(mut self, names: impl IntoIterator<Item = &'n str>) -> Self {
        let t = self.target_mut();
        t.dependent_for.extend(names.into_iter().map(String::from));
        self
    }

    /// Drop this target from the schedule when the predicate holds at
    /// resolution time.
    pub fn skip_if(mut self, predicate: impl Fn(&BuildContext) -> bool + 'static) -> Self {
        self.target_mut().skip = Some(Box::new(predicate));
        self
    }

    /// The work this target performs.
    pub fn executes(mut self, action: impl Fn(&BuildContext) -> Result<()> + 'static) -> Self {
        self.target_mut().action = Some(Box::new(action));
        self
    }
}
