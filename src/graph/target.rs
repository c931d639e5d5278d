// src/graph/target.rs

//! The `Target` record: a named unit of build work plus its edges.

use crate::config::BuildContext;
use crate::errors::Result;

pub type TargetName = String;

/// A target's action. Side effects only; failure aborts the run.
pub type Action = Box<dyn Fn(&BuildContext) -> Result<()>>;

/// Evaluated once at resolution time; `true` drops the target from the
/// execution order entirely.
pub type SkipPredicate = Box<dyn Fn(&BuildContext) -> bool>;

/// A named unit of work with dependency and ordering edges.
///
/// All edges are stored by target name: declarations may reference targets
/// that are defined later, and names are resolved when the graph is built.
pub struct Target {
    pub name: TargetName,
    pub(crate) action: Option<Action>,

    /// Targets that must complete successfully before this one runs.
    pub(crate) depends_on: Vec<TargetName>,
    /// Pure ordering: if both are scheduled, this target runs first.
    pub(crate) before: Vec<TargetName>,
    /// Pure ordering: if both are scheduled, this target runs last.
    pub(crate) after: Vec<TargetName>,
    /// Inverse dependency: if the named target is scheduled, this target
    /// is also scheduled, and runs before it.
    pub(crate) dependent_for: Vec<TargetName>,

    pub(crate) skip: Option<SkipPredicate>,

    /// True once the action has completed in the current invocation.
    pub(crate) executed: bool,
}

impl Target {
    pub(crate) fn new(name: impl Into<TargetName>) -> Self {
        Self {
            name: name.into(),
            action: None,
            depends_on: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            dependent_for: Vec::new(),
            skip: None,
            executed: false,
        }
    }

    pub fn executed(&self) -> bool {
        self.executed
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("before", &self.before)
            .field("after", &self.after)
            .field("dependent_for", &self.dependent_for)
            .field("has_action", &self.action.is_some())
            .field("has_skip", &self.skip.is_some())
            .field("executed", &self.executed)
            .finish()
    }
}
