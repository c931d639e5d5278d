// src/graph/resolve.rs

//! Resolution: which targets run, and in what order.
//!
//! Resolution happens once per run, in three stages:
//!
//! 1. **Required set** — the transitive `depends_on` closure of the
//!    requested target, extended to a fixpoint with every target whose
//!    `dependent_for` names a member of the set (such a target brings its
//!    own `depends_on` closure along).
//! 2. **Precedence graph** — "must run before" edges over the required
//!    set, from all four edge kinds. `before`/`after` only contribute
//!    ordering between targets that are already scheduled.
//! 3. **Topological order** — Kahn's algorithm with the ready set kept in
//!    declaration order, so independent targets run in the order they
//!    were declared. A non-empty remainder means a cycle; the error names
//!    the targets on it.
//!
//! Skip predicates are evaluated once, up front. A skipped target never
//! enters the required set, contributes no edges, and pulls nothing in on
//! its own account.

use std::collections::BTreeSet;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::config::BuildContext;
use crate::errors::{BuildError, Result};
use crate::graph::target::Target;

/// Compute the execution order (as indices into `targets`) for the target
/// at `requested`.
pub(crate) fn resolve(
    targets: &[Target],
    requested: usize,
    ctx: &BuildContext,
) -> Result<Vec<usize>> {
    let skipped: Vec<bool> = targets
        .iter()
        .map(|t| t.skip.as_ref().is_some_and(|p| p(ctx)))
        .collect();

    let required = required_set(targets, requested, &skipped);
    if required.is_empty() {
        debug!(
            target = %targets[requested].name,
            "requested target is skipped; nothing to run"
        );
        return Ok(Vec::new());
    }

    let precedence = precedence_graph(targets, &required);
    topological_order(targets, &required, &precedence)
}

/// Stage 1: `depends_on` closure plus `dependent_for` fixpoint.
fn required_set(targets: &[Target], requested: usize, skipped: &[bool]) -> BTreeSet<usize> {
    let index = |name: &str| targets.iter().position(|t| t.name == name);

    let mut required = BTreeSet::new();
    if !skipped[requested] {
        required.insert(requested);
    }

    loop {
        let mut changed = false;

        // Close over depends_on edges of everything currently required.
        let mut worklist: Vec<usize> = required.iter().copied().collect();
        while let Some(idx) = worklist.pop() {
            for dep in &targets[idx].depends_on {
                let dep_idx = index(dep).expect("edge references are validated at build time");
                if !skipped[dep_idx] && required.insert(dep_idx) {
                    changed = true;
                    worklist.push(dep_idx);
                }
            }
        }

        // Pull in dependent_for declarations aimed at the required set.
        for (idx, target) in targets.iter().enumerate() {
            if skipped[idx] || required.contains(&idx) {
                continue;
            }
            let attaches = target.dependent_for.iter().any(|z| {
                index(z)
                    .map(|z_idx| required.contains(&z_idx))
                    .unwrap_or(false)
            });
            if attaches {
                required.insert(idx);
                changed = true;
            }
        }

        if !changed {
            return required;
        }
    }
}

/// Stage 2: build the "must run before" graph over the required set.
fn precedence_graph(targets: &[Target], required: &BTreeSet<usize>) -> DiGraphMap<usize, ()> {
    let index = |name: &str| targets.iter().position(|t| t.name == name);
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

    for &idx in required {
        graph.add_node(idx);
    }

    for &idx in required {
        let target = &targets[idx];

        // depends_on(B -> A): A before B.
        for dep in &target.depends_on {
            if let Some(dep_idx) = index(dep) {
                if required.contains(&dep_idx) {
                    graph.add_edge(dep_idx, idx, ());
                }
            }
        }
        // before(A, B): A before B.
        for succ in &target.before {
            if let Some(succ_idx) = index(succ) {
                if required.contains(&succ_idx) {
                    graph.add_edge(idx, succ_idx, ());
                }
            }
        }
        // after(B, A): A before B.
        for pred in &target.after {
            if let Some(pred_idx) = index(pred) {
                if required.contains(&pred_idx) {
                    graph.add_edge(pred_idx, idx, ());
                }
            }
        }
        // dependent_for(A, Z): A before Z.
        for z in &target.dependent_for {
            if let Some(z_idx) = index(z) {
                if required.contains(&z_idx) {
                    graph.add_edge(idx, z_idx, ());
                }
            }
        }
    }

    graph
}

/// Stage 3: deterministic Kahn topological sort, declaration order as the
/// tie-break.
fn topological_order(
    targets: &[Target],
    required: &BTreeSet<usize>,
    precedence: &DiGraphMap<usize, ()>,
) -> Result<Vec<usize>> {
    use petgraph::Direction;

    let mut indegree: std::collections::HashMap<usize, usize> = required
        .iter()
        .map(|&idx| {
            (
                idx,
                precedence.neighbors_directed(idx, Direction::Incoming).count(),
            )
        })
        .collect();

    // BTreeSet keeps the ready set in declaration order (indices are
    // assigned in declaration order).
    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(&idx, _)| idx)
        .collect();

    let mut order = Vec::with_capacity(required.len());

    while let Some(idx) = ready.pop_first() {
        order.push(idx);

        for succ in precedence.neighbors_directed(idx, Direction::Outgoing) {
            let deg = indegree
                .get_mut(&succ)
                .expect("precedence graph only contains required targets");
            *deg -= 1;
            if *deg == 0 {
                ready.insert(succ);
            }
        }
    }

    if order.len() < required.len() {
        return Err(BuildError::DependencyCycle(cycle_description(
            targets, precedence,
        )));
    }

    Ok(order)
}

/// Name the targets on a cycle, for the error message.
fn cycle_description(targets: &[Target], precedence: &DiGraphMap<usize, ()>) -> String {
    for component in tarjan_scc(precedence) {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|&idx| precedence.contains_edge(idx, idx));
        if cyclic {
            let mut names: Vec<&str> = component
                .iter()
                .map(|&idx| targets[idx].name.as_str())
                .collect();
            names.sort_unstable();
            return names.join(", ");
        }
    }
    // Unreachable when called after a stalled Kahn pass.
    "<unknown>".to_string()
}
