//! Reachability trimming of the package universe.
//!
//! Before encoding, the universe is cut down to the packages transitively
//! reachable from the run-list goals. Dependency names that no package in
//! the universe defines are kept as placeholder entries with zero versions:
//! the encoder can still address them, and any constraint on them is
//! unsatisfiable, which keeps the culprit report informative. Versions that
//! reference such packages are intentionally not removed.

use log::debug;

use crate::error::SolveError;
use crate::graph::{Constraint, DepGraph};

/// Build the subgraph reachable from the goals.
///
/// A goal naming a package absent from the universe fails the whole
/// operation with [`SolveError::UnreachablePackage`].
pub(crate) fn reachable_subgraph(
    graph: &DepGraph,
    goals: &[Constraint],
) -> Result<DepGraph, SolveError> {
    let mut trimmed = DepGraph::new();
    for goal in goals {
        if trimmed.contains_package(&goal.package) {
            continue;
        }
        if !graph.contains_package(&goal.package) {
            return Err(SolveError::UnreachablePackage(goal.package.clone()));
        }
        copy_reachable(graph, &mut trimmed, &goal.package);
    }
    debug!(
        "trimmed universe to {} of {} packages",
        trimmed.package_count(),
        graph.package_count()
    );
    Ok(trimmed)
}

fn copy_reachable(graph: &DepGraph, trimmed: &mut DepGraph, root: &str) {
    let mut pending = vec![root.to_string()];
    while let Some(name) = pending.pop() {
        if trimmed.contains_package(&name) {
            continue;
        }
        match graph.versions(&name) {
            Some(entries) => {
                trimmed.add_package(name, entries.to_vec());
                for (_, constraints) in entries {
                    for constraint in constraints {
                        if !trimmed.contains_package(&constraint.package) {
                            pending.push(constraint.package.clone());
                        }
                    }
                }
            }
            None => trimmed.add_placeholder(name),
        }
    }
}
