//! Posting a trimmed universe into a solver session

use super::index::PackageIndex;
use super::session::SolverSession;
use crate::error::SolveError;
use crate::graph::{Constraint, DepGraph};

/// Version id meaning "the package is not part of the solution". Every
/// non-run-list package gets this as the bottom of its domain so that
/// nothing forces a package into the solution before a chosen version
/// actually requires it.
const UNUSED: i32 = -1;

/// Post the whole problem: packages, domains, dependency clauses, and the
/// goals as the dependency list of the synthetic run-list version 0.
///
/// Posting order matters to the session: run-list package first (index 0,
/// domain `[0,0]`, required), then every real package in index order.
pub(crate) fn encode_problem(
    session: &mut dyn SolverSession,
    graph: &DepGraph,
    index: &PackageIndex,
    goals: &[Constraint],
) -> Result<(), SolveError> {
    session.new_problem(&format!("run-list[{}]", goals.len()), index.package_count());

    let run_list = session.add_package(0, 0, 0);
    session.mark_package_required(run_list);

    for package in 1..index.package_count() {
        let top = index.version_count(package) as i32 - 1;
        session.add_package(UNUSED, top, UNUSED);
    }

    for (position, (_, entries)) in graph.packages().enumerate() {
        let package = position + 1;
        for (version_id, (_, constraints)) in entries.iter().enumerate() {
            for constraint in constraints {
                post(session, index, package, version_id as i32, constraint)?;
            }
        }
    }

    for goal in goals {
        post(session, index, run_list, 0, goal)?;
    }

    Ok(())
}

fn post(
    session: &mut dyn SolverSession,
    index: &PackageIndex,
    package: usize,
    version: i32,
    constraint: &Constraint,
) -> Result<(), SolveError> {
    let (dep, (min, max)) = index
        .constraint_range(constraint)
        .ok_or_else(|| SolveError::UnreachablePackage(constraint.package.clone()))?;
    session.add_version_constraint(package, version, dep, min, max);
    Ok(())
}
