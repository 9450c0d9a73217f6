//! Top-level solve driver and culprit search

use std::time::{Duration, Instant};

use depsel_semver::Version;
use log::{debug, info};

use super::encode::encode_problem;
use super::index::PackageIndex;
use super::pool::WorkerPool;
use super::session::{Assignment, Outcome};
use crate::error::{Result, SolveError};
use crate::graph::{Constraint, DepGraph};
use crate::reach;

/// Outcome of one pipeline run, before culprit handling.
enum Run {
    Solved(Vec<(String, Version)>),
    Failed {
        disabled: Vec<(String, Option<Version>)>,
    },
}

/// The dependency solver: owns a pool of solver sessions and runs the
/// trim → index → encode → solve pipeline against a read-only graph.
pub struct Solver {
    pool: WorkerPool,
}

impl Solver {
    pub fn new(pool: WorkerPool) -> Self {
        Solver { pool }
    }

    /// Resolve the run list against the universe.
    ///
    /// On success, returns one `(package, version)` pair for every package
    /// the solution needs; in particular, every goal is covered. On
    /// failure the error carries the shortest failing run-list prefix and
    /// the packages that could not be placed.
    pub fn solve(&self, graph: &DepGraph, goals: &[Constraint]) -> Result<Vec<(String, Version)>> {
        self.solve_inner(graph, goals, None)
    }

    /// Like [`Solver::solve`], bounded by a wall-clock budget covering the
    /// whole call, culprit search included.
    pub fn solve_with_timeout(
        &self,
        graph: &DepGraph,
        goals: &[Constraint],
        timeout: Duration,
    ) -> Result<Vec<(String, Version)>> {
        self.solve_inner(graph, goals, Some(Instant::now() + timeout))
    }

    fn solve_inner(
        &self,
        graph: &DepGraph,
        goals: &[Constraint],
        deadline: Option<Instant>,
    ) -> Result<Vec<(String, Version)>> {
        if goals.is_empty() {
            return Err(SolveError::EmptyRunList);
        }

        let started = Instant::now();
        debug!(
            "solving {} goals against a universe of {} packages",
            goals.len(),
            graph.package_count()
        );

        match self.run_pipeline(graph, goals, deadline)? {
            Run::Solved(assignments) => {
                info!(
                    "resolved {} packages in {:.3} seconds",
                    assignments.len(),
                    started.elapsed().as_secs_f64()
                );
                Ok(assignments)
            }
            Run::Failed { .. } => {
                debug!("run list unsatisfiable, isolating the culprit prefix");
                Err(self.culprit_search(graph, goals, deadline))
            }
        }
    }

    /// One full pass: trim, index, rent a session, encode, solve.
    fn run_pipeline(
        &self,
        graph: &DepGraph,
        goals: &[Constraint],
        deadline: Option<Instant>,
    ) -> Result<Run> {
        let trimmed = reach::reachable_subgraph(graph, goals)?;
        let index = PackageIndex::build(&trimmed);

        let mut lease = self.pool.take()?;
        encode_problem(lease.session(), &trimmed, &index, goals)?;

        match lease.session().solve(deadline) {
            Outcome::Solved {
                valid: true,
                assignments,
                ..
            } => Ok(Run::Solved(map_solution(&index, &assignments))),
            Outcome::Solved {
                valid: false,
                assignments,
                disabled,
            } => {
                debug!("invalid solution: {} packages disabled", disabled);
                Ok(Run::Failed {
                    disabled: map_disabled(&index, &assignments),
                })
            }
            Outcome::Unsolvable => Err(SolveError::NoSolution),
            Outcome::Timeout => {
                lease.mark_failed();
                Err(SolveError::Timeout { phase: "solve" })
            }
        }
    }

    /// The full run list is known to fail; find the shortest prefix that
    /// does. Each prefix re-runs the whole pipeline against the unmodified
    /// graph. Quadratic in the run-list length, which stays short in
    /// practice.
    fn culprit_search(
        &self,
        graph: &DepGraph,
        goals: &[Constraint],
        deadline: Option<Instant>,
    ) -> SolveError {
        for length in 1..=goals.len() {
            let prefix = &goals[..length];
            match self.run_pipeline(graph, prefix, deadline) {
                Ok(Run::Solved(_)) => continue,
                Ok(Run::Failed { disabled }) => {
                    return SolveError::Unsatisfiable {
                        prefix: prefix.to_vec(),
                        disabled,
                    }
                }
                Err(error) => return error,
            }
        }
        // The full run list already failed, so the loop cannot fall
        // through with a deterministic solver.
        SolveError::NoSolution
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(WorkerPool::default())
    }
}

fn map_solution(index: &PackageIndex, assignments: &[Assignment]) -> Vec<(String, Version)> {
    assignments
        .iter()
        .filter(|assignment| assignment.package != 0 && assignment.version >= 0)
        .filter_map(|assignment| {
            let (name, version) = index.unmap(assignment.package, assignment.version);
            version.map(|version| (name, version))
        })
        .collect()
}

fn map_disabled(
    index: &PackageIndex,
    assignments: &[Assignment],
) -> Vec<(String, Option<Version>)> {
    assignments
        .iter()
        .filter(|assignment| assignment.disabled)
        .map(|assignment| index.unmap(assignment.package, assignment.version))
        .collect()
}
