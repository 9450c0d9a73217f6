//! Package dependency constraint solving.
//!
//! Given a universe of packages (each with a list of versions and
//! per-version constraints on other packages) and a run list of goal
//! constraints, [`Solver::solve`] either returns one concrete version per
//! package satisfying every constraint, or isolates the shortest failing
//! prefix of the run list together with the packages that could not be
//! placed.
//!
//! # Example
//!
//! ```ignore
//! use depsel_solver::{Constraint, DepGraph, Solver, Version};
//!
//! let mut graph = DepGraph::new();
//! graph.add_package_version(
//!     "app1",
//!     Version::parse("0.1")?,
//!     vec![Constraint::parse("app2 = 0.2")?],
//! );
//! graph.add_package_version("app2", Version::parse("0.2")?, vec![]);
//!
//! let solver = Solver::default();
//! let assignments = solver.solve(&graph, &[Constraint::parse("app1 = 0.1")?])?;
//! ```

pub mod error;
pub mod graph;
mod reach;
pub mod solver;

pub use depsel_semver::{Operator, Version, VersionError, VersionReq};
pub use error::{format_error, Result, SolveError};
pub use graph::{Constraint, ConstraintError, DepGraph};
pub use solver::{
    Assignment, Disposition, FdSession, Outcome, SessionLease, Solver, SolverSession, WorkerPool,
};
