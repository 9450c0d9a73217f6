//! Finite-domain encoding and solving of dependency constraint problems.
//!
//! The pipeline run by [`Solver::solve`]:
//!
//! 1. Trim the universe to the packages reachable from the goals.
//! 2. Assign numeric ids: package indices in graph order (index 0 is the
//!    synthetic run-list package), version ids in declared order.
//! 3. Rent a session from the worker pool and post the problem: one
//!    variable per package with domain `[-1, N-1]` (`-1` meaning the
//!    package is unused), and one clause per declared dependency.
//! 4. Solve. A valid assignment maps back to `(name, version)` pairs; an
//!    invalid one (some package had to be disabled) triggers the culprit
//!    search, which re-runs the pipeline over growing run-list prefixes to
//!    isolate the first breaking goal.
//!
//! The session is a narrow trait so external engines can be plugged in;
//! [`FdSession`] is the built-in implementation.

mod driver;
mod encode;
mod fd;
mod index;
mod pool;
mod session;


pub use driver::Solver;
pub use fd::FdSession;
pub use pool::{Disposition, SessionLease, WorkerPool};
pub use session::{Assignment, Outcome, SolverSession};
