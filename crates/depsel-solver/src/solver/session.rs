//! The narrow interface a finite-domain solver engine must expose

use std::time::Instant;

/// One package's value in a solver answer.
///
/// `version` is a version id in `[0, N-1]`, or negative when the package is
/// unused. `disabled` marks a package the solver had to force out of its
/// required domain; any disabled package makes the whole answer invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub package: usize,
    pub version: i32,
    pub disabled: bool,
}

/// Result of a session solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An assignment was found. `valid` is false when `disabled > 0`.
    Solved {
        valid: bool,
        disabled: usize,
        assignments: Vec<Assignment>,
    },
    /// No assignment exists, even with packages disabled.
    Unsolvable,
    /// The deadline passed before the search finished.
    Timeout,
}

/// A rented solver session.
///
/// The encoder drives it in a fixed order: `new_problem`, then one
/// `add_package` per package (the returned indices are sequential from 0),
/// `mark_package_required` for packages that may not stay unused, then the
/// version constraints, then `solve`. A session is reusable: `new_problem`
/// discards any previous state.
pub trait SolverSession: Send {
    /// Start a fresh problem. `package_count` is a sizing hint.
    fn new_problem(&mut self, label: &str, package_count: usize);

    /// Add a package variable with inclusive domain `[min, max]` and return
    /// its index. `preferred` is a value-ordering hint; it is tried first
    /// when it lies inside the domain.
    fn add_package(&mut self, min: i32, max: i32, preferred: i32) -> usize;

    /// Forbid the unused value (and disabling) for a package.
    fn mark_package_required(&mut self, package: usize);

    /// Post: if `package` takes `version`, then `dep_package` must take a
    /// version id in `[min, max]`, or be disabled. An empty range
    /// (`min > max`) leaves disabling as the only way out.
    fn add_version_constraint(
        &mut self,
        package: usize,
        version: i32,
        dep_package: usize,
        min: i32,
        max: i32,
    );

    /// Run the search. `deadline`, when given, bounds the wall-clock time.
    fn solve(&mut self, deadline: Option<Instant>) -> Outcome;
}
