use std::fmt::Write;

use depsel_semver::Version;
use thiserror::Error;

use crate::graph::Constraint;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// A constraint names a package that does not exist in the universe.
    #[error("constraint references a package missing from the universe: {0}")]
    UnreachablePackage(String),

    /// The solver produced no assignment at all.
    #[error("no solution satisfies the run list")]
    NoSolution,

    /// The shortest failing run-list prefix, with the packages the solver
    /// had to force out of their required domain.
    #[error("unable to satisfy the run list after {} goals", .prefix.len())]
    Unsatisfiable {
        prefix: Vec<Constraint>,
        disabled: Vec<(String, Option<Version>)>,
    },

    /// The worker pool had no idle solver session.
    #[error("no dependency solver workers available")]
    NoWorkers,

    /// The solver exceeded its deadline; the rented worker is recycled.
    #[error("dependency solver timed out during {phase}")]
    Timeout { phase: &'static str },

    /// `solve` requires at least one goal.
    #[error("the run list is empty")]
    EmptyRunList,
}

pub type Result<T> = std::result::Result<T, SolveError>;

/// Render the long, human-readable form of a solve failure.
///
/// `Display` on [`SolveError`] stays single-line; this expands the
/// culprit report into the goal list and the packages that could not be
/// placed.
pub fn format_error(error: &SolveError) -> String {
    match error {
        SolveError::Unsatisfiable { prefix, disabled } => {
            let mut out = String::from("Unable to satisfy the run list.\nGoals attempted:\n");
            for goal in prefix {
                let _ = writeln!(out, "    {}", goal);
            }
            out.push_str("Packages that could not be placed:\n");
            for (name, version) in disabled {
                match version {
                    Some(version) => {
                        let _ = writeln!(out, "    {} {}", name, version);
                    }
                    None => {
                        let _ = writeln!(out, "    {} (no version fits)", name);
                    }
                }
            }
            out
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_single_line() {
        let error = SolveError::UnreachablePackage("appX".to_string());
        assert_eq!(
            error.to_string(),
            "constraint references a package missing from the universe: appX"
        );
        assert!(!error.to_string().contains('\n'));
    }

    #[test]
    fn test_format_unsatisfiable() {
        let error = SolveError::Unsatisfiable {
            prefix: vec![
                Constraint::parse("app1 = 0.1").unwrap(),
                Constraint::parse("app2 = 0.2").unwrap(),
            ],
            disabled: vec![
                ("app2".to_string(), Some(Version::new(0, 2, 0))),
                ("ghost".to_string(), None),
            ],
        };
        let report = format_error(&error);
        assert!(report.contains("app1 = 0.1"));
        assert!(report.contains("app2 0.2.0"));
        assert!(report.contains("ghost (no version fits)"));
    }

    #[test]
    fn test_format_falls_back_to_display() {
        let error = SolveError::NoWorkers;
        assert_eq!(format_error(&error), error.to_string());
    }
}
