//! Version requirements: predicates over versions

mod operator;

pub use operator::{InvalidOperatorError, Operator};

use std::fmt;

use crate::version::Version;

/// A predicate over versions.
///
/// Together with a package name this forms a dependency constraint; on its
/// own it answers "does this version qualify".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionReq {
    /// Any version qualifies
    Any,
    /// Versions related to the given one by the operator
    Cmp(Operator, Version),
    /// Closed interval: both endpoints qualify
    Between(Version, Version),
}

impl VersionReq {
    /// Shorthand for an exact-version requirement
    pub fn exact(version: Version) -> Self {
        VersionReq::Cmp(Operator::Equal, version)
    }

    /// Check whether `version` satisfies this requirement
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionReq::Any => true,
            VersionReq::Cmp(Operator::Equal, wanted) => version == wanted,
            VersionReq::Cmp(Operator::GreaterThanOrEqual, wanted) => version >= wanted,
            VersionReq::Cmp(Operator::LessThanOrEqual, wanted) => version <= wanted,
            VersionReq::Cmp(Operator::GreaterThan, wanted) => version > wanted,
            VersionReq::Cmp(Operator::LessThan, wanted) => version < wanted,
            VersionReq::Cmp(Operator::Pessimistic, wanted) => {
                version >= wanted && *version < wanted.pessimistic_upper_bound()
            }
            VersionReq::Between(low, high) => version >= low && version <= high,
        }
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionReq::Any => f.write_str("*"),
            VersionReq::Cmp(op, version) => write!(f, "{} {}", op, version),
            VersionReq::Between(low, high) => write!(f, "{} to {}", low, high),
        }
    }
}
