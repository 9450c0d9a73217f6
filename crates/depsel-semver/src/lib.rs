//! Semantic version values and requirements for the depsel dependency solver
//!
//! This crate provides semantic version parsing, total ordering, and the
//! version predicates (exact, relational, pessimistic, interval) that
//! dependency constraints are built from.

pub mod constraint;
mod parser;
mod version;

pub use constraint::{InvalidOperatorError, Operator, VersionReq};
pub use parser::VersionError;
pub use version::Version;
