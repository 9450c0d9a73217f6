//! Comparison operators for version requirements

use std::fmt;
use thiserror::Error;

/// Relational operators a version requirement can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (=)
    Equal,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Less than (<)
    LessThan,
    /// Pessimistic (~>): at least the given version, below its pessimistic
    /// upper bound
    Pessimistic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid operator: {0}")]
pub struct InvalidOperatorError(pub String);

impl Operator {
    /// Parse an operator from its textual form
    pub fn from_str(s: &str) -> Result<Self, InvalidOperatorError> {
        match s {
            "=" | "==" => Ok(Operator::Equal),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "<=" => Ok(Operator::LessThanOrEqual),
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            "~>" => Ok(Operator::Pessimistic),
            _ => Err(InvalidOperatorError(s.to_string())),
        }
    }

    /// The canonical textual form of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Pessimistic => "~>",
        }
    }

    /// All operator spellings accepted by [`Operator::from_str`]
    pub fn supported_operators() -> &'static [&'static str] {
        &["=", "==", ">=", "<=", ">", "<", "~>"]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
