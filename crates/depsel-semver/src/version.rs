//! Parsed semantic version values with semver precedence ordering

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::parser::{self, VersionError};

/// A single pre-release identifier.
///
/// Purely numeric identifiers compare numerically and order before
/// alphanumeric ones, which compare in ASCII order. The derived `Ord`
/// encodes exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Identifier {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

/// A parsed semantic version.
///
/// Ordering follows semver precedence: the numeric triple first, then the
/// pre-release identifiers (a release orders after its own pre-releases).
/// Build metadata and the number of components that were explicitly written
/// are carried for display purposes but ignored by `Eq`, `Ord` and `Hash`,
/// so `0.1` and `0.1.0` are the same version.
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<Identifier>,
    build: Vec<String>,
    /// How many numeric components the source text spelled out (1..=3).
    /// Drives the pessimistic upper bound and `Display`.
    parts: u8,
}

impl Version {
    /// Create a release version from a full numeric triple.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
            parts: 3,
        }
    }

    pub(crate) fn from_parts(
        major: u64,
        minor: u64,
        patch: u64,
        pre: Vec<Identifier>,
        build: Vec<String>,
        parts: u8,
    ) -> Self {
        Version {
            major,
            minor,
            patch,
            pre,
            build,
            parts,
        }
    }

    /// Parse a version string such as `1`, `0.2`, `1.2.3-alpha.1+build.5`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        parser::parse(input)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// True when the version carries pre-release identifiers.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Exclusive upper bound used by the pessimistic (`~>`) operator.
    ///
    /// The last explicitly written numeric component is dropped and the one
    /// above it is bumped: `~> 1.2.3` allows `< 1.3.0`, `~> 1.2` allows
    /// `< 2.0.0`, and `~> 1` allows `< 2.0.0`.
    pub fn pessimistic_upper_bound(&self) -> Version {
        if self.parts >= 3 {
            Version::new(self.major, self.minor + 1, 0)
        } else {
            Version::new(self.major + 1, 0, 0)
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(u64, u64, u64)> for Version {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Version::new(major, minor, patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts {
            1 => write!(f, "{}", self.major)?,
            2 => write!(f, "{}.{}", self.major, self.minor)?,
            _ => write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?,
        }
        if !self.pre.is_empty() {
            let pre: Vec<String> = self.pre.iter().map(|i| i.to_string()).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_ordering_numeric() {
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.0") < v("1.1.0"));
        assert!(v("1.9.9") < v("2.0.0"));
        assert!(v("0.1") < v("0.2"));
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0"));
    }

    #[test]
    fn test_ordering_prerelease() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
        assert!(v("1.0.0-alpha.beta") < v("1.0.0-beta"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.2.3+build.1"), v("1.2.3+build.2"));
        assert_eq!(v("1.2.3+build"), v("1.2.3"));
    }

    #[test]
    fn test_pessimistic_upper_bound() {
        assert_eq!(v("1.2.3").pessimistic_upper_bound(), v("1.3.0"));
        assert_eq!(v("1.2").pessimistic_upper_bound(), v("2.0.0"));
        assert_eq!(v("2").pessimistic_upper_bound(), v("3.0.0"));
        assert_eq!(v("0.0.1").pessimistic_upper_bound(), v("0.1.0"));
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("0.1").to_string(), "0.1");
        assert_eq!(v("2").to_string(), "2");
        assert_eq!(v("1.2.3-alpha.1").to_string(), "1.2.3-alpha.1");
        assert_eq!(v("1.2.3+build.5").to_string(), "1.2.3+build.5");
    }

    #[test]
    fn test_prerelease_flag() {
        assert!(v("1.0.0-rc.1").is_prerelease());
        assert!(!v("1.0.0").is_prerelease());
    }
}
