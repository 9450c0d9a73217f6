//! Dependency constraints and the package universe they live in

use std::collections::BTreeMap;
use std::fmt;

use depsel_semver::{InvalidOperatorError, Operator, Version, VersionError, VersionReq};
use thiserror::Error;

/// A constraint on a single package: the package must be chosen at a
/// version satisfying the requirement.
///
/// The raw input shapes (a bare name, `(name, version)`,
/// `(name, version, operator)` and `(name, low, high, "between")`) all
/// canonicalize into this form via the `TryFrom` impls and constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub package: String,
    pub req: VersionReq,
}

impl Constraint {
    /// Any version of the package qualifies.
    pub fn any(package: impl Into<String>) -> Self {
        Constraint {
            package: package.into(),
            req: VersionReq::Any,
        }
    }

    /// Exactly the given version.
    pub fn exact(package: impl Into<String>, version: Version) -> Self {
        Constraint {
            package: package.into(),
            req: VersionReq::exact(version),
        }
    }

    /// Versions related to `version` by `op`.
    pub fn new(package: impl Into<String>, op: Operator, version: Version) -> Self {
        Constraint {
            package: package.into(),
            req: VersionReq::Cmp(op, version),
        }
    }

    /// Versions inside the closed interval `[low, high]`.
    pub fn between(package: impl Into<String>, low: Version, high: Version) -> Self {
        Constraint {
            package: package.into(),
            req: VersionReq::Between(low, high),
        }
    }

    /// Parse the textual constraint forms: `"pkg"`, `"pkg 1.0"`,
    /// `"pkg >= 1.0"` and `"pkg 1.0 to 2.0"`.
    pub fn parse(input: &str) -> std::result::Result<Self, ConstraintError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(ConstraintError::Empty),
            [package] => Ok(Constraint::any(*package)),
            [package, version] => Ok(Constraint::exact(*package, Version::parse(version)?)),
            [package, op, version] => Ok(Constraint::new(
                *package,
                Operator::from_str(op)?,
                Version::parse(version)?,
            )),
            [package, low, "to", high] => Ok(Constraint::between(
                *package,
                Version::parse(low)?,
                Version::parse(high)?,
            )),
            _ => Err(ConstraintError::Malformed(input.to_string())),
        }
    }

    /// Check whether the pair `(package, version)` satisfies this constraint.
    pub fn matches(&self, package: &str, version: &Version) -> bool {
        self.package == package && self.req.matches(version)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.req {
            VersionReq::Any => f.write_str(&self.package),
            req => write!(f, "{} {}", self.package, req),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("empty constraint")]
    Empty,

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Operator(#[from] InvalidOperatorError),

    #[error("malformed constraint: {0}")]
    Malformed(String),
}

impl TryFrom<&str> for Constraint {
    type Error = ConstraintError;

    fn try_from(input: &str) -> std::result::Result<Self, Self::Error> {
        Constraint::parse(input)
    }
}

impl TryFrom<(&str, &str)> for Constraint {
    type Error = ConstraintError;

    fn try_from((package, version): (&str, &str)) -> std::result::Result<Self, Self::Error> {
        Ok(Constraint::exact(package, Version::parse(version)?))
    }
}

impl TryFrom<(&str, &str, &str)> for Constraint {
    type Error = ConstraintError;

    fn try_from((package, version, op): (&str, &str, &str)) -> std::result::Result<Self, Self::Error> {
        Ok(Constraint::new(
            package,
            Operator::from_str(op)?,
            Version::parse(version)?,
        ))
    }
}

impl TryFrom<(&str, &str, &str, &str)> for Constraint {
    type Error = ConstraintError;

    fn try_from(
        (package, low, high, kind): (&str, &str, &str, &str),
    ) -> std::result::Result<Self, Self::Error> {
        if kind != "between" {
            return Err(ConstraintError::Malformed(format!(
                "{} {} {} {}",
                package, low, high, kind
            )));
        }
        Ok(Constraint::between(
            package,
            Version::parse(low)?,
            Version::parse(high)?,
        ))
    }
}

/// The package universe: an ordered map from package name to its versions
/// and the constraints each version declares on other packages.
///
/// Names iterate in sorted order, so the set of packages and their version
/// lists do not depend on the order `add_*` calls were made in. Version
/// lists keep insertion order; that order drives the solver's preference
/// and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepGraph {
    packages: BTreeMap<String, Vec<(Version, Vec<Constraint>)>>,
}

impl DepGraph {
    pub fn new() -> Self {
        DepGraph::default()
    }

    /// Add one version of a package.
    ///
    /// Re-adding an existing version appends only the constraints not
    /// already present, keeping the old ones in front.
    pub fn add_package_version(
        &mut self,
        name: impl Into<String>,
        version: Version,
        constraints: Vec<Constraint>,
    ) {
        let entry = self.packages.entry(name.into()).or_default();
        let position = entry.iter().position(|(existing, _)| *existing == version);
        let slot = match position {
            Some(found) => &mut entry[found].1,
            None => {
                entry.push((version, Vec::new()));
                let last = entry.len() - 1;
                &mut entry[last].1
            }
        };
        for constraint in constraints {
            if !slot.contains(&constraint) {
                slot.push(constraint);
            }
        }
    }

    /// Add a package with a list of versions and their constraints.
    pub fn add_package(
        &mut self,
        name: impl Into<String>,
        versions: Vec<(Version, Vec<Constraint>)>,
    ) {
        let name = name.into();
        for (version, constraints) in versions {
            self.add_package_version(name.clone(), version, constraints);
        }
    }

    /// Add several packages at once.
    pub fn add_packages(&mut self, packages: Vec<(String, Vec<(Version, Vec<Constraint>)>)>) {
        for (name, versions) in packages {
            self.add_package(name, versions);
        }
    }

    pub fn contains_package(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// The stored versions of a package, in insertion order.
    pub fn versions(&self, name: &str) -> Option<&[(Version, Vec<Constraint>)]> {
        self.packages.get(name).map(Vec::as_slice)
    }

    /// Iterate packages in name order.
    pub fn packages(
        &self,
    ) -> impl Iterator<Item = (&str, &[(Version, Vec<Constraint>)])> + '_ {
        self.packages
            .iter()
            .map(|(name, versions)| (name.as_str(), versions.as_slice()))
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Register a package that is referenced but has no known versions.
    /// Downstream encoding gives it an empty domain, so any constraint on
    /// it is unsatisfiable while the package index stays addressable.
    pub(crate) fn add_placeholder(&mut self, name: impl Into<String>) {
        self.packages.entry(name.into()).or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_constraint_parse_forms() {
        assert_eq!(Constraint::parse("app1").unwrap(), Constraint::any("app1"));
        assert_eq!(
            Constraint::parse("app1 0.1").unwrap(),
            Constraint::exact("app1", v("0.1"))
        );
        assert_eq!(
            Constraint::parse("app3 >= 0.2").unwrap(),
            Constraint::new("app3", Operator::GreaterThanOrEqual, v("0.2"))
        );
        assert_eq!(
            Constraint::parse("app2 1.0 to 2.0").unwrap(),
            Constraint::between("app2", v("1.0"), v("2.0"))
        );
        assert!(Constraint::parse("").is_err());
        assert!(Constraint::parse("app1 1.0 2.0 4.0 junk").is_err());
    }

    #[test]
    fn test_constraint_tuple_forms() {
        assert_eq!(
            Constraint::try_from(("app1", "0.1")).unwrap(),
            Constraint::exact("app1", v("0.1"))
        );
        assert_eq!(
            Constraint::try_from(("app3", "0.2", ">=")).unwrap(),
            Constraint::new("app3", Operator::GreaterThanOrEqual, v("0.2"))
        );
        assert_eq!(
            Constraint::try_from(("app2", "1.0", "2.0", "between")).unwrap(),
            Constraint::between("app2", v("1.0"), v("2.0"))
        );
        assert!(Constraint::try_from(("app2", "1.0", "2.0", "outside")).is_err());
    }

    #[test]
    fn test_constraint_matches() {
        let c = Constraint::new("app3", Operator::GreaterThanOrEqual, v("0.2"));
        assert!(c.matches("app3", &v("0.2")));
        assert!(c.matches("app3", &v("0.9")));
        assert!(!c.matches("app3", &v("0.1")));
        assert!(!c.matches("app2", &v("0.2")));
    }

    #[test]
    fn test_constraint_display() {
        assert_eq!(Constraint::any("app1").to_string(), "app1");
        assert_eq!(
            Constraint::exact("app1", v("0.1")).to_string(),
            "app1 = 0.1"
        );
        assert_eq!(
            Constraint::new("app3", Operator::Pessimistic, v("2.0")).to_string(),
            "app3 ~> 2.0"
        );
    }

    #[test]
    fn test_graph_add_and_lookup() {
        let mut graph = DepGraph::new();
        graph.add_package_version("app1", v("0.1"), vec![Constraint::any("app2")]);
        graph.add_package_version("app1", v("0.2"), vec![]);

        assert!(graph.contains_package("app1"));
        assert!(!graph.contains_package("app2"));
        assert_eq!(graph.package_count(), 1);

        let versions = graph.versions("app1").unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].0, v("0.1"));
        assert_eq!(versions[1].0, v("0.2"));
    }

    #[test]
    fn test_graph_merge_keeps_order_and_dedups() {
        let a = Constraint::exact("dep", v("1.0"));
        let b = Constraint::any("other");
        let c = Constraint::new("dep", Operator::GreaterThan, v("2.0"));

        let mut graph = DepGraph::new();
        graph.add_package_version("app", v("1.0"), vec![a.clone(), b.clone()]);
        // Re-adding the same version appends only the new constraint.
        graph.add_package_version("app", v("1.0"), vec![b.clone(), c.clone(), a.clone()]);

        let versions = graph.versions("app").unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].1, vec![a, b, c]);
    }

    #[test]
    fn test_graph_merge_equivalent_version_spellings() {
        let mut graph = DepGraph::new();
        graph.add_package_version("app", v("0.1"), vec![]);
        graph.add_package_version("app", v("0.1.0"), vec![Constraint::any("dep")]);

        let versions = graph.versions("app").unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].1.len(), 1);
    }

    #[test]
    fn test_graph_order_independent() {
        let entry = |name: &str| {
            (
                name.to_string(),
                vec![(v("1.0"), vec![]), (v("2.0"), vec![])],
            )
        };

        let mut forward = DepGraph::new();
        forward.add_packages(vec![entry("alpha"), entry("beta"), entry("gamma")]);

        let mut backward = DepGraph::new();
        backward.add_packages(vec![entry("gamma"), entry("beta"), entry("alpha")]);

        assert_eq!(forward, backward);
        let names: Vec<&str> = forward.packages().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_placeholder_has_no_versions() {
        let mut graph = DepGraph::new();
        graph.add_placeholder("ghost");
        assert!(graph.contains_package("ghost"));
        assert_eq!(graph.versions("ghost").unwrap().len(), 0);
    }
}
