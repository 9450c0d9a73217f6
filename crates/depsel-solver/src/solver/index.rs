//! Bidirectional mapping between symbolic packages and numeric ids

use depsel_semver::Version;
use indexmap::IndexMap;

use crate::graph::{Constraint, DepGraph};

/// Internal name of the synthetic run-list package at index 0. Not
/// addressable through [`PackageIndex::index_of`], so a user package can
/// never collide with it.
pub(crate) const RUN_LIST: &str = "$run_list";

/// Numeric ids for one solve: package indices are assigned in graph
/// iteration order starting at 1 (0 is the run-list package), version ids
/// in the stored order of each package's version list. Both assignments are
/// stable for a fixed input, which makes the solver's lower-index
/// preference deterministic.
pub(crate) struct PackageIndex {
    names: Vec<String>,
    by_name: IndexMap<String, usize>,
    versions: Vec<Vec<Version>>,
}

impl PackageIndex {
    pub(crate) fn build(graph: &DepGraph) -> Self {
        let mut names = vec![RUN_LIST.to_string()];
        let mut by_name = IndexMap::with_capacity(graph.package_count());
        let mut versions = vec![vec![Version::new(0, 0, 0)]];

        for (name, entries) in graph.packages() {
            by_name.insert(name.to_string(), names.len());
            names.push(name.to_string());
            versions.push(entries.iter().map(|(version, _)| version.clone()).collect());
        }

        PackageIndex {
            names,
            by_name,
            versions,
        }
    }

    /// Total number of packages, the synthetic run-list one included.
    pub(crate) fn package_count(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn name_of(&self, package: usize) -> &str {
        &self.names[package]
    }

    /// Number of real versions of a package (0 for placeholders).
    pub(crate) fn version_count(&self, package: usize) -> usize {
        self.versions[package].len()
    }

    fn version_of(&self, package: usize, version_id: i32) -> Option<&Version> {
        if version_id < 0 {
            return None;
        }
        self.versions[package].get(version_id as usize)
    }

    /// The inclusive version-id range matching a constraint, or `None` when
    /// the constrained package is absent from the problem. No matching
    /// version yields the empty range `(0, -1)`, which no id satisfies.
    pub(crate) fn constraint_range(&self, constraint: &Constraint) -> Option<(usize, (i32, i32))> {
        let package = self.index_of(&constraint.package)?;
        let mut min = i32::MAX;
        let mut max = -1;
        for (id, version) in self.versions[package].iter().enumerate() {
            if constraint.req.matches(version) {
                min = min.min(id as i32);
                max = max.max(id as i32);
            }
        }
        if max < 0 {
            Some((package, (0, -1)))
        } else {
            Some((package, (min, max)))
        }
    }

    /// Map a numeric assignment back to its symbolic form. Negative version
    /// ids have no real version and map to `None`.
    pub(crate) fn unmap(&self, package: usize, version_id: i32) -> (String, Option<Version>) {
        (
            self.name_of(package).to_string(),
            self.version_of(package, version_id).cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsel_semver::Operator;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn graph() -> DepGraph {
        let mut graph = DepGraph::new();
        graph.add_package("app1", vec![(v("0.1"), vec![]), (v("0.2"), vec![])]);
        graph.add_package(
            "app3",
            vec![(v("0.1"), vec![]), (v("0.2"), vec![]), (v("0.3"), vec![])],
        );
        graph.add_placeholder("ghost");
        graph
    }

    #[test]
    fn test_index_assignment_follows_graph_order() {
        let index = PackageIndex::build(&graph());

        assert_eq!(index.package_count(), 4);
        assert_eq!(index.name_of(0), RUN_LIST);
        assert_eq!(index.index_of("app1"), Some(1));
        assert_eq!(index.index_of("app3"), Some(2));
        assert_eq!(index.index_of("ghost"), Some(3));
        assert_eq!(index.index_of(RUN_LIST), None);
        assert_eq!(index.version_count(1), 2);
        assert_eq!(index.version_count(3), 0);
    }

    #[test]
    fn test_constraint_range() {
        let index = PackageIndex::build(&graph());

        let (package, range) = index
            .constraint_range(&Constraint::new(
                "app3",
                Operator::GreaterThanOrEqual,
                v("0.2"),
            ))
            .unwrap();
        assert_eq!(package, 2);
        assert_eq!(range, (1, 2));

        let (_, range) = index
            .constraint_range(&Constraint::exact("app1", v("0.2")))
            .unwrap();
        assert_eq!(range, (1, 1));

        let (_, range) = index.constraint_range(&Constraint::any("app1")).unwrap();
        assert_eq!(range, (0, 1));
    }

    #[test]
    fn test_empty_range_when_no_version_matches() {
        let index = PackageIndex::build(&graph());
        let (_, (min, max)) = index
            .constraint_range(&Constraint::exact("app1", v("2.0")))
            .unwrap();
        assert!(min > max);

        // Placeholder packages match nothing either.
        let (_, (min, max)) = index
            .constraint_range(&Constraint::any("ghost"))
            .unwrap();
        assert!(min > max);
    }

    #[test]
    fn test_unknown_package_has_no_range() {
        let index = PackageIndex::build(&graph());
        assert!(index
            .constraint_range(&Constraint::any("missing"))
            .is_none());
    }

    #[test]
    fn test_unmap() {
        let index = PackageIndex::build(&graph());
        assert_eq!(index.unmap(2, 2), ("app3".to_string(), Some(v("0.3"))));
        assert_eq!(index.unmap(3, -1), ("ghost".to_string(), None));
    }
}
