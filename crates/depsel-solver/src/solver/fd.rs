//! Built-in finite-domain solver session.
//!
//! A small, deterministic branch-and-bound search over package variables.
//! Packages are decided in index order; candidate values are tried
//! ascending (the posted preference first), with *disabled* as the last
//! resort. The first zero-disabled assignment wins; otherwise the search
//! minimizes the number of disabled packages and reports the optimum as an
//! invalid solution. Dependency clauses only fire once the source package
//! is decided to the clause's exact version, so a package is never dragged
//! into the solution by bounds reasoning alone.

use std::time::Instant;

use log::debug;

use super::session::{Assignment, Outcome, SolverSession};

#[derive(Debug, Clone, Copy)]
struct Var {
    min: i32,
    max: i32,
    preferred: i32,
    required: bool,
}

#[derive(Debug, Clone, Copy)]
struct Clause {
    package: usize,
    version: i32,
    dep: usize,
    min: i32,
    max: i32,
}

#[derive(Debug, Default)]
struct Problem {
    label: String,
    vars: Vec<Var>,
    clauses: Vec<Clause>,
}

/// The built-in [`SolverSession`] implementation.
#[derive(Debug, Default)]
pub struct FdSession {
    problem: Option<Problem>,
}

impl FdSession {
    pub fn new() -> Self {
        FdSession::default()
    }
}

impl SolverSession for FdSession {
    fn new_problem(&mut self, label: &str, package_count: usize) {
        self.problem = Some(Problem {
            label: label.to_string(),
            vars: Vec::with_capacity(package_count),
            clauses: Vec::new(),
        });
    }

    fn add_package(&mut self, min: i32, max: i32, preferred: i32) -> usize {
        let problem = self.problem.get_or_insert_with(Problem::default);
        problem.vars.push(Var {
            min,
            max,
            preferred,
            required: false,
        });
        problem.vars.len() - 1
    }

    fn mark_package_required(&mut self, package: usize) {
        if let Some(problem) = self.problem.as_mut() {
            if let Some(var) = problem.vars.get_mut(package) {
                var.required = true;
            }
        }
    }

    fn add_version_constraint(
        &mut self,
        package: usize,
        version: i32,
        dep_package: usize,
        min: i32,
        max: i32,
    ) {
        if let Some(problem) = self.problem.as_mut() {
            problem.clauses.push(Clause {
                package,
                version,
                dep: dep_package,
                min,
                max,
            });
        }
    }

    fn solve(&mut self, deadline: Option<Instant>) -> Outcome {
        let Some(problem) = self.problem.take() else {
            return Outcome::Unsolvable;
        };

        let mut search = Search::new(&problem, deadline);
        search.run();

        if search.timed_out {
            debug!("search for {:?} hit its deadline", problem.label);
            return Outcome::Timeout;
        }

        match search.best {
            None => Outcome::Unsolvable,
            Some((disabled, values)) => {
                debug!(
                    "search for {:?} finished with {} disabled packages",
                    problem.label, disabled
                );
                let assignments = values
                    .iter()
                    .enumerate()
                    .map(|(package, value)| match value {
                        Value::Version(id) => Assignment {
                            package,
                            version: *id,
                            disabled: false,
                        },
                        Value::Unused => Assignment {
                            package,
                            version: -1,
                            disabled: false,
                        },
                        _ => Assignment {
                            package,
                            version: -1,
                            disabled: true,
                        },
                    })
                    .collect();
                Outcome::Solved {
                    valid: disabled == 0,
                    disabled,
                    assignments,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    Unassigned,
    Unused,
    Version(i32),
    Disabled,
}

struct Search<'a> {
    problem: &'a Problem,
    /// Clause ids indexed by source package.
    from: Vec<Vec<usize>>,
    /// Clause ids indexed by dependency package.
    to: Vec<Vec<usize>>,
    values: Vec<Value>,
    best: Option<(usize, Vec<Value>)>,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(problem: &'a Problem, deadline: Option<Instant>) -> Self {
        let count = problem.vars.len();
        let mut from = vec![Vec::new(); count];
        let mut to = vec![Vec::new(); count];
        for (id, clause) in problem.clauses.iter().enumerate() {
            if clause.package < count && clause.dep < count {
                from[clause.package].push(id);
                to[clause.dep].push(id);
            }
        }
        Search {
            problem,
            from,
            to,
            values: vec![Value::Unassigned; count],
            best: None,
            deadline,
            timed_out: false,
        }
    }

    fn run(&mut self) {
        self.descend(0, 0);
        if self.timed_out {
            self.best = None;
        }
    }

    /// Depth-first assignment of package `index`. Returns true when the
    /// search should stop (optimum found or deadline hit).
    fn descend(&mut self, index: usize, disabled: usize) -> bool {
        if self.deadline_hit() {
            return true;
        }
        if index == self.problem.vars.len() {
            let stop = disabled == 0;
            self.best = Some((disabled, self.values.clone()));
            return stop;
        }

        for value in self.candidates(index) {
            let cost = usize::from(value == Value::Disabled);
            if let Some((best, _)) = &self.best {
                if disabled + cost >= *best {
                    continue;
                }
            }
            if !self.consistent(index, value) {
                continue;
            }
            self.values[index] = value;
            let stop = self.descend(index + 1, disabled + cost);
            self.values[index] = Value::Unassigned;
            if stop {
                return true;
            }
        }
        false
    }

    fn candidates(&self, index: usize) -> Vec<Value> {
        let var = self.problem.vars[index];
        let mut out = Vec::with_capacity((var.max - var.min).max(0) as usize + 2);

        let push = |id: i32, out: &mut Vec<Value>| {
            if id < var.min || id > var.max {
                return;
            }
            if id < 0 {
                if !var.required {
                    out.push(Value::Unused);
                }
            } else {
                out.push(Value::Version(id));
            }
        };

        push(var.preferred, &mut out);
        for id in var.min..=var.max {
            if id != var.preferred {
                push(id, &mut out);
            }
        }
        if !var.required {
            out.push(Value::Disabled);
        }
        out
    }

    /// Check every clause decidable under `values` with `index := value`.
    /// Clauses whose other end is still unassigned are rechecked when that
    /// end is assigned, so a full assignment is fully checked.
    fn consistent(&self, index: usize, value: Value) -> bool {
        if let Value::Version(version) = value {
            for &id in &self.from[index] {
                let clause = self.problem.clauses[id];
                if clause.version != version {
                    continue;
                }
                let dep_value = if clause.dep == index {
                    value
                } else {
                    self.values[clause.dep]
                };
                match dep_value {
                    Value::Disabled | Value::Unassigned => {}
                    Value::Unused => return false,
                    Value::Version(dep_version) => {
                        if dep_version < clause.min || dep_version > clause.max {
                            return false;
                        }
                    }
                }
            }
        }

        if value != Value::Disabled {
            for &id in &self.to[index] {
                let clause = self.problem.clauses[id];
                if clause.package == index {
                    continue;
                }
                if self.values[clause.package] != Value::Version(clause.version) {
                    continue;
                }
                match value {
                    Value::Unused => return false,
                    Value::Version(version) => {
                        if version < clause.min || version > clause.max {
                            return false;
                        }
                    }
                    _ => {}
                }
            }
        }

        true
    }

    fn deadline_hit(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.timed_out = true;
                return true;
            }
        }
        false
    }
}
