// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

/// The `needs` field of a job as declared in a pipeline definition.
///
/// A declaration may name a single job, list several, or be missing
/// entirely. Anything else is coerced to [`Needs::One`] by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Needs {
    #[default]
    Absent,
    One(String),
    Many(Vec<String>),
}

impl Needs {
    /// Normalise to a plain list of dependency names.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Needs::Absent => Vec::new(),
            Needs::One(name) => vec![name],
            Needs::Many(names) => names,
        }
    }
}

impl From<&str> for Needs {
    fn from(name: &str) -> Self {
        Needs::One(name.to_string())
    }
}

impl From<Vec<String>> for Needs {
    fn from(names: Vec<String>) -> Self {
        Needs::Many(names)
    }
}

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Jobs that must complete before this one may start.
    deps: Vec<String>,
    /// Jobs that list this one in their `needs`.
    dependents: Vec<String>,
    /// Whether the job was declared, or only ever referenced as a dependency.
    declared: bool,
}

/// Job dependency graph with explicit "dependencies-of" and
/// "dependents-of" views.
///
/// Every name that appears anywhere in the input is a node, including
/// dependency names that were never declared as jobs. Node order is
/// deterministic: declared jobs in declaration order, followed by
/// undeclared dependency names in order of first reference.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    order: Vec<String>,
    nodes: HashMap<String, DagNode>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(job, needs)` declarations.
    ///
    /// Never fails. Duplicate names inside one job's `needs` are collapsed;
    /// a job declared twice has its dependency lists merged.
    pub fn from_declarations<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (S, Needs)>,
        S: Into<String>,
    {
        let mut graph = Self::new();

        // First pass: declared jobs and their dependency lists.
        for (name, needs) in declarations {
            let name = name.into();
            let node = graph.ensure_node(&name);
            if node.declared {
                warn!(job = %name, "job declared more than once; merging its dependencies");
            }
            node.declared = true;

            for dep in needs.into_vec() {
                if node.deps.contains(&dep) {
                    debug!(job = %name, dep = %dep, "duplicate dependency ignored");
                    continue;
                }
                node.deps.push(dep);
            }
        }

        // Second pass: undeclared dependency names and the dependents view.
        let declared: Vec<String> = graph.order.clone();
        for job in declared {
            let deps = graph.dependencies_of(&job).to_vec();
            for dep in deps {
                if !graph.nodes.contains_key(&dep) {
                    debug!(job = %job, dep = %dep, "dependency is not a declared job; adding as leaf");
                }
                graph.ensure_node(&dep).dependents.push(job.clone());
            }
        }

        graph
    }

    fn ensure_node(&mut self, name: &str) -> &mut DagNode {
        if !self.nodes.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.nodes.entry(name.to_string()).or_default()
    }

    /// All job names, in node order.
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Whether `name` was declared as a job (as opposed to only being
    /// referenced in someone's `needs`).
    pub fn is_declared(&self, name: &str) -> bool {
        self.nodes.get(name).is_some_and(|n| n.declared)
    }

    /// Names referenced as dependencies but never declared, in node order.
    pub fn undeclared(&self) -> impl Iterator<Item = &str> {
        self.jobs().filter(|name| !self.is_declared(name))
    }

    /// Immediate dependencies of a job (the jobs listed in its `needs`).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a job (jobs that list it in their `needs`).
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct jobs that depend on `name`.
    pub fn in_degree(&self, name: &str) -> usize {
        self.dependents_of(name).len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.deps.len()).sum()
    }

    /// Groups of jobs that form dependency cycles.
    ///
    /// Each group is a strongly connected component with more than one job,
    /// or a single job that needs itself. Members are listed in node order.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        // Edge direction: job -> dep.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in self.jobs() {
            graph.add_node(name);
        }
        for name in self.jobs() {
            for dep in self.dependencies_of(name) {
                graph.add_edge(name, dep.as_str(), ());
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let members: HashSet<&str> = scc.into_iter().collect();
                self.jobs()
                    .filter(|name| members.contains(name))
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
            })
            .collect();

        cycles.sort_by_key(|group| self.position(&group[0]));
        cycles
    }

    fn position(&self, name: &str) -> usize {
        self.order
            .iter()
            .position(|n| n == name)
            .unwrap_or(usize::MAX)
    }
}
