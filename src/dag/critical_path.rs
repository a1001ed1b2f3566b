// src/dag/critical_path.rs

//! Longest weighted path through a [`DependencyGraph`].
//!
//! The traversal is Kahn's algorithm seeded with the jobs nothing depends
//! on. From each dequeued job it walks the job's own `needs`, relaxing the
//! cumulative finish time of every dependency:
//!
//! ```text
//! finish[dep] = max(finish[dep], finish[job] + weight[dep])
//! ```
//!
//! A job is dequeued only after every job depending on it has been
//! processed, so its finish time and path are final at that point.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::dag::graph::DependencyGraph;
use crate::durations::WeightTable;
use crate::errors::{CritpathError, Result};

/// The critical path of a pipeline and its total duration in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CriticalPathResult {
    pub longest_runtime: u64,
    /// Job names along the path, starting from the job nothing depends on.
    /// Empty iff the graph is empty.
    pub longest_path: Vec<String>,
}

/// Best finish time found so far for one reached job.
#[derive(Debug, Clone, Copy)]
struct FinishEntry<'g> {
    job: &'g str,
    finish: u64,
    /// Index of the entry this job was reached from (`None` for seeds).
    via: Option<usize>,
}

/// Per-computation scratch space. Entries keep first-reached order, which
/// is also the tie-break order for the final maximum.
#[derive(Debug, Default)]
struct FinishState<'g> {
    index: HashMap<&'g str, usize>,
    entries: Vec<FinishEntry<'g>>,
}

impl<'g> FinishState<'g> {
    fn seed(&mut self, job: &'g str, finish: u64) {
        self.index.insert(job, self.entries.len());
        self.entries.push(FinishEntry {
            job,
            finish,
            via: None,
        });
    }

    /// Offer `finish` reached via entry `from`. The first offer always wins;
    /// later offers must be strictly greater.
    fn relax(&mut self, job: &'g str, finish: u64, from: usize) -> bool {
        match self.index.get(job) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                if finish > entry.finish {
                    entry.finish = finish;
                    entry.via = Some(from);
                    true
                } else {
                    false
                }
            }
            None => {
                self.index.insert(job, self.entries.len());
                self.entries.push(FinishEntry {
                    job,
                    finish,
                    via: Some(from),
                });
                true
            }
        }
    }

    fn finish_of(&self, job: &str) -> Option<(usize, u64)> {
        self.index.get(job).map(|&i| (i, self.entries[i].finish))
    }

    /// First entry attaining the maximum finish time.
    fn best(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            match best {
                Some(b) if self.entries[b].finish >= entry.finish => {}
                _ => best = Some(i),
            }
        }
        best
    }

    fn path_to(&self, mut i: usize) -> Vec<String> {
        let mut path = vec![self.entries[i].job.to_string()];
        while let Some(prev) = self.entries[i].via {
            path.push(self.entries[prev].job.to_string());
            i = prev;
        }
        path.reverse();
        path
    }
}

/// Compute the critical path of `graph` weighted by `weights`.
///
/// Jobs missing from `weights` weigh 0. Returns
/// [`CritpathError::CyclicGraph`] when some jobs can never be reached
/// because they sit on, or behind, a dependency cycle.
pub fn compute_critical_path(
    graph: &DependencyGraph,
    weights: &WeightTable,
) -> Result<CriticalPathResult> {
    let weight_of = |job: &str| weights.get(job).copied().unwrap_or(0);

    let mut in_degree: HashMap<&str, usize> = graph
        .jobs()
        .map(|job| (job, graph.in_degree(job)))
        .collect();

    let mut state = FinishState::default();
    let mut queue: VecDeque<&str> = VecDeque::new();

    for job in graph.jobs() {
        if in_degree[job] == 0 {
            state.seed(job, weight_of(job));
            queue.push_back(job);
        }
    }
    debug!(seeds = ?queue, jobs = graph.len(), "critical path: seeded traversal");

    while let Some(job) = queue.pop_front() {
        let Some((from, finish)) = state.finish_of(job) else {
            continue;
        };

        for dep in graph.dependencies_of(job) {
            let dep = dep.as_str();
            let candidate = finish.saturating_add(weight_of(dep));
            if state.relax(dep, candidate, from) {
                trace!(job, dep, finish = candidate, "critical path: relaxed");
            }

            if let Some(remaining) = in_degree.get_mut(dep) {
                *remaining -= 1;
                if *remaining == 0 {
                    queue.push_back(dep);
                }
            }
        }
    }

    let unresolved: Vec<String> = graph
        .jobs()
        .filter(|job| in_degree[job] > 0)
        .map(|s| s.to_string())
        .collect();
    if !unresolved.is_empty() {
        let cycles = graph.find_cycles();
        warn!(?unresolved, ?cycles, "critical path: dependency cycle detected");
        return Err(CritpathError::CyclicGraph { unresolved, cycles });
    }

    let result = match state.best() {
        Some(i) => CriticalPathResult {
            longest_runtime: state.entries[i].finish,
            longest_path: state.path_to(i),
        },
        None => CriticalPathResult::default(),
    };

    debug!(
        runtime = result.longest_runtime,
        path = ?result.longest_path,
        "critical path: computed"
    );
    Ok(result)
}
