#![allow(dead_code)]

use critpath::dag::{DependencyGraph, Needs};
use critpath::durations::{RawSamples, WeightTable};

/// Builder for `DependencyGraph` to simplify test setup.
///
/// Jobs are declared in call order.
#[derive(Default)]
pub struct GraphBuilder {
    declarations: Vec<(String, Needs)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with a list of needs (an empty slice still yields
    /// `Needs::Many(vec![])`).
    pub fn job(mut self, name: &str, needs: &[&str]) -> Self {
        let needs = needs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        self.declarations.push((name.to_string(), Needs::Many(needs)));
        self
    }

    /// Declare `name` with a single scalar `needs`.
    pub fn job_needing_one(mut self, name: &str, dep: &str) -> Self {
        self.declarations.push((name.to_string(), Needs::from(dep)));
        self
    }

    /// Declare `name` with no `needs` field at all.
    pub fn leaf(mut self, name: &str) -> Self {
        self.declarations.push((name.to_string(), Needs::Absent));
        self
    }

    pub fn declarations(&self) -> &[(String, Needs)] {
        &self.declarations
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph::from_declarations(self.declarations)
    }
}

/// Builder for `RawSamples`.
#[derive(Default)]
pub struct SamplesBuilder {
    samples: RawSamples,
}

impl SamplesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(mut self, name: &str, durations: &[u64]) -> Self {
        self.samples
            .entry(name.to_string())
            .or_default()
            .extend_from_slice(durations);
        self
    }

    pub fn build(self) -> RawSamples {
        self.samples
    }
}

/// Shorthand for a `WeightTable` literal.
pub fn weights(entries: &[(&str, u64)]) -> WeightTable {
    entries
        .iter()
        .map(|(name, w)| (name.to_string(), *w))
        .collect()
}
