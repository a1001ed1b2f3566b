// src/dag/mod.rs

//! Job dependency graph and critical path computation.
//!
//! - [`graph`] holds the dependency graph with its "dependencies-of" and
//!   "dependents-of" views.
//! - [`critical_path`] walks that graph in topological order to find the
//!   longest weighted chain of jobs.

pub mod critical_path;
pub mod graph;

pub use critical_path::{CriticalPathResult, compute_critical_path};
pub use graph::{DependencyGraph, Needs};
