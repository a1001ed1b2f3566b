// src/report.rs

//! Human-readable and JSON renderings of an analysis.

use std::fmt::Write;

use crate::Analysis;
use crate::dag::{CriticalPathResult, DependencyGraph};
use crate::durations::{RawSamples, valid_sample_count};
use crate::errors::Result;

/// `3723` → `"1h 02m 03s"`, `75` → `"1m 15s"`, `9` → `"9s"`.
pub fn format_secs(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s:02}s"),
        _ => format!("{h}h {m:02}m {s:02}s"),
    }
}

pub fn render_json(result: &CriticalPathResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Full text report: the critical path, then every job's samples and weight.
pub fn render_text(graph: &DependencyGraph, samples: &RawSamples, analysis: &Analysis) -> String {
    let mut out = String::new();
    let result = &analysis.result;

    let _ = writeln!(
        out,
        "critical path: {} ({}s)",
        format_secs(result.longest_runtime),
        result.longest_runtime
    );
    let width = name_width(graph.jobs());
    for (i, job) in result.longest_path.iter().enumerate() {
        let weight = analysis.weights.get(job).copied().unwrap_or(0);
        let _ = writeln!(out, "  {:>2}. {job:<width$}  {}", i + 1, format_secs(weight));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "jobs ({}):", graph.len());
    for job in graph.jobs() {
        let job_samples = samples.get(job).map(Vec::as_slice).unwrap_or(&[]);
        let weight = analysis.weights.get(job).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "  {job:<width$}  weight {:>9}  samples {:>3} ({} valid)",
            format_secs(weight),
            job_samples.len(),
            valid_sample_count(job_samples)
        );
    }

    let undeclared: Vec<&str> = graph.undeclared().collect();
    if !undeclared.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "referenced but not declared: {}", undeclared.join(", "));
    }

    let unmatched: Vec<&str> = samples
        .keys()
        .map(String::as_str)
        .filter(|job| !graph.contains(job))
        .collect();
    if !unmatched.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "samples for jobs not in the workflow: {}", unmatched.join(", "));
    }

    out
}

/// Dry-run output: every job with its dependencies and dependents.
pub fn render_graph(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "critpath dry-run");
    let _ = writeln!(out, "jobs ({}), edges ({}):", graph.len(), graph.edge_count());

    for job in graph.jobs() {
        let marker = if graph.is_declared(job) { "" } else { " (undeclared)" };
        let _ = writeln!(out, "  - {job}{marker}");

        let deps = graph.dependencies_of(job);
        if !deps.is_empty() {
            let _ = writeln!(out, "      needs: {}", deps.join(", "));
        }
        let dependents = graph.dependents_of(job);
        if !dependents.is_empty() {
            let _ = writeln!(out, "      needed by: {}", dependents.join(", "));
        }
    }

    for cycle in graph.find_cycles() {
        let _ = writeln!(out, "  cycle: {}", cycle.join(" -> "));
    }

    out
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(0)
}
