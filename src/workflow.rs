// src/workflow.rs

//! Reading job declarations out of a GitHub Actions workflow file.
//!
//! Only `jobs.<name>.needs` is looked at:
//!
//! ```yaml
//! jobs:
//!   lint: {}
//!   build:
//!     needs: lint
//!   deploy:
//!     needs: [build, lint]
//! ```
//!
//! Everything else in the document is ignored.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::dag::{DependencyGraph, Needs};
use crate::errors::Result;

/// Parse workflow YAML into `(job, needs)` declarations, in document order.
///
/// A document without a `jobs` mapping yields no declarations.
pub fn parse_workflow_str(src: &str) -> Result<Vec<(String, Needs)>> {
    let doc: Value = serde_yaml::from_str(src)?;

    let Some(jobs) = doc.get("jobs").and_then(Value::as_mapping) else {
        warn!("workflow has no `jobs` mapping; dependency graph will be empty");
        return Ok(Vec::new());
    };

    let mut declarations = Vec::with_capacity(jobs.len());
    for (key, job) in jobs {
        let Some(name) = scalar_text(key) else {
            warn!(key = ?key, "skipping job with a non-scalar name");
            continue;
        };
        let needs = needs_from_value(&name, job.get("needs"));
        debug!(job = %name, needs = ?needs, "parsed job declaration");
        declarations.push((name, needs));
    }

    Ok(declarations)
}

/// Read and parse a workflow file from disk.
pub fn parse_workflow_file(path: impl AsRef<Path>) -> Result<Vec<(String, Needs)>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading workflow file at {:?}", path))?;
    parse_workflow_str(&contents)
}

/// Convenience: parse a workflow file straight into a [`DependencyGraph`].
pub fn load_dependency_graph(path: impl AsRef<Path>) -> Result<DependencyGraph> {
    let declarations = parse_workflow_file(path)?;
    Ok(DependencyGraph::from_declarations(declarations))
}

/// Normalise a raw `needs` value.
///
/// - missing or `null` → [`Needs::Absent`]
/// - a sequence → [`Needs::Many`] (null entries dropped)
/// - any other value → [`Needs::One`] holding its text
pub fn needs_from_value(job: &str, value: Option<&Value>) -> Needs {
    match value {
        None | Some(Value::Null) => Needs::Absent,
        Some(Value::Sequence(items)) => Needs::Many(
            items
                .iter()
                .filter_map(|item| {
                    let text = scalar_text(item).or_else(|| render(item));
                    if text.is_none() {
                        warn!(job, "ignoring empty entry in `needs`");
                    }
                    text
                })
                .collect(),
        ),
        Some(other) => match scalar_text(other) {
            Some(name) => Needs::One(name),
            None => {
                let text = render(other).unwrap_or_default();
                warn!(job, needs = %text, "`needs` is neither a name nor a list; treating as one name");
                Needs::One(text)
            }
        },
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn render(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    serde_yaml::to_string(value)
        .ok()
        .map(|s| s.trim().to_string())
}
