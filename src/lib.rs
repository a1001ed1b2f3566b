// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod durations;
pub mod errors;
pub mod logging;
pub mod provider;
pub mod report;
pub mod workflow;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_or_default};
use crate::config::model::ConfigFile;
use crate::dag::{CriticalPathResult, DependencyGraph, compute_critical_path};
use crate::durations::{RawSamples, WeightTable, aggregate};
use crate::errors::CritpathError;
use crate::provider::{GitHubActionsSource, HistorySource, SampleFileSource};

/// Weights derived from the samples, and the critical path they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub weights: WeightTable,
    pub result: CriticalPathResult,
}

/// Aggregate `samples` and compute the critical path of `graph`.
pub fn analyze(graph: &DependencyGraph, samples: &RawSamples) -> errors::Result<Analysis> {
    let weights = aggregate(samples);
    let result = compute_critical_path(graph, &weights)?;
    Ok(Analysis { weights, result })
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - workflow parsing and sample collection (concurrently)
/// - aggregation and the critical path computation
/// - report output
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit_config = args.config.as_deref().map(Path::new);
    let cfg = load_or_default(explicit_config).with_context(|| {
        let shown = explicit_config.map_or_else(default_config_path, Path::to_path_buf);
        format!("loading config from {:?}", shown)
    })?;
    let workflow_path = resolve_workflow_path(&args, &cfg)?;

    if args.dry_run {
        let graph = workflow::load_dependency_graph(&workflow_path)?;
        print!("{}", report::render_graph(&graph));
        debug!("dry-run complete (nothing fetched)");
        return Ok(());
    }

    let source = history_source(&args, &cfg)?;

    // Parsing the workflow and fetching history are independent.
    let graph_task =
        tokio::task::spawn_blocking(move || workflow::load_dependency_graph(&workflow_path));
    let (graph, samples) = tokio::join!(graph_task, source.fetch_samples());
    let graph = graph.context("workflow parsing task panicked")??;
    let samples = samples?;

    info!(
        jobs = graph.len(),
        edges = graph.edge_count(),
        sampled_jobs = samples.len(),
        "inputs ready"
    );

    if let Some(path) = &args.save_samples {
        let json = serde_json::to_string_pretty(&samples)?;
        std::fs::write(path, json).with_context(|| format!("writing samples to {:?}", path))?;
        info!(path = %path, "saved raw samples");
    }

    let analysis = analyze(&graph, &samples)?;

    if args.json {
        println!("{}", report::render_json(&analysis.result)?);
    } else {
        print!("{}", report::render_text(&graph, &samples, &analysis));
    }

    Ok(())
}

/// `--workflow-file` wins over `[pipeline].workflow_file`.
fn resolve_workflow_path(args: &CliArgs, cfg: &ConfigFile) -> Result<PathBuf> {
    args.workflow_file
        .as_ref()
        .or(cfg.pipeline.workflow_file.as_ref())
        .map(PathBuf::from)
        .ok_or_else(|| {
            CritpathError::ConfigError(
                "no workflow file: pass --workflow-file or set [pipeline].workflow_file".to_string(),
            )
            .into()
        })
}

/// `--samples` selects the file source; otherwise `[github]` is required.
fn history_source(args: &CliArgs, cfg: &ConfigFile) -> Result<Box<dyn HistorySource>> {
    if let Some(path) = &args.samples {
        return Ok(Box::new(SampleFileSource::new(path)));
    }

    let github = cfg.github.as_ref().ok_or_else(|| {
        CritpathError::ConfigError(
            "no [github] section in config and no --samples file given".to_string(),
        )
    })?;
    Ok(Box::new(GitHubActionsSource::from_settings(github)?))
}
