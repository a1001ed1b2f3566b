// src/provider/file.rs

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::Context;
use tracing::info;

use crate::durations::RawSamples;
use crate::errors::Result;
use crate::provider::HistorySource;

/// Parse samples from JSON of the form `{"job": [12, 0, 15]}`.
pub fn parse_samples_str(src: &str) -> Result<RawSamples> {
    Ok(serde_json::from_str(src)?)
}

/// Samples captured earlier, e.g. by a previous run with `--save-samples`.
#[derive(Debug, Clone)]
pub struct SampleFileSource {
    path: PathBuf,
}

impl SampleFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for SampleFileSource {
    fn fetch_samples(&self) -> Pin<Box<dyn Future<Output = Result<RawSamples>> + Send + '_>> {
        Box::pin(async move {
            let contents = tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("reading samples file at {:?}", self.path))?;
            let samples = parse_samples_str(&contents)?;
            info!(path = ?self.path, jobs = samples.len(), "loaded duration samples from file");
            Ok(samples)
        })
    }
}
