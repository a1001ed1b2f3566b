// src/provider/mod.rs

//! Sources of historical job durations.
//!
//! - [`github`] pulls timings from the GitHub Actions REST API.
//! - [`file`] reads previously captured samples from a JSON file.
//!
//! Both implement [`HistorySource`], which is all the rest of the crate
//! depends on.

pub mod file;
pub mod github;

use std::future::Future;
use std::pin::Pin;

use crate::durations::RawSamples;
use crate::errors::Result;

pub use file::SampleFileSource;
pub use github::GitHubActionsSource;

/// A source of raw per-job duration samples.
pub trait HistorySource: Send + Sync {
    /// Gather every available sample, keyed by job name.
    fn fetch_samples(&self) -> Pin<Box<dyn Future<Output = Result<RawSamples>> + Send + '_>>;
}
