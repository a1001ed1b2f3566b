use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use critpath::durations::RawSamples;
use critpath::errors::{CritpathError, Result};
use critpath::provider::HistorySource;

/// A fake history source that:
/// - counts how often it was asked for samples
/// - returns a fixed sample set, or a provider error when built with `failing`.
pub struct FakeHistorySource {
    samples: Option<RawSamples>,
    calls: Arc<AtomicUsize>,
}

impl FakeHistorySource {
    pub fn new(samples: RawSamples) -> Self {
        Self {
            samples: Some(samples),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            samples: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HistorySource for FakeHistorySource {
    fn fetch_samples(&self) -> Pin<Box<dyn Future<Output = Result<RawSamples>> + Send + '_>> {
        let calls = Arc::clone(&self.calls);
        let samples = self.samples.clone();

        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            samples.ok_or_else(|| CritpathError::Provider("fake provider failure".to_string()))
        })
    }
}
