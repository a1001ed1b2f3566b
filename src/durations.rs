// src/durations.rs

//! Aggregation of historical job timings into per-job weights.
//!
//! A recorded duration of `0` means the provider had no real measurement
//! (skipped or cached job, or sub-second timestamp granularity). Those
//! samples are dropped before averaging so they cannot pull a job's weight
//! towards zero.

use std::collections::BTreeMap;

use tracing::debug;

/// Raw per-job duration samples in whole seconds, in no particular order.
pub type RawSamples = BTreeMap<String, Vec<u64>>;

/// One representative duration per job, in whole seconds.
pub type WeightTable = BTreeMap<String, u64>;

/// Floor average of the non-zero samples, or `0` when there are none.
pub fn representative_duration(samples: &[u64]) -> u64 {
    let (sum, count) = samples
        .iter()
        .filter(|&&s| s != 0)
        .fold((0u128, 0u128), |(sum, count), &s| (sum + u128::from(s), count + 1));

    if count == 0 {
        return 0;
    }
    // The mean of u64 values always fits in a u64.
    (sum / count) as u64
}

/// Number of samples that count towards a job's weight.
pub fn valid_sample_count(samples: &[u64]) -> usize {
    samples.iter().filter(|&&s| s != 0).count()
}

/// Reduce every job's samples to a single weight.
pub fn aggregate(samples: &RawSamples) -> WeightTable {
    samples
        .iter()
        .map(|(job, durations)| {
            let weight = representative_duration(durations);
            debug!(
                job = %job,
                samples = durations.len(),
                valid = valid_sample_count(durations),
                weight,
                "aggregated job duration"
            );
            (job.clone(), weight)
        })
        .collect()
}
