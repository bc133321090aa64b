//! Deterministic random histogram generation.

use std::collections::BTreeSet;

use rand::Rng;

use readout_core::errors::{ErrorInfo, ReadoutError};
use readout_core::rng::RngHandle;

use crate::histogram::{CountsHistogram, MAX_BIT_LENGTH};

/// Samples a histogram over bitstrings of the given length.
///
/// Up to `distinct_keys` distinct keys are drawn below `2^bit_length`, each
/// with a count uniform in `[1, max_count]`. When `distinct_keys` covers the
/// whole key space the support is the full enumeration, matching the dense
/// workloads the throughput harness runs.
pub fn random_histogram(
    bit_length: u32,
    distinct_keys: usize,
    max_count: u64,
    rng: &mut RngHandle,
) -> Result<CountsHistogram, ReadoutError> {
    if bit_length == 0 || bit_length > MAX_BIT_LENGTH {
        return Err(ReadoutError::Generator(
            ErrorInfo::new("histogram-bits", "bitstring length must lie in 1..=64")
                .with_context("bit_length", bit_length.to_string()),
        ));
    }
    if max_count == 0 {
        return Err(ReadoutError::Generator(ErrorInfo::new(
            "max-count",
            "per-key counts are drawn from [1, max_count]",
        )));
    }

    let mask = if bit_length == MAX_BIT_LENGTH {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    };
    let mut histogram = CountsHistogram::new(bit_length)?;

    let capacity = 1u128 << bit_length;
    if distinct_keys as u128 >= capacity {
        for key in 0..=mask {
            histogram.record_key(key, rng.gen_range(1..=max_count))?;
        }
        return Ok(histogram);
    }

    let mut keys = BTreeSet::new();
    while keys.len() < distinct_keys {
        keys.insert(rng.gen::<u64>() & mask);
    }
    for &key in &keys {
        histogram.record_key(key, rng.gen_range(1..=max_count))?;
    }
    Ok(histogram)
}
