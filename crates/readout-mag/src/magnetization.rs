//! Net magnetization aggregation over measured bitstring histograms.
//!
//! Each bitstring contributes `ones(b) - zeros(b) = 2 * popcount(b) - L`
//! weighted by its shot count; the aggregate is the count-weighted mean. All
//! accumulation is exact integer arithmetic, so the only rounding in the
//! whole pipeline is the final division.

use rayon::prelude::*;

use crate::histogram::CountsHistogram;

/// Exact partial aggregate of magnetization over a subset of histogram keys.
///
/// Merging partials is associative and commutative with no rounding, so a
/// histogram may be split into shards in any way and reduced in any order
/// without changing the final mean by even one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagnetizationPartial {
    /// Count-weighted sum of per-key magnetizations.
    pub weighted: i128,
    /// Total number of shots folded in.
    pub total: u128,
}

impl MagnetizationPartial {
    /// Folds `count` shots of an encoded key into the aggregate.
    pub fn observe(&mut self, key: u64, count: u64, bit_length: u32) {
        let magnetization = 2 * i128::from(key.count_ones()) - i128::from(bit_length);
        self.weighted += magnetization * i128::from(count);
        self.total += u128::from(count);
    }

    /// Absorbs another partial into this one.
    pub fn merge(&mut self, other: &MagnetizationPartial) {
        self.weighted += other.weighted;
        self.total += other.total;
    }

    /// Finalises the count-weighted mean magnetization.
    ///
    /// An aggregate with no shots reads 0.0 rather than erroring; an empty
    /// histogram is an ordinary input.
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.weighted as f64 / self.total as f64
    }
}

/// Computes the count-weighted mean magnetization in one sequential pass.
///
/// Cost is one popcount per distinct key, independent of the key space size.
pub fn total_magnetization(histogram: &CountsHistogram) -> f64 {
    let bit_length = histogram.bit_length();
    let mut partial = MagnetizationPartial::default();
    for (&key, &count) in histogram.counts() {
        partial.observe(key, count, bit_length);
    }
    partial.mean()
}

/// Computes the mean magnetization by reducing per-shard partials in
/// parallel.
///
/// The result is bit-exact equal to [`total_magnetization`] for every input:
/// shard partials are integers and the single f64 rounding happens in the
/// final division, so the split chosen by the scheduler can never show
/// through.
pub fn sharded_magnetization(histogram: &CountsHistogram) -> f64 {
    let bit_length = histogram.bit_length();
    histogram
        .counts()
        .par_iter()
        .fold(
            MagnetizationPartial::default,
            |mut partial, (&key, &count)| {
                partial.observe(key, count, bit_length);
                partial
            },
        )
        .reduce(MagnetizationPartial::default, |mut acc, other| {
            acc.merge(&other);
            acc
        })
        .mean()
}
