//! Interchange formats for histograms.
//!
//! Two JSON layouts circulate: the wrapped record
//! `{"bitstring_size": L, "counts": {"0101": 3, ...}}` and the older bare
//! counts map. Ingest accepts both; export always writes the wrapped form
//! with zero-padded keys. The binary envelope is bincode over the JSON
//! string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use readout_core::errors::{ErrorInfo, ReadoutError};

use crate::histogram::CountsHistogram;

#[derive(Debug, Serialize, Deserialize)]
struct WrappedHistogram {
    bitstring_size: u32,
    counts: BTreeMap<String, u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistogramWire {
    Wrapped(WrappedHistogram),
    Bare(BTreeMap<String, u64>),
}

/// Serializes a histogram to the wrapped JSON layout.
pub fn to_json(histogram: &CountsHistogram) -> Result<String, ReadoutError> {
    let counts = histogram
        .counts()
        .iter()
        .map(|(&key, &count)| (histogram.key_string(key), count))
        .collect();
    let payload = WrappedHistogram {
        bitstring_size: histogram.bit_length(),
        counts,
    };
    serde_json::to_string_pretty(&payload)
        .map_err(|err| ReadoutError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
}

/// Restores a histogram from either JSON layout.
///
/// A bare map infers the bitstring length from its first key and validates
/// every other key against it. An empty bare map produces the degenerate
/// zero-length histogram.
pub fn from_json(data: &str) -> Result<CountsHistogram, ReadoutError> {
    let wire: HistogramWire = serde_json::from_str(data)
        .map_err(|err| ReadoutError::Serde(ErrorInfo::new("json-deserialize", err.to_string())))?;
    match wire {
        HistogramWire::Wrapped(wrapped) => build(wrapped.bitstring_size, &wrapped.counts),
        HistogramWire::Bare(counts) => {
            let bit_length = counts
                .keys()
                .next()
                .map_or(0, |key| u32::try_from(key.chars().count()).unwrap_or(u32::MAX));
            build(bit_length, &counts)
        }
    }
}

/// Serializes a histogram into a binary blob.
pub fn to_bytes(histogram: &CountsHistogram) -> Result<Vec<u8>, ReadoutError> {
    let json = to_json(histogram)?;
    bincode::serialize(&json)
        .map_err(|err| ReadoutError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

/// Rehydrates a histogram from a binary blob.
pub fn from_bytes(bytes: &[u8]) -> Result<CountsHistogram, ReadoutError> {
    let json: String = bincode::deserialize(bytes)
        .map_err(|err| ReadoutError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string())))?;
    from_json(&json)
}

fn build(bit_length: u32, counts: &BTreeMap<String, u64>) -> Result<CountsHistogram, ReadoutError> {
    let mut histogram = CountsHistogram::new(bit_length)?;
    for (bitstring, &count) in counts {
        histogram.record(bitstring, count)?;
    }
    Ok(histogram)
}
