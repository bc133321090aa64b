//! Validated histograms of measured bitstrings.

use std::collections::BTreeMap;

use readout_core::errors::{ErrorInfo, ReadoutError};

/// Widest bitstring a histogram key can carry.
pub const MAX_BIT_LENGTH: u32 = 64;

/// Histogram of measured bitstrings with a fixed declared key length.
///
/// Keys are stored as integers with the leftmost bitstring character in the
/// most significant position, so a `d = 2` state vector and a histogram key
/// index outcomes identically. Every mutation validates its input eagerly;
/// a histogram that exists is consistent.
///
/// A `bit_length` of 0 is the degenerate value produced by ingesting an empty
/// undeclared-length record. Such a histogram stays empty for its lifetime:
/// every attempt to record into it is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountsHistogram {
    bit_length: u32,
    counts: BTreeMap<u64, u64>,
}

impl CountsHistogram {
    /// Creates an empty histogram for keys of the given length.
    pub fn new(bit_length: u32) -> Result<Self, ReadoutError> {
        if bit_length > MAX_BIT_LENGTH {
            return Err(ReadoutError::MalformedHistogram(
                ErrorInfo::new("bit-length-range", "bitstring length exceeds the key width")
                    .with_context("bit_length", bit_length.to_string())
                    .with_context("max", MAX_BIT_LENGTH.to_string()),
            ));
        }
        Ok(Self {
            bit_length,
            counts: BTreeMap::new(),
        })
    }

    /// Declared length of every key in the histogram.
    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Stored counts keyed by encoded bitstring.
    pub fn counts(&self) -> &BTreeMap<u64, u64> {
        &self.counts
    }

    /// Number of distinct bitstrings recorded.
    pub fn num_keys(&self) -> usize {
        self.counts.len()
    }

    /// Total number of shots across all keys.
    pub fn total_count(&self) -> u128 {
        self.counts.values().map(|&count| u128::from(count)).sum()
    }

    /// Records `count` shots of a textual bitstring, accumulating onto any
    /// previous count for the same key.
    pub fn record(&mut self, bitstring: &str, count: u64) -> Result<(), ReadoutError> {
        let key = self.parse_key(bitstring)?;
        self.record_key(key, count)
    }

    /// Records `count` shots of an already encoded key.
    ///
    /// Bits above the declared length must be zero.
    pub fn record_key(&mut self, key: u64, count: u64) -> Result<(), ReadoutError> {
        if self.bit_length == 0 {
            return Err(ReadoutError::MalformedHistogram(ErrorInfo::new(
                "bit-length-range",
                "a zero-length histogram cannot record keys",
            )));
        }
        if self.bit_length < MAX_BIT_LENGTH && key >= 1u64 << self.bit_length {
            return Err(ReadoutError::MalformedHistogram(
                ErrorInfo::new("key-out-of-range", "encoded key uses bits above the declared length")
                    .with_context("key", key.to_string())
                    .with_context("bit_length", self.bit_length.to_string()),
            ));
        }
        let slot = self.counts.entry(key).or_insert(0);
        *slot = slot.checked_add(count).ok_or_else(|| {
            ReadoutError::MalformedHistogram(
                ErrorInfo::new("count-overflow", "accumulated count exceeds u64")
                    .with_context("key", key.to_string()),
            )
        })?;
        Ok(())
    }

    /// Renders an encoded key back to its zero-padded textual form.
    pub fn key_string(&self, key: u64) -> String {
        format!("{key:0width$b}", width = self.bit_length as usize)
    }

    fn parse_key(&self, bitstring: &str) -> Result<u64, ReadoutError> {
        if bitstring.is_empty() {
            return Err(ReadoutError::MalformedHistogram(ErrorInfo::new(
                "empty-key",
                "histogram keys must contain at least one bit",
            )));
        }
        let char_count = bitstring.chars().count();
        if char_count != self.bit_length as usize {
            return Err(ReadoutError::MalformedHistogram(
                ErrorInfo::new(
                    "key-length-mismatch",
                    "key length disagrees with the declared bitstring length",
                )
                .with_context("key", bitstring)
                .with_context("expected", self.bit_length.to_string())
                .with_context("actual", char_count.to_string()),
            ));
        }
        let mut key = 0u64;
        for ch in bitstring.chars() {
            key = (key << 1)
                | match ch {
                    '0' => 0,
                    '1' => 1,
                    _ => {
                        return Err(ReadoutError::MalformedHistogram(
                            ErrorInfo::new("invalid-key-char", "histogram keys may only contain 0 and 1")
                                .with_context("key", bitstring)
                                .with_context("char", ch.to_string()),
                        ))
                    }
                };
        }
        Ok(key)
    }
}
