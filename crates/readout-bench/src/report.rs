use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::iter::FromIterator;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use readout_core::{ReportProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTiming {
    pub label: String,
    pub runs: u32,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub per_run_seconds: Vec<f64>,
}

impl PathTiming {
    pub fn from_durations(label: &str, durations: &[Duration]) -> Self {
        let per_run_seconds: Vec<f64> = durations.iter().map(Duration::as_secs_f64).collect();
        let total_seconds: f64 = per_run_seconds.iter().sum();
        let runs = durations.len() as u32;
        let mean_seconds = if runs == 0 {
            0.0
        } else {
            total_seconds / f64::from(runs)
        };
        Self {
            label: label.to_string(),
            runs,
            total_seconds,
            mean_seconds,
            per_run_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorReport {
    pub schema_version: SchemaVersion,
    pub axes: u32,
    pub dim: usize,
    pub state_len: usize,
    pub kron_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle: Option<PathTiming>,
    pub kernel: PathTiming,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedup_vs_oracle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_abs_error: Option<f64>,
    pub provenance: ReportProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetizationReport {
    pub schema_version: SchemaVersion,
    pub bit_length: u32,
    pub distinct_keys: usize,
    pub total_count: u128,
    pub payload_bytes: usize,
    pub reference: PathTiming,
    pub kernel: PathTiming,
    pub speedup: f64,
    pub magnetization: f64,
    pub sharded_magnetization: f64,
    pub provenance: ReportProvenance,
}

pub fn report_provenance(seed: u64, params_hash: String) -> ReportProvenance {
    let mut versions = BTreeMap::new();
    versions.insert(
        "readout-bench".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    ReportProvenance {
        params_hash,
        seed,
        created_at: Utc::now().to_rfc3339(),
        tool_versions: versions,
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => {
            let canonical_values = values.into_iter().map(canonicalize).collect();
            Value::Array(canonical_values)
        }
        other => other,
    }
}

pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, Box<dyn Error>> {
    let value = serde_json::to_value(value)?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(digest))
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_runs_csv(path: &Path, timings: &[&PathTiming]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    writeln!(file, "path,run,seconds")?;
    for timing in timings {
        for (run, seconds) in timing.per_run_seconds.iter().enumerate() {
            writeln!(file, "{},{},{:.9}", timing.label, run, seconds)?;
        }
    }
    Ok(())
}
