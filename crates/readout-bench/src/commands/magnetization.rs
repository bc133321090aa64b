use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use readout_core::rng::RngHandle;
use readout_core::SchemaVersion;
use readout_mag::{from_json, random_histogram, sharded_magnetization, to_json, total_magnetization};
use serde_json::json;

use crate::reference;
use crate::report::{self, MagnetizationReport, PathTiming};
use crate::stamp;

#[derive(Args, Debug)]
pub struct MagnetizationArgs {
    /// Width of each bitstring key.
    #[arg(long, default_value_t = 16)]
    pub bits: u32,
    /// Number of distinct keys to draw, clamped to the full key space.
    #[arg(long, default_value_t = 65_536)]
    pub keys: usize,
    /// Largest per-key count drawn by the generator.
    #[arg(long, default_value_t = 200)]
    pub max_count: u64,
    /// Timed repetitions per path.
    #[arg(long, default_value_t = 100)]
    pub runs: u32,
    /// Master seed for the generated histogram.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Output directory for the JSON report and per-run CSV.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &MagnetizationArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = RngHandle::from_seed(args.seed);
    stamp(format!(
        "generating a {}-bit histogram with up to {} keys",
        args.bits, args.keys
    ));
    let histogram = random_histogram(args.bits, args.keys, args.max_count, &mut rng)?;
    let payload = to_json(&histogram)?;
    let runs = args.runs.max(1);

    stamp("timing the string-rescan reference");
    let mut durations = Vec::with_capacity(runs as usize);
    let mut reference_value = None;
    for _ in 0..runs {
        let start = Instant::now();
        reference_value = Some(reference::total_magnetization(&payload)?);
        durations.push(start.elapsed());
    }
    let reference_timing = PathTiming::from_durations("reference", &durations);
    let reference_value = reference_value.ok_or("no reference runs executed")?;

    stamp("timing the typed kernel");
    let mut durations = Vec::with_capacity(runs as usize);
    let mut kernel_value = None;
    for _ in 0..runs {
        let start = Instant::now();
        let parsed = from_json(&payload)?;
        kernel_value = Some(total_magnetization(&parsed));
        durations.push(start.elapsed());
    }
    let kernel_timing = PathTiming::from_durations("kernel", &durations);
    let kernel_value = kernel_value.ok_or("no kernel runs executed")?;

    if reference_value != kernel_value {
        return Err(format!(
            "kernel disagrees with the reference: {kernel_value} vs {reference_value}"
        )
        .into());
    }
    let sharded_value = sharded_magnetization(&histogram);
    if sharded_value != kernel_value {
        return Err(format!(
            "sharded reduction disagrees with the sequential kernel: {sharded_value} vs {kernel_value}"
        )
        .into());
    }

    let speedup = if kernel_timing.total_seconds > 0.0 {
        reference_timing.total_seconds / kernel_timing.total_seconds
    } else {
        0.0
    };
    stamp(format!("speedup: {speedup:.2}x"));

    if let Some(out) = &args.out {
        let params_hash = report::stable_hash_string(&json!({
            "command": "magnetization",
            "bits": args.bits,
            "keys": args.keys,
            "max_count": args.max_count,
            "runs": runs,
            "seed": args.seed,
        }))?;
        let report = MagnetizationReport {
            schema_version: SchemaVersion::default(),
            bit_length: args.bits,
            distinct_keys: histogram.num_keys(),
            total_count: histogram.total_count(),
            payload_bytes: payload.len(),
            reference: reference_timing.clone(),
            kernel: kernel_timing.clone(),
            speedup,
            magnetization: kernel_value,
            sharded_magnetization: sharded_value,
            provenance: report::report_provenance(args.seed, params_hash),
        };
        report::write_json(out.join("magnetization_report.json"), &report)?;
        report::write_runs_csv(
            &out.join("magnetization_runs.csv"),
            &[&reference_timing, &kernel_timing],
        )?;
        stamp(format!("wrote report artifacts to {}", out.display()));
    }

    Ok(())
}
