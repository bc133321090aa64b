use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use nalgebra::{DMatrix, DVector};
use readout_core::rng::RngHandle;
use readout_core::SchemaVersion;
use readout_kron::{apply_tensor_power, confusion_operator, oracle_apply, random_state};
use serde_json::json;

use crate::report::{self, PathTiming, TensorReport};
use crate::stamp;

const VERIFY_TOLERANCE: f64 = 1e-5;

#[derive(Args, Debug)]
pub struct TensorArgs {
    /// Number of independent axes in the generated state.
    #[arg(long, default_value_t = 8)]
    pub axes: u32,
    /// Per-outcome readout fidelities; their count fixes the operator dimension.
    #[arg(long, value_delimiter = ',', default_values_t = [0.9, 0.8])]
    pub fidelities: Vec<f64>,
    /// Largest axis count for which the dense Kronecker reference still runs.
    #[arg(long, default_value_t = 15)]
    pub kron_limit: u32,
    /// Timed repetitions per path.
    #[arg(long, default_value_t = 1)]
    pub runs: u32,
    /// Master seed for the generated state.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Output directory for the JSON report and per-run CSV.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &TensorArgs) -> Result<(), Box<dyn Error>> {
    stamp(format!("running for {} axes", args.axes));
    let operator: DMatrix<f32> = confusion_operator(&args.fidelities)?.map(|entry| entry as f32);
    let dim = operator.nrows();
    let mut rng = RngHandle::from_seed(args.seed);
    let state: DVector<f32> =
        random_state(dim, args.axes as usize, &mut rng)?.map(|amp| amp as f32);

    let runs = args.runs.max(1);
    let mut dense = None;
    let mut oracle_timing = None;
    if args.axes <= args.kron_limit {
        stamp("running the dense Kronecker reference");
        let mut durations = Vec::with_capacity(runs as usize);
        for _ in 0..runs {
            let start = Instant::now();
            dense = Some(oracle_apply(&operator, &state, state.len())?);
            durations.push(start.elapsed());
        }
        let timing = PathTiming::from_durations("oracle", &durations);
        stamp(format!("dense reference: {:.6}s per run", timing.mean_seconds));
        oracle_timing = Some(timing);
    } else {
        stamp(format!(
            "skipping the dense reference above {} axes",
            args.kron_limit
        ));
    }

    stamp("running the contraction kernel");
    let mut durations = Vec::with_capacity(runs as usize);
    let mut kernel = None;
    for _ in 0..runs {
        let start = Instant::now();
        kernel = Some(apply_tensor_power(&operator, &state)?);
        durations.push(start.elapsed());
    }
    let kernel_timing = PathTiming::from_durations("kernel", &durations);
    let kernel = kernel.ok_or("no kernel runs executed")?;

    let mut max_abs_error = None;
    let mut speedup = None;
    if let (Some(dense), Some(oracle_timing)) = (&dense, &oracle_timing) {
        let error = max_abs_difference(dense, &kernel);
        if error > VERIFY_TOLERANCE {
            return Err(format!(
                "kernel disagrees with the dense reference: max abs error {error:e}"
            )
            .into());
        }
        let ratio = if kernel_timing.total_seconds > 0.0 {
            oracle_timing.total_seconds / kernel_timing.total_seconds
        } else {
            0.0
        };
        stamp(format!(
            "kernel: {:.6}s per run ({:.5}x dense)",
            kernel_timing.mean_seconds, ratio
        ));
        max_abs_error = Some(error);
        speedup = Some(ratio);
    } else {
        stamp(format!("kernel: {:.6}s per run", kernel_timing.mean_seconds));
    }

    if let Some(out) = &args.out {
        let params_hash = report::stable_hash_string(&json!({
            "command": "tensor",
            "axes": args.axes,
            "fidelities": args.fidelities,
            "kron_limit": args.kron_limit,
            "runs": runs,
            "seed": args.seed,
        }))?;
        let report = TensorReport {
            schema_version: SchemaVersion::default(),
            axes: args.axes,
            dim,
            state_len: state.len(),
            kron_limit: args.kron_limit,
            oracle: oracle_timing.clone(),
            kernel: kernel_timing.clone(),
            speedup_vs_oracle: speedup,
            max_abs_error,
            provenance: report::report_provenance(args.seed, params_hash),
        };
        report::write_json(out.join("tensor_report.json"), &report)?;
        let mut rows: Vec<&PathTiming> = Vec::new();
        if let Some(timing) = &oracle_timing {
            rows.push(timing);
        }
        rows.push(&kernel_timing);
        report::write_runs_csv(&out.join("tensor_runs.csv"), &rows)?;
        stamp(format!("wrote report artifacts to {}", out.display()));
    }

    Ok(())
}

fn max_abs_difference(expected: &DVector<f32>, actual: &DVector<f32>) -> f64 {
    expected
        .iter()
        .zip(actual.iter())
        .map(|(a, b)| f64::from((a - b).abs()))
        .fold(0.0, f64::max)
}
