//! Deterministic generators for operators and probability states.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use readout_core::errors::{ErrorInfo, ReadoutError};
use readout_core::rng::RngHandle;

/// Builds the confusion operator for the given per-outcome readout fidelities.
///
/// Diagonal entry `(i, i)` carries fidelity `i`; the off-diagonal entries of
/// row `i` share the remaining error mass equally, so every row sums to one.
/// Two fidelities of 0.9 and 0.8 reproduce the classic two-outcome matrix
/// `[[0.9, 0.1], [0.2, 0.8]]`.
pub fn confusion_operator(fidelities: &[f64]) -> Result<DMatrix<f64>, ReadoutError> {
    let dim = fidelities.len();
    if dim < 2 {
        return Err(ReadoutError::Generator(
            ErrorInfo::new(
                "fidelity-count",
                "confusion operator needs at least two outcomes",
            )
            .with_context("outcomes", dim.to_string()),
        ));
    }
    for (outcome, &fidelity) in fidelities.iter().enumerate() {
        if !(0.0..=1.0).contains(&fidelity) {
            return Err(ReadoutError::Generator(
                ErrorInfo::new("fidelity-range", "readout fidelity must lie in [0, 1]")
                    .with_context("outcome", outcome.to_string())
                    .with_context("fidelity", fidelity.to_string()),
            ));
        }
    }
    let error_share = 1.0 / (dim as f64 - 1.0);
    Ok(DMatrix::from_fn(dim, dim, |i, j| {
        if i == j {
            fidelities[i]
        } else {
            (1.0 - fidelities[i]) * error_share
        }
    }))
}

/// Samples a `dim x dim` operator with entries uniform in `[0, 1)`.
pub fn random_operator(dim: usize, rng: &mut RngHandle) -> Result<DMatrix<f64>, ReadoutError> {
    if dim == 0 {
        return Err(ReadoutError::Generator(ErrorInfo::new(
            "operator-dim",
            "operator dimension must be at least 1",
        )));
    }
    Ok(DMatrix::from_fn(dim, dim, |_, _| rng.gen::<f64>()))
}

/// Samples a probability state over `dim^n_axes` outcomes.
///
/// Amplitudes are drawn uniformly from `[0, 1000)` and normalised to unit
/// total mass, matching the distribution the throughput harness feeds the
/// kernels.
pub fn random_state(
    dim: usize,
    n_axes: usize,
    rng: &mut RngHandle,
) -> Result<DVector<f64>, ReadoutError> {
    if dim == 0 {
        return Err(ReadoutError::Generator(ErrorInfo::new(
            "state-dim",
            "state dimension must be at least 1",
        )));
    }
    let mut len = 1usize;
    for _ in 0..n_axes {
        len = len.checked_mul(dim).ok_or_else(|| {
            ReadoutError::Generator(
                ErrorInfo::new("state-overflow", "requested state length overflows usize")
                    .with_context("dim", dim.to_string())
                    .with_context("axes", n_axes.to_string()),
            )
        })?;
    }
    let mut amplitudes = DVector::from_fn(len, |_, _| rng.gen_range(0.0..1000.0));
    let total: f64 = amplitudes.iter().sum();
    if total > 0.0 {
        amplitudes /= total;
    } else {
        amplitudes.fill(1.0 / len as f64);
    }
    Ok(amplitudes)
}
