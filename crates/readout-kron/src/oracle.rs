//! Dense Kronecker-power oracle for cross-checking the contraction kernels.
//!
//! The oracle materialises the full `d^n x d^n` matrix, so it is only usable
//! for small states. Callers pass an explicit `max_len` cap and get a
//! structured error instead of an allocation blowup when they exceed it.

use nalgebra::{DMatrix, DVector};

use readout_core::errors::{ErrorInfo, ReadoutError};

use crate::apply::{decompose_length, square_dim, KernelScalar};

/// Builds the dense `n_axes`-fold Kronecker power of `op`.
pub fn tensor_power_matrix<T: KernelScalar>(
    op: &DMatrix<T>,
    n_axes: usize,
    max_len: usize,
) -> Result<DMatrix<T>, ReadoutError> {
    let dim = square_dim(op)?;
    if checked_power(dim, n_axes).map_or(true, |len| len > max_len) {
        return Err(ReadoutError::DimensionMismatch(
            ErrorInfo::new("oracle-cap", "dense Kronecker power exceeds the size cap")
                .with_context("dim", dim.to_string())
                .with_context("axes", n_axes.to_string())
                .with_context("max_len", max_len.to_string())
                .with_hint("raise max_len or stay on the contraction kernel"),
        ));
    }
    let mut dense = DMatrix::<T>::identity(1, 1);
    for _ in 0..n_axes {
        dense = dense.kronecker(op);
    }
    Ok(dense)
}

/// Applies a dense operator to a state, checking the shapes eagerly.
pub fn apply_dense<T: KernelScalar>(
    dense: &DMatrix<T>,
    state: &DVector<T>,
) -> Result<DVector<T>, ReadoutError> {
    if dense.ncols() != state.len() {
        return Err(ReadoutError::DimensionMismatch(
            ErrorInfo::new("dense-shape", "dense operator and state shapes disagree")
                .with_context("cols", dense.ncols().to_string())
                .with_context("length", state.len().to_string()),
        ));
    }
    Ok(dense * state)
}

/// Builds the dense power for the state's axis count and applies it.
pub fn oracle_apply<T: KernelScalar>(
    op: &DMatrix<T>,
    state: &DVector<T>,
    max_len: usize,
) -> Result<DVector<T>, ReadoutError> {
    let dim = square_dim(op)?;
    let n_axes = decompose_length(dim, state.len())?;
    let dense = tensor_power_matrix(op, n_axes, max_len)?;
    apply_dense(&dense, state)
}

fn checked_power(dim: usize, n_axes: usize) -> Option<usize> {
    let mut power = 1usize;
    for _ in 0..n_axes {
        power = power.checked_mul(dim)?;
    }
    Some(power)
}
