//! Axis-contraction kernels for applying a `d x d` operator to every axis of
//! a `d^n` state vector.
//!
//! The state is treated as an order-`n` tensor with uniform axis length `d`,
//! flattened row-major with axis 0 as the most significant digit of the flat
//! index. Applying the operator to all axes is the action of the `n`-fold
//! Kronecker power without ever materialising the dense `d^n x d^n` matrix:
//! each step contracts one axis in `O(d^(n+1))` work, so the whole pass costs
//! `O(n * d^(n+1))` time and two `d^n` scratch buffers.

use nalgebra::{ClosedAdd, ClosedMul, DMatrix, DVector, Scalar};
use num_traits::{One, Zero};
use rayon::prelude::*;

use readout_core::errors::{ErrorInfo, ReadoutError};

/// Minimum state length before the kernels switch to the parallel path.
pub const PAR_MIN_LEN: usize = 1 << 12;

/// Scalar types accepted by the contraction kernels.
///
/// The bound covers every numeric type the harness exercises (`f32`, `f64`,
/// `Complex<f64>`, integers) without committing to a field structure.
pub trait KernelScalar: Scalar + Copy + Zero + One + ClosedAdd + ClosedMul + Send + Sync {}

impl<T> KernelScalar for T where T: Scalar + Copy + Zero + One + ClosedAdd + ClosedMul + Send + Sync {}

/// Applies `op` to every axis of `state` and returns the transformed state.
///
/// The number of axes `n` is recovered from the state length: a length of 1
/// means `n = 0` and the state is returned unchanged. The operator must be
/// square and non-empty ([`ReadoutError::DimensionMismatch`]) and the state
/// length must be an exact power of the operator dimension
/// ([`ReadoutError::NonPowerLength`]). Both checks run before any arithmetic.
///
/// Axis `i` of the input maps to axis `i` of the output. Internally each
/// contraction moves the transformed axis to the front, so after `n` steps the
/// axes sit in reverse order and a final digit-reversal permutation restores
/// them.
pub fn apply_tensor_power<T: KernelScalar>(
    op: &DMatrix<T>,
    state: &DVector<T>,
) -> Result<DVector<T>, ReadoutError> {
    let dim = square_dim(op)?;
    let len = state.len();
    let n_axes = decompose_length(dim, len)?;
    if n_axes == 0 {
        return Ok(state.clone());
    }

    let parallel = len >= PAR_MIN_LEN;
    let mut front = state.as_slice().to_vec();
    let mut back = vec![T::zero(); len];

    // Step i contracts the axis carrying original label i, which the previous
    // steps have left at physical position i. Left block l spans the already
    // transformed axes (length d^i), right block r the untouched ones.
    let mut l_len = 1usize;
    for _ in 0..n_axes {
        let r_len = len / (l_len * dim);
        if parallel {
            contract_axis_parallel(op, &front, &mut back, l_len, r_len);
        } else {
            contract_axis_serial(op, &front, &mut back, l_len, r_len);
        }
        std::mem::swap(&mut front, &mut back);
        l_len *= dim;
    }

    Ok(DVector::from_vec(reverse_axes(&front, dim, n_axes, parallel)))
}

/// Returns the number of axes `n` such that `dim^n == len`.
///
/// A length of 1 always decomposes as zero axes. Zero-length states and
/// lengths that are not an exact power of `dim` are rejected with
/// [`ReadoutError::NonPowerLength`].
pub fn decompose_length(dim: usize, len: usize) -> Result<usize, ReadoutError> {
    if len == 0 {
        return Err(ReadoutError::NonPowerLength(ErrorInfo::new(
            "empty-state",
            "state vector must contain at least one amplitude",
        )));
    }
    if len == 1 {
        return Ok(0);
    }
    if dim < 2 {
        return Err(ReadoutError::NonPowerLength(
            ErrorInfo::new(
                "non-power-length",
                "state length cannot be a power of a dimension below 2",
            )
            .with_context("length", len.to_string())
            .with_context("dim", dim.to_string()),
        ));
    }
    let mut power = 1usize;
    let mut n_axes = 0usize;
    while power < len {
        power = match power.checked_mul(dim) {
            Some(next) => next,
            None => return Err(non_power(dim, len)),
        };
        n_axes += 1;
    }
    if power != len {
        return Err(non_power(dim, len));
    }
    Ok(n_axes)
}

fn non_power(dim: usize, len: usize) -> ReadoutError {
    ReadoutError::NonPowerLength(
        ErrorInfo::new("non-power-length", "state length is not a power of the operator dimension")
            .with_context("length", len.to_string())
            .with_context("dim", dim.to_string())
            .with_hint("the state must hold dim^n amplitudes for a whole number of axes"),
    )
}

pub(crate) fn square_dim<T: KernelScalar>(op: &DMatrix<T>) -> Result<usize, ReadoutError> {
    if op.nrows() != op.ncols() {
        return Err(ReadoutError::DimensionMismatch(
            ErrorInfo::new("operator-not-square", "operator matrix must be square")
                .with_context("rows", op.nrows().to_string())
                .with_context("cols", op.ncols().to_string()),
        ));
    }
    if op.nrows() == 0 {
        return Err(ReadoutError::DimensionMismatch(ErrorInfo::new(
            "empty-operator",
            "operator matrix must have at least one row",
        )));
    }
    Ok(op.nrows())
}

// out[k, l, r] = sum_j op[k, j] * in[l, j, r] with the contracted axis moved
// to the front. The r loop streams contiguous memory on both sides.
fn contract_axis_serial<T: KernelScalar>(
    op: &DMatrix<T>,
    input: &[T],
    output: &mut [T],
    l_len: usize,
    r_len: usize,
) {
    let dim = op.nrows();
    for l in 0..l_len {
        let in_base = l * dim * r_len;
        for k in 0..dim {
            let out_base = k * l_len * r_len + l * r_len;
            let coeff = op[(k, 0)];
            for r in 0..r_len {
                output[out_base + r] = coeff * input[in_base + r];
            }
            for j in 1..dim {
                let coeff = op[(k, j)];
                let in_off = in_base + j * r_len;
                for r in 0..r_len {
                    output[out_base + r] += coeff * input[in_off + r];
                }
            }
        }
    }
}

fn contract_axis_parallel<T: KernelScalar>(
    op: &DMatrix<T>,
    input: &[T],
    output: &mut [T],
    l_len: usize,
    r_len: usize,
) {
    let dim = op.nrows();
    output
        .par_chunks_mut(r_len)
        .enumerate()
        .for_each(|(chunk, out_chunk)| {
            let k = chunk / l_len;
            let l = chunk % l_len;
            let in_base = l * dim * r_len;
            let coeff = op[(k, 0)];
            for (slot, value) in out_chunk.iter_mut().zip(&input[in_base..in_base + r_len]) {
                *slot = coeff * *value;
            }
            for j in 1..dim {
                let coeff = op[(k, j)];
                let in_off = in_base + j * r_len;
                for (slot, value) in out_chunk.iter_mut().zip(&input[in_off..in_off + r_len]) {
                    *slot += coeff * *value;
                }
            }
        });
}

fn reverse_axes<T: KernelScalar>(input: &[T], dim: usize, n_axes: usize, parallel: bool) -> Vec<T> {
    let mut output = vec![T::zero(); input.len()];
    if parallel {
        output.par_iter_mut().enumerate().for_each(|(index, slot)| {
            *slot = input[reversed_index(dim, n_axes, index)];
        });
    } else {
        for (index, slot) in output.iter_mut().enumerate() {
            *slot = input[reversed_index(dim, n_axes, index)];
        }
    }
    output
}

// Reverses the base-dim digits of a flat index across n_axes positions. The
// permutation is an involution, so gather and scatter forms coincide.
fn reversed_index(dim: usize, n_axes: usize, index: usize) -> usize {
    if dim == 2 {
        return index.reverse_bits() >> (usize::BITS as usize - n_axes);
    }
    let mut rest = index;
    let mut reversed = 0usize;
    for _ in 0..n_axes {
        reversed = reversed * dim + rest % dim;
        rest /= dim;
    }
    reversed
}
