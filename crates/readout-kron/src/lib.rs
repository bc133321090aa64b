#![deny(missing_docs)]
#![doc = "Kernels for applying a small operator to every axis of a tensor-power state."]

pub mod apply;
pub mod generators;
pub mod oracle;

pub use apply::{apply_tensor_power, decompose_length, KernelScalar, PAR_MIN_LEN};
pub use generators::{confusion_operator, random_operator, random_state};
pub use oracle::{apply_dense, oracle_apply, tensor_power_matrix};
