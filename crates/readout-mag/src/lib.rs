#![deny(missing_docs)]
#![doc = "Bitstring histogram storage and magnetization aggregation kernels."]

pub mod generators;
pub mod histogram;
pub mod magnetization;
pub mod serde;

pub use generators::random_histogram;
pub use histogram::{CountsHistogram, MAX_BIT_LENGTH};
pub use magnetization::{sharded_magnetization, total_magnetization, MagnetizationPartial};
pub use self::serde::{from_bytes, from_json, to_bytes, to_json};
