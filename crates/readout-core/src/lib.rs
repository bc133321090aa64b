#![deny(missing_docs)]
#![doc = "Shared error, RNG, and provenance types for the readout kernels."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, ReadoutError};
pub use provenance::{ReportProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
