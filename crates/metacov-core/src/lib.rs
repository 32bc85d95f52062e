#![deny(missing_docs)]
#![doc = "Core types and traits for the metabolite coverage robustness harness."]

pub mod errors;
pub mod rng;
mod transform;
mod types;

pub use errors::{CovError, ErrorInfo};
pub use rng::{derive_substream_seed, RngHandle};
pub use transform::PathwayTransform;
pub use types::{Dataset, Record};
