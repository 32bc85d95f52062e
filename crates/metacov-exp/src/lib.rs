//! Coverage robustness experiment grid.
//!
//! Given a fully measured metabolomics dataset and a reference full-coverage
//! transform result, [`run_experiment`] repeatedly draws random metabolite
//! subsets at a fixed set of coverage fractions, re-runs the network-aware
//! transform on each subset, and persists every cell's output under a store
//! key that encodes its `(coverage, iteration)` coordinates.

mod grid;
mod runner;
mod sampler;

pub use grid::{
    descending_levels, subset_size, validate_grid, validate_namer, CellKey, PrefixNamer,
};
pub use runner::{run_experiment, CellReport, CellStatus, ExperimentPlan, RunReport};
pub use sampler::sample_columns;
