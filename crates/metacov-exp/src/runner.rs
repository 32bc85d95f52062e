use std::time::Instant;

use metacov_core::{CovError, Dataset, ErrorInfo, PathwayTransform, RngHandle};
use metacov_store::FileStore;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::grid::{subset_size, validate_grid, validate_namer, CellKey, PrefixNamer};
use crate::sampler::sample_columns;

/// Declarative description of one coverage robustness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPlan {
    /// Store key of the full feature table and its labels.
    pub base_key: String,
    /// Store key of the precomputed full-coverage transformed result.
    pub reference_key: String,
    /// Coverage levels to exercise, each in (0, 1].
    pub coverage_levels: Vec<f64>,
    /// Repeat count per coverage level.
    pub iterations: usize,
    /// Master seed; every cell draws from its own derived substream.
    pub seed: u64,
    /// Skip cells whose store key already exists instead of rewriting them.
    #[serde(default)]
    pub resume: bool,
    /// Record cell failures and continue instead of aborting the grid.
    #[serde(default)]
    pub keep_going: bool,
}

/// Completion state of a single experiment cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// Transformed and persisted.
    Completed,
    /// Left untouched because its key already existed (`resume`).
    Skipped,
    /// Transform or persistence failed; the cell stays pending in the store.
    Failed,
}

/// Per-cell outcome and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    /// Coverage level of this cell.
    pub coverage: f64,
    /// Iteration index of this cell.
    pub iteration: usize,
    /// Store key the cell's result was persisted under.
    pub key: String,
    /// Number of columns drawn for the sampled subset.
    pub columns: usize,
    /// Wall-clock duration of the transform call, in seconds.
    pub elapsed_secs: f64,
    /// Completion state.
    pub status: CellStatus,
    /// Failure detail when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate report for a full coverage robustness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Store key of the base feature table.
    pub base_key: String,
    /// Store key of the reference result.
    pub reference_key: String,
    /// Master seed the run was derived from.
    pub seed: u64,
    /// Size of the metabolite universe in the base table.
    pub universe_size: usize,
    /// Record count of the loaded reference result.
    pub reference_records: usize,
    /// Wall-clock duration of the reference load, in seconds.
    pub reference_load_secs: f64,
    /// One entry per grid cell, in execution order.
    pub cells: Vec<CellReport>,
}

/// Executes the coverage robustness grid and persists every cell's output.
///
/// The base dataset and the reference result are loaded eagerly, so a missing
/// input aborts before any cell executes. Cells run sequentially, iterations
/// outer and coverage levels inner; each cell samples its column subset from
/// an independent seed substream, re-fits the transform from scratch, and
/// persists `(transformed records, unchanged labels)` under the namer's key.
/// A failed cell is left absent from the store and never invalidates cells
/// already persisted.
pub fn run_experiment(
    store: &FileStore,
    transform: &dyn PathwayTransform,
    plan: &ExperimentPlan,
    namer: &PrefixNamer,
) -> Result<RunReport, CovError> {
    let load_start = Instant::now();
    let base = store.read(&plan.base_key)?;
    let reference = store.read(&plan.reference_key)?;
    let reference_load_secs = load_start.elapsed().as_secs_f64();
    info!(
        base_key = plan.base_key.as_str(),
        reference_key = plan.reference_key.as_str(),
        reference_records = reference.len(),
        elapsed_secs = reference_load_secs,
        "reference loaded"
    );

    let universe = base.universe();
    validate_grid(&plan.coverage_levels, plan.iterations, universe.len())?;
    validate_namer(namer, &plan.coverage_levels, plan.iterations)?;

    let mut cells = Vec::with_capacity(plan.iterations * plan.coverage_levels.len());
    let mut substream: u64 = 0;
    for iteration in 0..plan.iterations {
        for &coverage in &plan.coverage_levels {
            let cell = CellKey {
                coverage,
                iteration,
            };
            let key = namer.key(&cell);
            let k = subset_size(coverage, universe.len());
            substream += 1;

            if plan.resume && store.exists(&key) {
                info!(key = key.as_str(), "cell already persisted, skipped");
                cells.push(CellReport {
                    coverage,
                    iteration,
                    key,
                    columns: k,
                    elapsed_secs: 0.0,
                    status: CellStatus::Skipped,
                    error: None,
                });
                continue;
            }

            let mut rng = RngHandle::substream(plan.seed, substream);
            let columns = sample_columns(&universe, k, &mut rng)
                .map_err(|err| attach_cell(err, &cell, &key))?;
            let subset = base.project(&columns);

            let cell_start = Instant::now();
            let outcome = apply_and_persist(store, transform, &base, subset, &key);
            let elapsed_secs = cell_start.elapsed().as_secs_f64();
            match outcome {
                Ok(()) => {
                    info!(
                        key = key.as_str(),
                        columns = k,
                        elapsed_secs,
                        "cell done"
                    );
                    cells.push(CellReport {
                        coverage,
                        iteration,
                        key,
                        columns: k,
                        elapsed_secs,
                        status: CellStatus::Completed,
                        error: None,
                    });
                }
                Err(err) => {
                    let err = attach_cell(err, &cell, &key);
                    error!(key = key.as_str(), error = %err, "cell failed");
                    if !plan.keep_going {
                        return Err(err);
                    }
                    cells.push(CellReport {
                        coverage,
                        iteration,
                        key,
                        columns: k,
                        elapsed_secs,
                        status: CellStatus::Failed,
                        error: Some(err.to_string()),
                    });
                }
            }
        }
    }

    Ok(RunReport {
        base_key: plan.base_key.clone(),
        reference_key: plan.reference_key.clone(),
        seed: plan.seed,
        universe_size: universe.len(),
        reference_records: reference.len(),
        reference_load_secs,
        cells,
    })
}

fn apply_and_persist(
    store: &FileStore,
    transform: &dyn PathwayTransform,
    base: &Dataset,
    subset: Vec<metacov_core::Record>,
    key: &str,
) -> Result<(), CovError> {
    let transformed = transform.fit_transform(&subset, &base.labels)?;
    if transformed.len() != base.len() {
        return Err(CovError::Transform(
            ErrorInfo::new(
                "transform-shape",
                "transform returned a different record count than its input",
            )
            .with_context("input", base.len().to_string())
            .with_context("output", transformed.len().to_string()),
        ));
    }
    let result = Dataset::new(transformed, base.labels.clone())?;
    store.write(key, &result)
}

fn attach_cell(err: CovError, cell: &CellKey, key: &str) -> CovError {
    err.with_context("coverage", cell.coverage.to_string())
        .with_context("iteration", cell.iteration.to_string())
        .with_context("key", key)
}
