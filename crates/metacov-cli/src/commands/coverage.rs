use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use metacov_exp::{descending_levels, run_experiment, ExperimentPlan, PrefixNamer};
use metacov_net::{NetworkModel, NetworkTransform};
use metacov_store::FileStore;
use tracing::info;

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Store directory holding the base dataset and the reference result.
    #[arg(long)]
    pub datasets: PathBuf,
    /// Network model JSON driving the pathway transform.
    #[arg(long)]
    pub model: PathBuf,
    /// Namespace prefix for the run's output keys.
    #[arg(long, default_value = "coverage_test")]
    pub prefix: String,
    /// Store key of the full feature table.
    #[arg(long, default_value = "coverage_test#metabolites")]
    pub base_key: String,
    /// Store key of the precomputed full-coverage result.
    #[arg(long, default_value = "coverage_test#coverage=1")]
    pub reference_key: String,
    /// Highest coverage level of the grid.
    #[arg(long, default_value_t = 0.15)]
    pub max_coverage: f64,
    /// Lowest coverage level of the grid.
    #[arg(long, default_value_t = 0.05)]
    pub min_coverage: f64,
    /// Number of evenly spaced coverage levels.
    #[arg(long, default_value_t = 3)]
    pub steps: usize,
    /// Repeats per coverage level.
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,
    /// Master seed; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write cell outputs without gzip compression.
    #[arg(long)]
    pub uncompressed: bool,
    /// Skip cells whose store key already exists.
    #[arg(long)]
    pub resume: bool,
    /// Record cell failures and continue instead of aborting.
    #[arg(long)]
    pub keep_going: bool,
    /// Where to write the run report JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &CoverageArgs) -> Result<(), Box<dyn Error>> {
    let store = FileStore::open(&args.datasets, !args.uncompressed)?;
    let model = NetworkModel::load(&args.model)?;
    let transform = NetworkTransform::new(model);

    let seed = args.seed.unwrap_or_else(rand::random);
    let plan = ExperimentPlan {
        base_key: args.base_key.clone(),
        reference_key: args.reference_key.clone(),
        coverage_levels: descending_levels(args.max_coverage, args.min_coverage, args.steps),
        iterations: args.iterations,
        seed,
        resume: args.resume,
        keep_going: args.keep_going,
    };
    let namer = PrefixNamer::new(args.prefix.clone());
    let report = run_experiment(&store, &transform, &plan, &namer)?;

    info!(
        seed,
        cells = report.cells.len(),
        universe = report.universe_size,
        "coverage run finished"
    );
    if let Some(path) = &args.report {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    Ok(())
}
