use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use metacov_core::{Dataset, PathwayTransform};
use metacov_net::{read_labeled_csv, NetworkModel, NetworkTransform};
use metacov_store::FileStore;
use tracing::info;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Disease dataset name; resolves to `<datasets>/diseases/<name>.csv`.
    pub disease_name: String,
    /// Dataset directory root.
    #[arg(long, default_value = "datasets")]
    pub datasets: PathBuf,
    /// Network model JSON driving the pathway transform.
    #[arg(long)]
    pub model: PathBuf,
    /// Output store directory.
    #[arg(long, default_value = "outputs")]
    pub out: PathBuf,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let input = args
        .datasets
        .join("diseases")
        .join(format!("{}.csv", args.disease_name));
    let dataset = read_labeled_csv(&input, "labels")?;
    info!(
        disease = args.disease_name.as_str(),
        samples = dataset.len(),
        "dataset loaded"
    );

    let model = NetworkModel::load(&args.model)?;
    let transform = NetworkTransform::new(model);
    let transformed = transform.fit_transform(&dataset.records, &dataset.labels)?;
    let result = Dataset::new(transformed, dataset.labels.clone())?;

    let store = FileStore::open(&args.out, true)?;
    let key = format!("{}_analysis", args.disease_name);
    store.write(&key, &result)?;
    info!(key = key.as_str(), "analysis persisted");
    Ok(())
}
