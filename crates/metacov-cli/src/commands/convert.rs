use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use metacov_net::{parse_mwtab, write_labeled_csv};
use tracing::info;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Disease dataset name; resolves to `<datasets>/diseases/<name>.mwtab`.
    pub disease_name: String,
    /// Dataset directory root.
    #[arg(long, default_value = "datasets")]
    pub datasets: PathBuf,
    /// Output directory for the converted CSV.
    #[arg(long, default_value = "outputs")]
    pub out: PathBuf,
}

pub fn run(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let input = args
        .datasets
        .join("diseases")
        .join(format!("{}.mwtab", args.disease_name));
    let contents = fs::read_to_string(&input)?;
    let dataset = parse_mwtab(&contents)?;

    fs::create_dir_all(&args.out)?;
    let output = args.out.join(format!("{}.csv", args.disease_name));
    write_labeled_csv(&output, &dataset, "labels")?;
    info!(
        disease = args.disease_name.as_str(),
        samples = dataset.len(),
        output = %output.display(),
        "mwtab converted"
    );
    Ok(())
}
