use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use metacov_net::{parse_naming_table, NetworkModel};
use tracing::info;

#[derive(Args, Debug)]
pub struct NamingArgs {
    /// Naming table TSV (abbreviation plus per-database id columns).
    #[arg(long, default_value = "datasets/naming/recon-store-metabolites.tsv")]
    pub input: PathBuf,
    /// Network model JSON used to filter unknown metabolites.
    #[arg(long)]
    pub model: PathBuf,
    /// Output directory; one `<db>-mapping.json` per database column.
    #[arg(long, default_value = "outputs")]
    pub out: PathBuf,
}

pub fn run(args: &NamingArgs) -> Result<(), Box<dyn Error>> {
    let model = NetworkModel::load(&args.model)?;
    let mappings = parse_naming_table(&args.input, &model)?;

    fs::create_dir_all(&args.out)?;
    for (database, mapping) in &mappings {
        let path = args.out.join(format!("{database}-mapping.json"));
        fs::write(&path, serde_json::to_string_pretty(mapping)?)?;
        info!(
            database = database.as_str(),
            entries = mapping.len(),
            output = %path.display(),
            "mapping written"
        );
    }
    Ok(())
}
