use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    analyze::{self, AnalyzeArgs},
    convert::{self, ConvertArgs},
    coverage::{self, CoverageArgs},
    naming::{self, NamingArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "metacov", about = "Metabolite coverage robustness harness CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the coverage robustness grid against a stored dataset.
    Coverage(CoverageArgs),
    /// Transform one disease dataset and persist the result.
    Analyze(AnalyzeArgs),
    /// Convert an mwTab document into a labeled CSV feature table.
    Convert(ConvertArgs),
    /// Build per-database metabolite naming mappings from a naming table.
    Naming(NamingArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Coverage(args) => coverage::run(&args),
        Command::Analyze(args) => analyze::run(&args),
        Command::Convert(args) => convert::run(&args),
        Command::Naming(args) => naming::run(&args),
    }
}
