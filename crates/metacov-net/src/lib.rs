//! Metabolic network model, the reference pathway engine, and dataset
//! ingestion helpers (labeled CSV, mwTab, cross-database naming tables).

mod model;
mod naming;
mod mwtab;
mod tabular;

pub use model::{NetworkModel, NetworkTransform, Pathway};
pub use mwtab::parse_mwtab;
pub use naming::{database_name, parse_naming_table, NamingMappings};
pub use tabular::{read_labeled_csv, write_labeled_csv};
