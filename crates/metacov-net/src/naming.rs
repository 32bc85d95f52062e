//! Cross-database metabolite naming tables.
//!
//! Parses a tab-separated naming table whose first column is the model
//! abbreviation and whose remaining columns carry per-database identifiers
//! (`keggId`, `hmdbId`, ...). Rows are kept only when the cytosolic form of
//! the abbreviation (`<abbreviation>_c`) exists in the network model. The
//! result is one `external id -> model id` mapping per database column.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use metacov_core::{CovError, ErrorInfo};

use crate::model::NetworkModel;

/// Per-database mappings from external identifiers to model metabolite ids.
pub type NamingMappings = BTreeMap<String, BTreeMap<String, String>>;

/// Parses the naming TSV at `path` against `model`.
pub fn parse_naming_table(
    path: impl AsRef<Path>,
    model: &NetworkModel,
) -> Result<NamingMappings, CovError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|err| {
            CovError::NotFound(
                ErrorInfo::new("naming-open", "failed to open naming table")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;

    let headers = reader
        .headers()
        .map_err(|err| naming_corrupt(path, err.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(naming_corrupt(path, "missing header row".to_string()));
    }
    let known = model.metabolites();

    let mut mappings: NamingMappings = BTreeMap::new();
    for result in reader.records() {
        let record = result.map_err(|err| naming_corrupt(path, err.to_string()))?;
        let Some(abbreviation) = record.get(0) else {
            continue;
        };
        let metabolite = format!("{abbreviation}_c");
        if !known.contains(&metabolite) {
            continue;
        }
        for (column, value) in headers.iter().zip(record.iter()).skip(1) {
            if value.is_empty() {
                continue;
            }
            mappings
                .entry(database_name(column))
                .or_default()
                .insert(value.to_string(), metabolite.clone());
        }
    }
    Ok(mappings)
}

/// Database name for a naming column: the column header with a trailing `Id`
/// stripped (`keggId` -> `kegg`).
pub fn database_name(column: &str) -> String {
    column.strip_suffix("Id").unwrap_or(column).to_string()
}

fn naming_corrupt(path: &Path, detail: String) -> CovError {
    CovError::Corrupt(
        ErrorInfo::new("naming-parse", "naming table is not a valid TSV")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}
