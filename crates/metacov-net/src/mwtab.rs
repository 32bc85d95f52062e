//! Minimal mwTab ingestion.
//!
//! Reads the `MS_METABOLITE_DATA` block of a Metabolomics Workbench mwTab
//! file: a `Samples` header row, an optional `Factors` row carrying one class
//! label per sample, and one row per metabolite with its per-sample values.
//! The block is transposed into one record per sample. Cells that are empty
//! or non-numeric are treated as unmeasured and stay absent from the record.

use metacov_core::{CovError, Dataset, ErrorInfo, Record};

const DATA_START: &str = "MS_METABOLITE_DATA_START";
const DATA_END: &str = "MS_METABOLITE_DATA_END";

/// Parses the metabolite data block of an mwTab document into a labeled
/// feature table.
pub fn parse_mwtab(contents: &str) -> Result<Dataset, CovError> {
    let mut lines = contents
        .lines()
        .skip_while(|line| line.trim() != DATA_START)
        .skip(1)
        .take_while(|line| line.trim() != DATA_END)
        .peekable();

    let header = lines.next().ok_or_else(|| {
        CovError::Corrupt(ErrorInfo::new(
            "mwtab-missing-block",
            "no MS_METABOLITE_DATA block found",
        ))
    })?;
    let mut header_cells = header.split('\t');
    let header_tag = header_cells.next().unwrap_or_default();
    if header_tag != "Samples" {
        return Err(CovError::Corrupt(
            ErrorInfo::new("mwtab-header", "metabolite block must start with a Samples row")
                .with_context("found", header_tag),
        ));
    }
    let samples: Vec<String> = header_cells.map(|cell| cell.trim().to_string()).collect();
    if samples.is_empty() {
        return Err(CovError::Corrupt(ErrorInfo::new(
            "mwtab-no-samples",
            "Samples row declares no sample columns",
        )));
    }

    // Labels come from the Factors row when present, otherwise from the
    // sample names themselves.
    let mut labels: Vec<String> = samples.clone();
    let has_factors = lines
        .peek()
        .map(|line| line.starts_with("Factors"))
        .unwrap_or(false);
    if has_factors {
        let factors = lines.next().unwrap_or_default();
        labels = factors
            .split('\t')
            .skip(1)
            .map(|cell| cell.trim().to_string())
            .collect();
        if labels.len() != samples.len() {
            return Err(CovError::Corrupt(
                ErrorInfo::new("mwtab-factors", "Factors row does not match sample count")
                    .with_context("samples", samples.len().to_string())
                    .with_context("factors", labels.len().to_string()),
            ));
        }
    }

    let mut records: Vec<Record> = vec![Record::new(); samples.len()];
    for line in lines {
        let mut cells = line.split('\t');
        let Some(metabolite) = cells.next() else {
            continue;
        };
        let metabolite = metabolite.trim();
        if metabolite.is_empty() {
            continue;
        }
        for (idx, cell) in cells.enumerate() {
            if idx >= records.len() {
                break;
            }
            if let Ok(value) = cell.trim().parse::<f64>() {
                if value.is_finite() {
                    records[idx].insert(metabolite.to_string(), value);
                }
            }
        }
    }

    Dataset::new(records, labels)
}
