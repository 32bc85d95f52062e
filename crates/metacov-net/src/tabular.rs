//! Labeled CSV feature tables.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use metacov_core::{CovError, Dataset, ErrorInfo, Record};

/// Reads a labeled feature table from CSV.
///
/// One row per sample; the `label_column` holds the class label and every
/// other column a metabolite value. Empty and non-numeric cells are treated
/// as unmeasured and stay absent from the record.
pub fn read_labeled_csv(path: impl AsRef<Path>, label_column: &str) -> Result<Dataset, CovError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| {
            CovError::NotFound(
                ErrorInfo::new("csv-open", "failed to open feature table")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;

    let headers = reader
        .headers()
        .map_err(|err| csv_corrupt(path, err.to_string()))?
        .clone();
    let label_idx = headers
        .iter()
        .position(|column| column == label_column)
        .ok_or_else(|| {
            CovError::Corrupt(
                ErrorInfo::new("csv-missing-labels", "label column not found")
                    .with_context("path", path.display().to_string())
                    .with_context("label_column", label_column),
            )
        })?;

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| csv_corrupt(path, err.to_string()))?;
        let mut record = Record::new();
        let mut label = String::new();
        for (idx, (column, cell)) in headers.iter().zip(row.iter()).enumerate() {
            if idx == label_idx {
                label = cell.trim().to_string();
                continue;
            }
            if let Ok(value) = cell.trim().parse::<f64>() {
                if value.is_finite() {
                    record.insert(column.to_string(), value);
                }
            }
        }
        records.push(record);
        labels.push(label);
    }
    Dataset::new(records, labels)
}

/// Writes a labeled feature table as CSV.
///
/// Columns are the label column followed by the sorted metabolite universe;
/// unmeasured cells are left empty.
pub fn write_labeled_csv(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    label_column: &str,
) -> Result<(), CovError> {
    let path = path.as_ref();
    dataset.validate()?;
    let universe = dataset.universe();
    let mut writer = WriterBuilder::new().from_path(path).map_err(|err| {
        CovError::Store(
            ErrorInfo::new("csv-create", "failed to create output CSV")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    let mut header = vec![label_column.to_string()];
    header.extend(universe.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|err| csv_write_failed(path, err))?;

    for (record, label) in dataset.records.iter().zip(&dataset.labels) {
        let mut row = vec![label.clone()];
        for column in &universe {
            row.push(
                record
                    .get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }
        writer
            .write_record(&row)
            .map_err(|err| csv_write_failed(path, err))?;
    }
    writer
        .flush()
        .map_err(|err| csv_write_failed(path, err.into()))?;
    Ok(())
}

fn csv_corrupt(path: &Path, detail: String) -> CovError {
    CovError::Corrupt(
        ErrorInfo::new("csv-parse", "feature table is not a valid CSV")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}

fn csv_write_failed(path: &Path, err: csv::Error) -> CovError {
    CovError::Store(
        ErrorInfo::new("csv-write", "failed to write output CSV")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
