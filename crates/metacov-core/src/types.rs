use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{CovError, ErrorInfo};

/// One sample's identifier-to-value mapping.
///
/// Keys are metabolite identifiers for raw feature tables and
/// pathway/reaction identifiers for transformed results. Not every sample
/// needs to populate every identifier.
pub type Record = BTreeMap<String, f64>;

/// A labeled feature table: an ordered sequence of records with one class
/// label per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Per-sample identifier-to-value mappings.
    pub records: Vec<Record>,
    /// Class labels, parallel to `records`.
    pub labels: Vec<String>,
}

impl Dataset {
    /// Creates a dataset, enforcing that records and labels are parallel.
    pub fn new(records: Vec<Record>, labels: Vec<String>) -> Result<Self, CovError> {
        let dataset = Self { records, labels };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks the record/label parallelism invariant.
    pub fn validate(&self) -> Result<(), CovError> {
        if self.records.len() != self.labels.len() {
            return Err(CovError::Corrupt(
                ErrorInfo::new(
                    "dataset-shape",
                    "record and label sequences have different lengths",
                )
                .with_context("records", self.records.len().to_string())
                .with_context("labels", self.labels.len().to_string()),
            ));
        }
        Ok(())
    }

    /// Number of samples in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The universe of identifiers: the sorted union of keys observed across
    /// all records.
    pub fn universe(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for record in &self.records {
            for key in record.keys() {
                set.insert(key.clone());
            }
        }
        set.into_iter().collect()
    }

    /// Projects every record onto the given columns.
    ///
    /// Columns absent from a record stay absent in the projection (no
    /// zero-filling). Rows are neither reordered nor dropped.
    pub fn project(&self, columns: &[String]) -> Vec<Record> {
        self.records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .filter_map(|col| record.get(col).map(|value| (col.clone(), *value)))
                    .collect()
            })
            .collect()
    }
}
