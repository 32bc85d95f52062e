use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use metacov_core::{CovError, ErrorInfo, PathwayTransform, Record};
use serde::{Deserialize, Serialize};

/// One pathway and its member metabolites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathway {
    /// Pathway/reaction identifier used as a key in transformed results.
    pub id: String,
    /// Metabolite identifiers participating in this pathway.
    pub metabolites: Vec<String>,
}

/// Metabolic network description: a named set of pathways over metabolites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkModel {
    /// Model name, e.g. `recon2`.
    pub name: String,
    /// Pathway membership table.
    pub pathways: Vec<Pathway>,
}

impl NetworkModel {
    /// Loads a model from its JSON description.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CovError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            CovError::NotFound(
                ErrorInfo::new("model-read", "failed to read network model")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let model: NetworkModel = serde_json::from_str(&text).map_err(|err| {
            CovError::Corrupt(
                ErrorInfo::new("model-parse", "network model is not valid JSON")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        if model.pathways.is_empty() {
            return Err(CovError::Corrupt(
                ErrorInfo::new("model-empty", "network model declares no pathways")
                    .with_context("name", model.name.clone()),
            ));
        }
        Ok(model)
    }

    /// Sorted union of all metabolite identifiers the model knows about.
    pub fn metabolites(&self) -> BTreeSet<String> {
        self.pathways
            .iter()
            .flat_map(|pathway| pathway.metabolites.iter().cloned())
            .collect()
    }

    /// Returns true when the model contains the metabolite identifier.
    pub fn contains_metabolite(&self, id: &str) -> bool {
        self.pathways
            .iter()
            .any(|pathway| pathway.metabolites.iter().any(|m| m == id))
    }
}

/// Reference pathway engine over a [`NetworkModel`].
///
/// Scores each pathway per sample as the mean of its observed member
/// metabolite values; pathways with no observed member stay absent from that
/// sample's record. Flux-analysis engines with real network traversal plug in
/// through the same [`PathwayTransform`] trait.
#[derive(Debug, Clone)]
pub struct NetworkTransform {
    model: NetworkModel,
}

impl NetworkTransform {
    /// Creates the engine for the given model.
    pub fn new(model: NetworkModel) -> Self {
        Self { model }
    }

    /// The underlying network model.
    pub fn model(&self) -> &NetworkModel {
        &self.model
    }
}

impl PathwayTransform for NetworkTransform {
    fn fit_transform(
        &self,
        records: &[Record],
        labels: &[String],
    ) -> Result<Vec<Record>, CovError> {
        if records.len() != labels.len() {
            return Err(CovError::Transform(
                ErrorInfo::new("engine-shape", "records and labels are not parallel")
                    .with_context("records", records.len().to_string())
                    .with_context("labels", labels.len().to_string()),
            ));
        }
        let transformed = records
            .iter()
            .map(|record| {
                let mut out = Record::new();
                for pathway in &self.model.pathways {
                    let observed: Vec<f64> = pathway
                        .metabolites
                        .iter()
                        .filter_map(|id| record.get(id).copied())
                        .collect();
                    if !observed.is_empty() {
                        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
                        out.insert(pathway.id.clone(), mean);
                    }
                }
                out
            })
            .collect();
        Ok(transformed)
    }
}
