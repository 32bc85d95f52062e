use std::collections::BTreeSet;
use std::fmt::{self, Display};

use metacov_core::{CovError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Coordinates of one experiment cell: a coverage level paired with an
/// iteration index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellKey {
    /// Fraction of the metabolite universe retained, in (0, 1].
    pub coverage: f64,
    /// Repeat index at this coverage level.
    pub iteration: usize,
}

impl Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coverage={}#iteration={}", self.coverage, self.iteration)
    }
}

impl CellKey {
    /// Parses the `coverage=<decimal>#iteration=<int>` form produced by
    /// [`Display`]. Coverage and iteration both round-trip exactly so a later
    /// comparison pass can re-associate persisted cells.
    pub fn parse(text: &str) -> Result<Self, CovError> {
        let bad = || {
            CovError::Serde(
                ErrorInfo::new("cell-key-parse", "malformed experiment cell key")
                    .with_context("key", text),
            )
        };
        let (coverage_part, iteration_part) = text.split_once('#').ok_or_else(bad)?;
        let coverage = coverage_part
            .strip_prefix("coverage=")
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or_else(bad)?;
        let iteration = iteration_part
            .strip_prefix("iteration=")
            .and_then(|raw| raw.parse::<usize>().ok())
            .ok_or_else(bad)?;
        Ok(Self {
            coverage,
            iteration,
        })
    }
}

/// Maps experiment cells to store keys inside a caller-chosen namespace.
///
/// The mapping must stay injective across the whole grid; the runner checks
/// this before executing any cell.
#[derive(Debug, Clone)]
pub struct PrefixNamer {
    prefix: String,
}

impl PrefixNamer {
    /// Creates a namer embedding cell keys under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Store key for the given cell.
    pub fn key(&self, cell: &CellKey) -> String {
        if self.prefix.is_empty() {
            cell.to_string()
        } else {
            format!("{}#{}", self.prefix, cell)
        }
    }

    /// Recovers the cell coordinates from a store key produced by [`key`].
    ///
    /// [`key`]: PrefixNamer::key
    pub fn parse(&self, key: &str) -> Result<CellKey, CovError> {
        let suffix = if self.prefix.is_empty() {
            key
        } else {
            key.strip_prefix(&format!("{}#", self.prefix)).ok_or_else(|| {
                CovError::Serde(
                    ErrorInfo::new("cell-key-prefix", "store key is outside this namespace")
                        .with_context("key", key)
                        .with_context("prefix", self.prefix.clone()),
                )
            })?
        };
        CellKey::parse(suffix)
    }
}

/// Number of columns retained at `coverage` for a universe of `universe_size`
/// metabolite identifiers: `ceil(coverage * universe_size)`.
pub fn subset_size(coverage: f64, universe_size: usize) -> usize {
    (coverage * universe_size as f64).ceil() as usize
}

/// Validates a coverage grid before any cell executes.
///
/// Rejects empty level sequences, levels outside (0, 1], a zero iteration
/// count, an empty universe, and any level whose retained column count would
/// be zero.
pub fn validate_grid(
    coverage_levels: &[f64],
    iterations: usize,
    universe_size: usize,
) -> Result<(), CovError> {
    if coverage_levels.is_empty() {
        return Err(CovError::Sampling(ErrorInfo::new(
            "grid-empty-levels",
            "at least one coverage level is required",
        )));
    }
    if iterations == 0 {
        return Err(CovError::Sampling(ErrorInfo::new(
            "grid-zero-iterations",
            "iteration count must be at least 1",
        )));
    }
    if universe_size == 0 {
        return Err(CovError::Sampling(ErrorInfo::new(
            "grid-empty-universe",
            "base feature table has no metabolite columns",
        )));
    }
    for &coverage in coverage_levels {
        if !coverage.is_finite() || coverage <= 0.0 || coverage > 1.0 {
            return Err(CovError::Sampling(
                ErrorInfo::new("grid-coverage-range", "coverage must lie in (0, 1]")
                    .with_context("coverage", coverage.to_string()),
            ));
        }
        if subset_size(coverage, universe_size) == 0 {
            return Err(CovError::Sampling(
                ErrorInfo::new(
                    "grid-degenerate-coverage",
                    "coverage level draws zero columns",
                )
                .with_context("coverage", coverage.to_string())
                .with_context("universe", universe_size.to_string()),
            ));
        }
    }
    Ok(())
}

/// Checks that the namer assigns a distinct store key to every grid cell.
pub fn validate_namer(
    namer: &PrefixNamer,
    coverage_levels: &[f64],
    iterations: usize,
) -> Result<(), CovError> {
    let mut seen = BTreeSet::new();
    for iteration in 0..iterations {
        for &coverage in coverage_levels {
            let key = namer.key(&CellKey {
                coverage,
                iteration,
            });
            if !seen.insert(key.clone()) {
                return Err(CovError::Sampling(
                    ErrorInfo::new("grid-key-collision", "two cells map to the same store key")
                        .with_context("key", key)
                        .with_hint("coverage levels must be pairwise distinct"),
                ));
            }
        }
    }
    Ok(())
}

/// Builds a descending, evenly spaced sequence of coverage levels from
/// `high` down to `low`.
pub fn descending_levels(high: f64, low: f64, steps: usize) -> Vec<f64> {
    if steps == 0 {
        return Vec::new();
    }
    if steps == 1 {
        return vec![high];
    }
    (0..steps)
        .map(|idx| high + (low - high) * idx as f64 / (steps - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_rule_at_non_round_boundary() {
        assert_eq!(subset_size(0.15, 37), 6);
        assert_eq!(subset_size(0.5, 10), 5);
        assert_eq!(subset_size(1.0, 10), 10);
    }

    #[test]
    fn linspace_matches_reference_grid() {
        let levels = descending_levels(0.15, 0.05, 3);
        assert_eq!(levels.len(), 3);
        assert!((levels[0] - 0.15).abs() < 1e-12);
        assert!((levels[1] - 0.10).abs() < 1e-12);
        assert!((levels[2] - 0.05).abs() < 1e-12);
    }
}
