use std::path::Path;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::aggregate::CategoryCounts;
use super::error::CensusError;

/// Counts and derived fractions for one scope, ready for the presentation
/// layer.
///
/// Each fraction group is `None` when its denominator is zero; a pie renderer
/// should draw a placeholder for those instead of receiving a NaN. An entirely
/// empty scope has zero counts and all three groups `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSummary {
    pub label: String,
    pub counts: CategoryCounts,
    pub fraction_all: Option<[f64; 4]>,
    pub fraction_masked: Option<[f64; 2]>,
    pub fraction_unmasked: Option<[f64; 2]>,
}

impl ScopeSummary {
    pub fn new(label: String, counts: CategoryCounts) -> Self {
        Self {
            label,
            counts,
            fraction_all: counts.fraction_all(),
            fraction_masked: counts.fraction_masked(),
            fraction_unmasked: counts.fraction_unmasked(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// A scope the batch driver could not summarize, kept so one bad scope never
/// aborts its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFailure {
    pub scope: String,
    pub error: String,
}

/// The full census output for one run: one summary per requested scope plus
/// every failure encountered along the way. Serialized to JSON for the
/// plotting scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusReport {
    pub run: String,
    pub generated: String,
    pub hit_index: usize,
    pub scopes: Vec<ScopeSummary>,
    pub failures: Vec<ScopeFailure>,
}

impl CensusReport {
    pub fn new(run: &str, hit_index: usize) -> Self {
        let generated = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("unknown"));
        Self {
            run: run.to_string(),
            generated,
            hit_index,
            scopes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, summary: ScopeSummary) {
        self.scopes.push(summary);
    }

    pub fn push_failure(&mut self, scope: String, error: String) {
        self.failures.push(ScopeFailure { scope, error });
    }

    pub fn summary(&self, label: &str) -> Option<&ScopeSummary> {
        self.scopes.iter().find(|s| s.label == label)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json_file(&self, path: &Path) -> Result<(), CensusError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
