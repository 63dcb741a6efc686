use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signal::SignalKind;

/// Resolution strategy that produced a validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Alias,
    Fuzzy,
    New,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Fuzzy => "fuzzy",
            Self::New => "new",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one extracted signal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub source_name: String,
    /// Resolved standard name; empty when unresolved.
    pub standard_name: String,
    pub kind: SignalKind,
    pub tier: MatchTier,
    pub confidence: f32,
    pub rationale: String,
}

impl ValidationResult {
    pub fn is_resolved(&self) -> bool {
        self.tier != MatchTier::New
    }
}

/// Per-tier counts over a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub exact: usize,
    pub alias: usize,
    pub fuzzy: usize,
    pub new: usize,
    pub total: usize,
    pub results: Vec<ValidationResult>,
}

impl ValidationSummary {
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in &results {
            match result.tier {
                MatchTier::Exact => summary.exact += 1,
                MatchTier::Alias => summary.alias += 1,
                MatchTier::Fuzzy => summary.fuzzy += 1,
                MatchTier::New => summary.new += 1,
            }
        }
        summary.results = results;
        summary
    }

    pub fn matched(&self) -> usize {
        self.exact + self.alias + self.fuzzy
    }

    /// Share of signals resolved by any tier (0.0 when nothing was validated).
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched() as f64 / self.total as f64
        }
    }
}
