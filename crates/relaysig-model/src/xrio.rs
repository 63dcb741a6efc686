//! Aggregate produced by one XRIO extraction pass.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::relay::RelayReference;
use crate::signal::{AnalogSignal, BinarySignal, DisturbanceReportSignal};

/// Independent stage of an extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    DetectNamespaces,
    RelayIdentity,
    AnalogBlocks,
    BinaryBlocks,
    DisturbanceReport,
    RawBlocks,
}

impl ExtractionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DetectNamespaces => "detect_namespaces",
            Self::RelayIdentity => "relay_identity",
            Self::AnalogBlocks => "analog_blocks",
            Self::BinaryBlocks => "binary_blocks",
            Self::DisturbanceReport => "disturbance_report",
            Self::RawBlocks => "raw_blocks",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage that failed and was replaced by its empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWarning {
    pub stage: ExtractionStage,
    pub message: String,
}

/// Everything recovered from one XRIO document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XrioData {
    pub relay: RelayReference,
    pub analog_signals: Vec<AnalogSignal>,
    pub binary_signals: Vec<BinarySignal>,
    pub disturbance_report_signals: Vec<DisturbanceReportSignal>,
    /// Pretty-printed XML of each block, keyed by block name.
    pub raw_blocks: BTreeMap<String, String>,
    /// Namespace prefix to URI; the default namespace is keyed `default`.
    pub namespaces: BTreeMap<String, String>,
    pub warnings: Vec<StageWarning>,
    pub source: Option<PathBuf>,
}

impl XrioData {
    pub fn total_signals(&self) -> usize {
        self.analog_signals.len() + self.binary_signals.len()
    }
}
