//! Shared data model for relay signal normalization.
//!
//! Types in this crate are produced by the COMTRADE parser and the XRIO
//! extractor, consumed by the validator, and persisted by the alias store.

#![deny(unsafe_code)]

pub mod alias;
pub mod comtrade;
pub mod function;
pub mod relay;
pub mod signal;
pub mod validation;
pub mod xrio;

pub use alias::AliasEntry;
pub use comtrade::{
    ComtradeChannel, ComtradeConfig, DEFAULT_LINE_FREQUENCY, DEFAULT_REVISION_YEAR, DataEncoding,
    SamplingRate,
};
pub use function::{ProtectionFunction, classify_signal_function};
pub use relay::{RelayReference, UNKNOWN_MODEL};
pub use signal::{
    AnalogSignal, BinarySignal, Component, DisturbanceReportSignal, Phase, SignalKind,
};
pub use validation::{MatchTier, ValidationResult, ValidationSummary};
pub use xrio::{ExtractionStage, StageWarning, XrioData};
