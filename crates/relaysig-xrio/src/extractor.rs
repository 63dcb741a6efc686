use std::path::{Path, PathBuf};

use relaysig_model::{ExtractionStage, StageWarning, XrioData};
use tracing::{info, warn};

use crate::blocks::{extract_analog_signals, extract_binary_signals};
use crate::context::ExtractContext;
use crate::disturbance::extract_disturbance_report;
use crate::error::{Result, XrioError};
use crate::identity::extract_relay_identity;
use crate::raw::{block_names, extract_raw_blocks};
use crate::tree::XmlDocument;

/// A parsed XRIO document ready for extraction.
#[derive(Debug, Clone)]
pub struct XrioExtractor {
    document: XmlDocument,
    source: Option<PathBuf>,
}

impl XrioExtractor {
    /// Parses XRIO text. Malformed XML fails the whole call.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            document: XmlDocument::parse(text)?,
            source: None,
        })
    }

    /// Reads and parses an XRIO file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| XrioError::read(path, e))?;
        let mut extractor = Self::parse(&String::from_utf8_lossy(&bytes))?;
        extractor.source = Some(path.to_path_buf());
        Ok(extractor)
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Identifiers of the analog and binary blocks, in document order.
    pub fn block_names(&self) -> Vec<String> {
        block_names(&ExtractContext::new(&self.document))
    }

    /// Runs every extraction stage.
    ///
    /// A stage that fails contributes its empty value and a [`StageWarning`];
    /// the remaining stages still run.
    pub fn extract(&self) -> XrioData {
        let ctx = ExtractContext::new(&self.document);
        let mut warnings = Vec::new();

        let namespaces = run_stage(ExtractionStage::DetectNamespaces, &mut warnings, || {
            Ok(ctx.namespaces.clone())
        });
        let relay = run_stage(ExtractionStage::RelayIdentity, &mut warnings, || {
            Ok(extract_relay_identity(&ctx))
        });
        let analog_signals = run_stage(ExtractionStage::AnalogBlocks, &mut warnings, || {
            Ok(extract_analog_signals(&ctx))
        });
        let binary_signals = run_stage(ExtractionStage::BinaryBlocks, &mut warnings, || {
            Ok(extract_binary_signals(&ctx))
        });
        let disturbance_report_signals =
            run_stage(ExtractionStage::DisturbanceReport, &mut warnings, || {
                Ok(extract_disturbance_report(&ctx))
            });
        let mut render_failures = Vec::new();
        let raw_blocks = run_stage(ExtractionStage::RawBlocks, &mut warnings, || {
            Ok(extract_raw_blocks(&ctx, &mut render_failures))
        });
        warnings.extend(render_failures);

        let data = XrioData {
            relay,
            analog_signals,
            binary_signals,
            disturbance_report_signals,
            raw_blocks,
            namespaces,
            warnings,
            source: self.source.clone(),
        };
        info!(
            relay = %data.relay.full_id(),
            analog = data.analog_signals.len(),
            binary = data.binary_signals.len(),
            disturbance_report = data.disturbance_report_signals.len(),
            warnings = data.warnings.len(),
            "extracted XRIO signals"
        );
        data
    }
}

/// Parses XRIO text and runs every extraction stage.
pub fn parse_xrio(text: &str) -> Result<XrioData> {
    Ok(XrioExtractor::parse(text)?.extract())
}

/// Reads an XRIO file and runs every extraction stage.
pub fn read_xrio(path: &Path) -> Result<XrioData> {
    Ok(XrioExtractor::open(path)?.extract())
}

fn run_stage<T: Default>(
    stage: ExtractionStage,
    warnings: &mut Vec<StageWarning>,
    run: impl FnOnce() -> Result<T>,
) -> T {
    match run() {
        Ok(value) => value,
        Err(error) => {
            warn!(stage = %stage, error = %error, "extraction stage failed");
            warnings.push(StageWarning {
                stage,
                message: error.to_string(),
            });
            T::default()
        }
    }
}
