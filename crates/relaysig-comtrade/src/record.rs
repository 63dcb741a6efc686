use std::path::Path;

use relaysig_model::{ComtradeConfig, DataEncoding};
use tracing::info;

use crate::config::read_config;
use crate::data::{SampleRecord, read_data_ascii};
use crate::error::{ComtradeError, Result};
use crate::pair::find_config_data_pair;

/// A configuration together with its decoded samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ComtradeRecord {
    pub config: ComtradeConfig,
    pub samples: Vec<SampleRecord>,
}

impl ComtradeRecord {
    /// Loads a recording from either its `.cfg` or `.dat` path.
    pub fn load(path: &Path) -> Result<Self> {
        let pair = find_config_data_pair(path)?;
        let config = read_config(&pair.config)?;
        if config.data_encoding != DataEncoding::Ascii {
            return Err(ComtradeError::UnsupportedEncoding {
                encoding: config.data_encoding,
            });
        }
        let samples = read_data_ascii(&pair.data, &config)?;
        info!(
            config = %pair.config.display(),
            channels = config.channels.len(),
            samples = samples.len(),
            "loaded COMTRADE record"
        );
        Ok(Self { config, samples })
    }
}
