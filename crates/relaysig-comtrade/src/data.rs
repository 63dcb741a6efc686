//! ASCII `.dat` reader.

use std::path::Path;

use relaysig_model::ComtradeConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, read_text};

/// One row of an ASCII data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Sample number as written in the file.
    pub sample: i64,
    /// Timestamp in the units of the configuration's time multiplier.
    pub timestamp: i64,
    /// Raw analog values, one per declared analog channel.
    pub analog: Vec<f64>,
    /// Status values, one per declared digital channel.
    pub digital: Vec<u8>,
}

/// Reads an ASCII data file laid out according to `config`.
pub fn read_data_ascii(path: &Path, config: &ComtradeConfig) -> Result<Vec<SampleRecord>> {
    let text = read_text(path)?;
    Ok(parse_data_ascii(&text, config))
}

/// Parses ASCII sample rows.
///
/// Rows with an unreadable sample number or timestamp are skipped. Short rows
/// are padded with zeros and unreadable values become zero.
pub fn parse_data_ascii(text: &str, config: &ComtradeConfig) -> Vec<SampleRecord> {
    let mut records = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 {
            debug!(line = line_number + 1, "skipping short data row");
            continue;
        }
        let (Ok(sample), Ok(timestamp)) = (fields[0].parse(), fields[1].parse()) else {
            debug!(line = line_number + 1, "skipping data row without sample number");
            continue;
        };

        let values = &fields[2..];
        let analog = (0..config.num_analog)
            .map(|i| values.get(i).and_then(|v| v.parse().ok()).unwrap_or(0.0))
            .collect();
        let digital = (0..config.num_digital)
            .map(|i| {
                values
                    .get(config.num_analog + i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0)
            })
            .collect();

        records.push(SampleRecord {
            sample,
            timestamp,
            analog,
            digital,
        });
    }
    records
}
