//! COMTRADE (IEEE C37.111) configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::signal::SignalKind;

/// Revision year assumed when the configuration omits or garbles it.
pub const DEFAULT_REVISION_YEAR: u16 = 1999;

/// Line frequency assumed when the configuration value is unparsable.
pub const DEFAULT_LINE_FREQUENCY: f64 = 60.0;

/// Channel declared in a `.cfg` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComtradeChannel {
    pub index: u32,
    pub name: String,
    pub phase: String,
    pub circuit_component: String,
    pub unit: String,
    pub multiplier: f64,
    pub offset: f64,
    pub skew: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub primary: f64,
    pub secondary: f64,
    pub ps_selector: String,
    pub kind: SignalKind,
    /// Normal state; meaningful for binary channels only.
    pub normal_state: u8,
}

impl ComtradeChannel {
    /// Analog channel with the standard's documented defaults.
    pub fn analog(index: u32) -> Self {
        Self {
            index,
            name: format!("A{index}"),
            phase: String::new(),
            circuit_component: String::new(),
            unit: String::new(),
            multiplier: 1.0,
            offset: 0.0,
            skew: 0.0,
            min_value: -99999.0,
            max_value: 99999.0,
            primary: 1.0,
            secondary: 1.0,
            ps_selector: "P".to_string(),
            kind: SignalKind::Analog,
            normal_state: 0,
        }
    }

    /// Digital (status) channel with the standard's documented defaults.
    pub fn digital(index: u32) -> Self {
        Self {
            name: format!("D{index}"),
            kind: SignalKind::Binary,
            ..Self::analog(index)
        }
    }
}

/// Encoding of the companion `.dat` file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataEncoding {
    #[default]
    Ascii,
    Binary,
    Binary32,
    Float32,
}

impl DataEncoding {
    /// Parses the data-file type line; unknown tags fall back to ASCII.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "BINARY" => Self::Binary,
            "BINARY32" => Self::Binary32,
            "FLOAT32" => Self::Float32,
            _ => Self::Ascii,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Binary => "BINARY",
            Self::Binary32 => "BINARY32",
            Self::Float32 => "FLOAT32",
        }
    }
}

impl fmt::Display for DataEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(rate, end_sample)` entry of the sampling-rate section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingRate {
    /// Sampling rate in Hz.
    pub rate: f64,
    /// Last sample number recorded at this rate.
    pub end_sample: u64,
}

/// Parsed `.cfg` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComtradeConfig {
    pub station_name: String,
    pub device_id: String,
    pub revision_year: u16,
    /// Analog channel count declared on line 2.
    pub num_analog: usize,
    /// Digital channel count declared on line 2.
    pub num_digital: usize,
    /// Channels in file order: analog first, then digital.
    pub channels: Vec<ComtradeChannel>,
    pub line_frequency: f64,
    pub sampling_rates: Vec<SamplingRate>,
    pub start_timestamp: String,
    pub trigger_timestamp: String,
    pub data_encoding: DataEncoding,
    pub time_multiplier: f64,
    pub source: Option<PathBuf>,
}

impl Default for ComtradeConfig {
    fn default() -> Self {
        Self {
            station_name: String::new(),
            device_id: String::new(),
            revision_year: DEFAULT_REVISION_YEAR,
            num_analog: 0,
            num_digital: 0,
            channels: Vec::new(),
            line_frequency: DEFAULT_LINE_FREQUENCY,
            sampling_rates: Vec::new(),
            start_timestamp: String::new(),
            trigger_timestamp: String::new(),
            data_encoding: DataEncoding::Ascii,
            time_multiplier: 1.0,
            source: None,
        }
    }
}

impl ComtradeConfig {
    /// Declared channel count (analog + digital).
    pub fn total_channels(&self) -> usize {
        self.num_analog + self.num_digital
    }

    pub fn channels_of(&self, kind: SignalKind) -> impl Iterator<Item = &ComtradeChannel> {
        self.channels.iter().filter(move |channel| channel.kind == kind)
    }

    pub fn analog_channels(&self) -> impl Iterator<Item = &ComtradeChannel> {
        self.channels_of(SignalKind::Analog)
    }

    pub fn digital_channels(&self) -> impl Iterator<Item = &ComtradeChannel> {
        self.channels_of(SignalKind::Binary)
    }
}
