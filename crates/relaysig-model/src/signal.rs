//! Signal types recovered from XRIO documents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::function::ProtectionFunction;

/// Kind of a signal or channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    #[default]
    Analog,
    Binary,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analog => "analog",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electrical phase of an analog quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    A,
    B,
    C,
    /// Neutral / residual.
    N,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
        }
    }

    /// Parses a single-letter phase code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "N" => Some(Self::N),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electrical component measured by an analog signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    #[serde(rename = "V")]
    Voltage,
    #[serde(rename = "I")]
    Current,
}

impl Component {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voltage => "V",
            Self::Current => "I",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analog signal declared in an `AxRADR` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogSignal {
    /// 1-based position within the origin block.
    pub index: u32,
    pub name: String,
    /// Long name or user text, when the document carries one.
    pub description: String,
    pub phase: Option<Phase>,
    pub component: Option<Component>,
    pub unit: String,
    pub multiplier: f64,
    pub offset: f64,
    pub skew: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub primary: f64,
    pub secondary: f64,
    /// Primary (`P`) or secondary (`S`) scaling selector.
    pub ps_selector: String,
    /// Operation status parameter (e.g. `On`/`Off`).
    pub status: Option<String>,
    /// Origin block identifier (e.g. `A1RADR`).
    pub block: String,
    pub function: ProtectionFunction,
    pub standard_name: Option<String>,
}

impl AnalogSignal {
    pub fn new(index: u32, name: impl Into<String>, block: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: String::new(),
            phase: None,
            component: None,
            unit: String::new(),
            multiplier: 1.0,
            offset: 0.0,
            skew: 0.0,
            min_value: 0.0,
            max_value: 0.0,
            primary: 1.0,
            secondary: 1.0,
            ps_selector: "P".to_string(),
            status: None,
            block: block.into(),
            function: ProtectionFunction::Unknown,
            standard_name: None,
        }
    }

    /// Short label such as `IA` when both component and phase are known.
    pub fn display_name(&self) -> String {
        match (self.component, self.phase) {
            (Some(component), Some(phase)) => format!("{component}{phase}"),
            _ => self.name.clone(),
        }
    }
}

/// Binary signal declared in a `BxRBDR` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySignal {
    /// 1-based position within the origin block.
    pub index: u32,
    pub name: String,
    pub description: String,
    /// Normal state (0 or 1).
    pub normal_state: u8,
    pub block: String,
    pub function: ProtectionFunction,
    pub standard_name: Option<String>,
}

impl BinarySignal {
    pub fn new(index: u32, name: impl Into<String>, block: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: String::new(),
            normal_state: 0,
            block: block.into(),
            function: ProtectionFunction::Unknown,
            standard_name: None,
        }
    }
}

/// Channel configuration of a disturbance-report block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisturbanceReportSignal {
    /// Block-local channel number (1..=96).
    pub channel: u32,
    pub name: String,
    pub description: String,
    pub trigger_operation: String,
    pub trigger_level: String,
    pub indication_mask: String,
    pub set_led: String,
    pub block: String,
}
