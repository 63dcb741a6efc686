use std::fmt;

use relaysig_model::{Phase, SignalKind};
use serde::Serialize;

/// One entry of a standard signal catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardSignal {
    pub name: String,
    pub description: String,
    /// Free-form grouping label taken from the catalog source.
    pub group: String,
    pub kind: SignalKind,
    pub phase: Option<Phase>,
    pub unit: Option<String>,
}

impl StandardSignal {
    pub fn new(name: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            group: String::new(),
            kind,
            phase: None,
            unit: None,
        }
    }
}

/// Source of standard signal names.
///
/// `signals` is the model-independent list; `model_signals` adds the names a
/// specific relay model is expected to carry. Both are consulted during
/// validation.
pub trait StandardCatalog {
    fn signals(&self, kind: SignalKind) -> Vec<StandardSignal>;

    fn model_signals(&self, _model: &str, _kind: SignalKind) -> Vec<StandardSignal> {
        Vec::new()
    }
}

/// Display grouping of the built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SignalCategory {
    Currents,
    Voltages,
    PowerAndFrequency,
    Protection,
    Control,
    Supervision,
}

impl SignalCategory {
    pub const ALL: [Self; 6] = [
        Self::Currents,
        Self::Voltages,
        Self::PowerAndFrequency,
        Self::Protection,
        Self::Control,
        Self::Supervision,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Currents => "Analog - Currents",
            Self::Voltages => "Analog - Voltages",
            Self::PowerAndFrequency => "Analog - Power/Frequency",
            Self::Protection => "Digital - Protection",
            Self::Control => "Digital - Control",
            Self::Supervision => "Digital - Supervision",
        }
    }

    /// Category of a standard name of the given kind.
    pub fn of(name: &str, kind: SignalKind) -> Self {
        let upper = name.to_ascii_uppercase();
        match kind {
            SignalKind::Analog if upper.starts_with('I') => Self::Currents,
            SignalKind::Analog if upper.starts_with('V') => Self::Voltages,
            SignalKind::Analog => Self::PowerAndFrequency,
            SignalKind::Binary => {
                const PROTECTION: &[&str] =
                    &["TRIP", "PICKUP", "OPERATE", "FWD", "REV", "Z1", "Z2", "Z3"];
                const CONTROL: &[&str] = &["CLOSE", "OPEN", "RECLOSE", "CB_"];
                if PROTECTION.iter().any(|k| upper.contains(k)) {
                    Self::Protection
                } else if CONTROL.iter().any(|k| upper.contains(k)) {
                    Self::Control
                } else {
                    Self::Supervision
                }
            }
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
