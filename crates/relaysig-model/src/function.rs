//! Keyword classifier mapping signal names to protection functions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Protection-function category of a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionFunction {
    Distance,
    Overcurrent,
    Differential,
    Overvoltage,
    Undervoltage,
    Frequency,
    Directional,
    BreakerFailure,
    Reclosing,
    Synchrocheck,
    Metering,
    Communication,
    #[default]
    Unknown,
}

impl ProtectionFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Overcurrent => "overcurrent",
            Self::Differential => "differential",
            Self::Overvoltage => "overvoltage",
            Self::Undervoltage => "undervoltage",
            Self::Frequency => "frequency",
            Self::Directional => "directional",
            Self::BreakerFailure => "breaker_failure",
            Self::Reclosing => "reclosing",
            Self::Synchrocheck => "synchrocheck",
            Self::Metering => "metering",
            Self::Communication => "communication",
            Self::Unknown => "unknown",
        }
    }

    /// ANSI device number conventionally associated with the function.
    pub fn ansi_code(self) -> Option<&'static str> {
        match self {
            Self::Distance => Some("21"),
            Self::Overcurrent => Some("50/51"),
            Self::Differential => Some("87"),
            Self::Overvoltage => Some("59"),
            Self::Undervoltage => Some("27"),
            Self::Frequency => Some("81"),
            Self::Directional => Some("67"),
            Self::BreakerFailure => Some("50BF"),
            Self::Reclosing => Some("79"),
            Self::Synchrocheck => Some("25"),
            Self::Metering | Self::Communication | Self::Unknown => None,
        }
    }
}

impl fmt::Display for ProtectionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered keyword table; the first category with a substring hit wins.
const FUNCTION_KEYWORDS: &[(ProtectionFunction, &[&str])] = &[
    (
        ProtectionFunction::Distance,
        &["Z", "DIST", "21", "ZONE", "MHO", "QUAD", "REACH", "IMPEDANCE"],
    ),
    (
        ProtectionFunction::Overcurrent,
        &[
            "OC", "50", "51", "OVERCURRENT", "I>", "I>>", "IINST", "TOC", "DTOC", "IDMT",
        ],
    ),
    (
        ProtectionFunction::Differential,
        &["DIFF", "87", "RESTRAIN", "OPERATE", "BIAS"],
    ),
    (
        ProtectionFunction::Overvoltage,
        &["OV", "59", "V>", "V>>", "OVERVOLT"],
    ),
    (
        ProtectionFunction::Undervoltage,
        &["UV", "27", "V<", "V<<", "UNDERVOLT"],
    ),
    (
        ProtectionFunction::Frequency,
        &["FREQ", "81", "F<", "F>", "ROCOF", "DF/DT"],
    ),
    (
        ProtectionFunction::Directional,
        &["DIR", "67", "DIRECTIONAL", "ANGLE", "TORQUE"],
    ),
    (
        ProtectionFunction::BreakerFailure,
        &["BF", "50BF", "BREAKER", "CBF", "CB FAIL"],
    ),
    (
        ProtectionFunction::Reclosing,
        &["RECL", "79", "AUTORECL", "AR", "RECLOSE"],
    ),
    (
        ProtectionFunction::Synchrocheck,
        &["SYNC", "25", "SYNCHRO", "CHECK SYNC"],
    ),
    (
        ProtectionFunction::Metering,
        &["METER", "MEAS", "MEASURE", "MW", "MVAR", "PF", "KWH"],
    ),
    (
        ProtectionFunction::Communication,
        &[
            "COMM", "GOOSE", "SV", "IEC61850", "DNP", "MODBUS", "TRIP SEND",
        ],
    ),
];

const CURRENT_TOKENS: &[&str] = &["IA", "IB", "IC", "IN", "I0", "I1", "I2"];
const VOLTAGE_TOKENS: &[&str] = &[
    "VA", "VB", "VC", "VN", "V0", "V1", "V2", "UA", "UB", "UC",
];

/// Classifies a signal name into a protection function.
///
/// The name is upper-cased with `_` and `-` mapped to spaces, then matched
/// against the keyword table in order. Names with no keyword hit fall back to
/// bare current/voltage tokens.
pub fn classify_signal_function(name: &str) -> ProtectionFunction {
    let upper = name.to_uppercase().replace(['_', '-'], " ");
    for (function, keywords) in FUNCTION_KEYWORDS {
        if keywords.iter().any(|keyword| upper.contains(keyword)) {
            return *function;
        }
    }
    if CURRENT_TOKENS.iter().any(|token| upper.contains(token)) {
        return ProtectionFunction::Overcurrent;
    }
    if VOLTAGE_TOKENS.iter().any(|token| upper.contains(token)) {
        return ProtectionFunction::Overvoltage;
    }
    ProtectionFunction::Unknown
}
