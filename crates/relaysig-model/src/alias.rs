use serde::{Deserialize, Serialize};

use crate::signal::SignalKind;

/// Learned equivalence between a relay-specific name and a standard name.
///
/// Entries are identified by `relay_model::relay_name`. Field names match the
/// on-disk alias store records. `relay_name` and `relay_model` must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub relay_name: String,
    #[serde(default)]
    pub standard_name: String,
    pub relay_model: String,
    #[serde(default)]
    pub signal_type: SignalKind,
    #[serde(default)]
    pub function: String,
    /// Recorded by the validator rather than a curator.
    #[serde(default)]
    pub auto_detected: bool,
    /// Confirmed by a curator or by an exact catalog match.
    #[serde(default)]
    pub validated: bool,
}

impl AliasEntry {
    pub fn new(
        relay_model: impl Into<String>,
        relay_name: impl Into<String>,
        standard_name: impl Into<String>,
        signal_type: SignalKind,
    ) -> Self {
        Self {
            relay_name: relay_name.into(),
            standard_name: standard_name.into(),
            relay_model: relay_model.into(),
            signal_type,
            ..Self::default()
        }
    }

    pub fn key(&self) -> String {
        Self::key_for(&self.relay_model, &self.relay_name)
    }

    pub fn key_for(relay_model: &str, relay_name: &str) -> String {
        format!("{relay_model}::{relay_name}")
    }
}
