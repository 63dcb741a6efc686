use serde::{Deserialize, Serialize};

/// Relay identity recovered from an XRIO document.
///
/// Only `model` matters downstream: it is the join key into the alias store
/// and the standard catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReference {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub serial: Option<String>,
    pub station_name: Option<String>,
    pub device_id: Option<String>,
    pub description: Option<String>,
}

/// Model key used when a document does not name its relay model.
pub const UNKNOWN_MODEL: &str = "UNKNOWN";

impl RelayReference {
    /// Model key for alias and catalog lookups.
    pub fn model_key(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(UNKNOWN_MODEL)
    }

    /// `manufacturer - model - firmware`, skipping unknown parts.
    pub fn full_id(&self) -> String {
        let parts: Vec<&str> = [&self.manufacturer, &self.model, &self.firmware]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "unknown relay".to_string()
        } else {
            parts.join(" - ")
        }
    }
}
