//! Settings file for the `relaysig` command.
//!
//! Settings come from a TOML file (`relaysig.toml` in the working directory
//! unless `--config` names another one); command-line flags override them.
//!
//! ```toml
//! store_path = "data/alias_database.json"
//! catalog_path = "data/catalog.csv"
//! suggestion_limit = 5
//!
//! [normalization]
//! prefixes = ["REL_", "DIG_", "ANA_", "BIN_", "CH_", "SIG_"]
//! prefix_trim = "separator-free"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relaysig_map::{DEFAULT_PREFIXES, DEFAULT_STORE_PATH, NameNormalizer, PrefixTrim};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "relaysig.toml";

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Alias store JSON file.
    pub store_path: PathBuf,
    /// Per-model catalog CSV; the built-in template is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Number of candidates listed for unresolved signals.
    pub suggestion_limit: usize,
    pub normalization: NormalizationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            catalog_path: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            normalization: NormalizationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationConfig {
    pub prefixes: Vec<String>,
    pub prefix_trim: PrefixTrim,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|prefix| (*prefix).to_string()).collect(),
            prefix_trim: PrefixTrim::default(),
        }
    }
}

/// Values given on the command line, which win over the settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub store_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub suggestion_limit: Option<usize>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        debug!(path = %path.display(), "settings loaded");
        Ok(config)
    }

    /// Loads `explicit` when given, else `relaysig.toml` from `dir` when it
    /// exists, else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(path) = &overrides.store_path {
            self.store_path.clone_from(path);
        }
        if let Some(path) = &overrides.catalog_path {
            self.catalog_path = Some(path.clone());
        }
        if let Some(limit) = overrides.suggestion_limit {
            self.suggestion_limit = limit;
        }
        self
    }

    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::new(&self.normalization.prefixes, self.normalization.prefix_trim)
    }
}
