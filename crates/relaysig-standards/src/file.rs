//! Per-model catalogs persisted as CSV.
//!
//! Each row is `model,block,name,description,group`. Rows keep their file
//! order within a block. Blocks whose identifier contains `RADR` hold analog
//! names; every other block holds binary names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use relaysig_model::SignalKind;
use tracing::{debug, info};

use crate::catalog::{StandardCatalog, StandardSignal};
use crate::error::CatalogError;
use crate::template::ComtradeTemplate;

const HEADERS: [&str; 5] = ["model", "block", "name", "description", "group"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogRow {
    model: String,
    block: String,
    name: String,
    description: String,
    group: String,
}

/// Model catalogs layered over the built-in [`ComtradeTemplate`].
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    rows: Vec<CatalogRow>,
    path: Option<PathBuf>,
}

/// Signal kind implied by a catalog block identifier.
pub fn block_kind(block: &str) -> SignalKind {
    if block.to_ascii_uppercase().contains("RADR") {
        SignalKind::Analog
    } else {
        SignalKind::Binary
    }
}

impl CatalogFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog CSV. Rows without a model or name are skipped.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::Csv {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::Csv {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let get = |name: &str| -> String {
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name))
                    .and_then(|i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let row = CatalogRow {
                model: get("model"),
                block: get("block"),
                name: get("name"),
                description: get("description"),
                group: get("group"),
            };
            if row.model.is_empty() || row.name.is_empty() {
                debug!(path = %path.display(), "skipping catalog row without model or name");
                continue;
            }
            rows.push(row);
        }

        info!(path = %path.display(), rows = rows.len(), "loaded signal catalog");
        Ok(Self {
            rows,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Distinct models in file order.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !models.iter().any(|m| m.eq_ignore_ascii_case(&row.model)) {
                models.push(&row.model);
            }
        }
        models
    }

    /// Signals of `model` grouped by block. The model match ignores case.
    pub fn model_catalog(&self, model: &str) -> BTreeMap<String, Vec<StandardSignal>> {
        let mut blocks: BTreeMap<String, Vec<StandardSignal>> = BTreeMap::new();
        for row in self.rows_for(model) {
            blocks
                .entry(row.block.clone())
                .or_default()
                .push(to_signal(row));
        }
        blocks
    }

    /// Replaces everything stored for `model`.
    pub fn set_model_catalog(&mut self, model: &str, blocks: &BTreeMap<String, Vec<StandardSignal>>) {
        self.rows.retain(|row| !row.model.eq_ignore_ascii_case(model));
        for (block, signals) in blocks {
            for signal in signals {
                self.rows.push(CatalogRow {
                    model: model.to_string(),
                    block: block.clone(),
                    name: signal.name.clone(),
                    description: signal.description.clone(),
                    group: signal.group.clone(),
                });
            }
        }
    }

    /// Writes the catalog back to the file it was loaded from.
    pub fn save(&self) -> Result<(), CatalogError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CatalogError> {
        let write_error = |e: csv::Error| CatalogError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
        writer.write_record(HEADERS).map_err(write_error)?;
        for row in &self.rows {
            writer
                .write_record([&row.model, &row.block, &row.name, &row.description, &row.group])
                .map_err(write_error)?;
        }
        writer.flush().map_err(|e| CatalogError::io(path, e))?;
        info!(path = %path.display(), rows = self.rows.len(), "saved signal catalog");
        Ok(())
    }

    fn rows_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a CatalogRow> {
        self.rows
            .iter()
            .filter(move |row| row.model.eq_ignore_ascii_case(model.trim()))
    }
}

fn to_signal(row: &CatalogRow) -> StandardSignal {
    let mut signal = StandardSignal::new(row.name.clone(), block_kind(&row.block));
    signal.description.clone_from(&row.description);
    signal.group.clone_from(&row.group);
    signal
}

impl StandardCatalog for CatalogFile {
    fn signals(&self, kind: SignalKind) -> Vec<StandardSignal> {
        ComtradeTemplate.signals(kind)
    }

    fn model_signals(&self, model: &str, kind: SignalKind) -> Vec<StandardSignal> {
        self.rows_for(model)
            .filter(|row| block_kind(&row.block) == kind)
            .map(to_signal)
            .collect()
    }
}
