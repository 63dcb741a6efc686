//! Persistent alias store.
//!
//! The store is a single JSON object mapping `relay_model::relay_name` to an
//! [`AliasEntry`]. It is read once when opened and rewritten in full after
//! every mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use relaysig_model::AliasEntry;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};

/// Location used when no store path is configured.
pub const DEFAULT_STORE_PATH: &str = "data/alias_database.json";

#[derive(Debug, Clone, Default)]
pub struct AliasStore {
    entries: BTreeMap<String, AliasEntry>,
    path: Option<PathBuf>,
}

impl AliasStore {
    /// Store without a backing file; mutations stay in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store backed by `path`.
    ///
    /// A missing file yields an empty store that is created on the first
    /// mutation. A file that is not a valid alias object is ignored with a
    /// warning and will be overwritten by the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match parse_entries(&text) {
                Ok(entries) => {
                    info!(path = %path.display(), aliases = entries.len(), "alias store loaded");
                    entries
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "alias store is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "alias store does not exist yet");
                BTreeMap::new()
            }
            Err(error) => return Err(StoreError::io(path, error)),
        };
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Inserts or replaces the entry under its key. Returns `true` when the
    /// key was not present before.
    pub fn add(&mut self, entry: AliasEntry) -> Result<bool> {
        let key = entry.key();
        debug!(%key, standard = %entry.standard_name, "alias recorded");
        let is_new = self.entries.insert(key, entry).is_none();
        self.flush()?;
        Ok(is_new)
    }

    /// Removes the entry for `(model, name)`. Returns `false` when absent.
    pub fn remove(&mut self, model: &str, name: &str) -> Result<bool> {
        if self.entries.remove(&AliasEntry::key_for(model, name)).is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn get(&self, model: &str, name: &str) -> Option<&AliasEntry> {
        self.entries.get(&AliasEntry::key_for(model, name))
    }

    /// Entries for `name` under any relay model, in key order.
    pub fn find_by_name(&self, name: &str) -> Vec<&AliasEntry> {
        let name = name.to_lowercase();
        self.entries
            .values()
            .filter(|entry| entry.relay_name.to_lowercase() == name)
            .collect()
    }

    pub fn find_by_standard_name(&self, standard_name: &str) -> Vec<&AliasEntry> {
        let standard_name = standard_name.to_lowercase();
        self.entries
            .values()
            .filter(|entry| entry.standard_name.to_lowercase() == standard_name)
            .collect()
    }

    /// Case-insensitive substring search over name, standard name, model and function.
    pub fn search(&self, query: &str) -> Vec<&AliasEntry> {
        let needle = query.to_lowercase();
        self.entries
            .values()
            .filter(|entry| {
                [
                    &entry.relay_name,
                    &entry.standard_name,
                    &entry.relay_model,
                    &entry.function,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Standard name for `(model, name)`, falling back to the first entry for
    /// `name` under any model.
    pub fn resolve_standard_for(&self, model: &str, name: &str) -> Option<&str> {
        self.get(model, name)
            .or_else(|| self.find_by_name(name).into_iter().next())
            .map(|entry| entry.standard_name.as_str())
    }

    pub fn all(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.values()
    }

    pub fn by_model(&self, model: &str) -> Vec<&AliasEntry> {
        self.entries
            .values()
            .filter(|entry| entry.relay_model.eq_ignore_ascii_case(model))
            .collect()
    }

    pub fn by_function(&self, function: &str) -> Vec<&AliasEntry> {
        self.entries
            .values()
            .filter(|entry| entry.function.eq_ignore_ascii_case(function))
            .collect()
    }

    /// Distinct relay models, sorted.
    pub fn models(&self) -> Vec<&str> {
        distinct(self.entries.values().map(|entry| entry.relay_model.as_str()))
    }

    /// Distinct function labels, sorted.
    pub fn functions(&self) -> Vec<&str> {
        distinct(self.entries.values().map(|entry| entry.function.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush()
    }

    /// Adds every entry of an exported alias file. Returns how many keys were new.
    ///
    /// Entries are re-keyed from their own model and name, so the keys in the
    /// imported file are not trusted.
    pub fn import_from(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path).map_err(|error| StoreError::io(path, error))?;
        let imported = parse_entries(&text).map_err(|error| StoreError::json(path, error))?;
        let mut added = 0;
        for entry in imported.into_values() {
            if self.entries.insert(entry.key(), entry).is_none() {
                added += 1;
            }
        }
        self.flush()?;
        info!(path = %path.display(), added, "aliases imported");
        Ok(added)
    }

    /// Writes every entry to `path` in the backing-file format.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        write_entries(path, &self.entries)?;
        info!(path = %path.display(), aliases = self.entries.len(), "aliases exported");
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match &self.path {
            Some(path) => write_entries(path, &self.entries),
            None => Ok(()),
        }
    }
}

fn parse_entries(text: &str) -> serde_json::Result<BTreeMap<String, AliasEntry>> {
    let raw: BTreeMap<String, AliasEntry> = serde_json::from_str(text)?;
    Ok(raw
        .into_values()
        .map(|entry| (entry.key(), entry))
        .collect())
}

fn write_entries(path: &Path, entries: &BTreeMap<String, AliasEntry>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| StoreError::io(parent, error))?;
    }
    let json = serde_json::to_string_pretty(entries).map_err(|error| StoreError::json(path, error))?;
    fs::write(path, json).map_err(|error| StoreError::io(path, error))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use relaysig_model::SignalKind;

    use super::*;

    fn entry(model: &str, name: &str, standard: &str) -> AliasEntry {
        AliasEntry::new(model, name, standard, SignalKind::Analog)
    }

    #[test]
    fn add_reports_new_keys_only() {
        let mut store = AliasStore::in_memory();
        assert!(store.add(entry("REL670", "IL1", "IA")).unwrap());
        assert!(!store.add(entry("REL670", "IL1", "IA")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn resolve_falls_back_to_other_models() {
        let mut store = AliasStore::in_memory();
        store.add(entry("REL670", "IL1", "IA")).unwrap();
        assert_eq!(store.resolve_standard_for("REL670", "IL1"), Some("IA"));
        assert_eq!(store.resolve_standard_for("RED670", "il1"), Some("IA"));
        assert_eq!(store.resolve_standard_for("RED670", "IL2"), None);
    }

    #[test]
    fn models_are_sorted_and_distinct() {
        let mut store = AliasStore::in_memory();
        store.add(entry("RED670", "IL1", "IA")).unwrap();
        store.add(entry("REL670", "IL1", "IA")).unwrap();
        store.add(entry("REL670", "IL2", "IB")).unwrap();
        store.add(entry("", "IL3", "IC")).unwrap();
        assert_eq!(store.models(), vec!["RED670", "REL670"]);
    }

    #[test]
    fn name_lookups_fold_non_ascii_case() {
        let mut store = AliasStore::in_memory();
        store.add(entry("REL670", "TENSIÓN_L1", "VA")).unwrap();
        store.add(entry("RED670", "Ü_ÉTAT", "ÉTAT_DISJ")).unwrap();
        assert_eq!(store.find_by_name("tensión_l1").len(), 1);
        assert_eq!(store.find_by_name("ü_état").len(), 1);
        assert_eq!(store.find_by_standard_name("état_disj").len(), 1);
        assert!(store.find_by_name("tension_l1").is_empty());
    }

    #[test]
    fn search_matches_any_field() {
        let mut store = AliasStore::in_memory();
        let mut tagged = entry("REL670", "TRIP_L1", "TRIP");
        tagged.function = "distance".to_string();
        store.add(tagged).unwrap();
        store.add(entry("REL670", "IL1", "IA")).unwrap();
        assert_eq!(store.search("DIST").len(), 1);
        assert_eq!(store.search("rel670").len(), 2);
        assert!(store.search("xyz").is_empty());
    }
}
