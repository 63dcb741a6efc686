//! Locating the `.cfg`/`.dat` companion of a recording.

use std::path::{Path, PathBuf};

use crate::error::{ComtradeError, Result};

/// Configuration and data paths of one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub config: PathBuf,
    pub data: PathBuf,
}

/// Given either half of a recording, returns both paths.
///
/// The extension match is case-insensitive. The sibling is looked up in the
/// same case as the given extension first, then in the other case; if neither
/// exists on disk the same-case candidate is returned so callers get a useful
/// "file not found" later.
pub fn find_config_data_pair(path: &Path) -> Result<FilePair> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let sibling_ext = match extension.to_ascii_lowercase().as_str() {
        "cfg" => "dat",
        "dat" => "cfg",
        _ => {
            return Err(ComtradeError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    };

    let uppercase = extension.chars().all(|c| c.is_ascii_uppercase());
    let candidates = if uppercase {
        [sibling_ext.to_ascii_uppercase(), sibling_ext.to_string()]
    } else {
        [sibling_ext.to_string(), sibling_ext.to_ascii_uppercase()]
    };

    let sibling = candidates
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| path.with_extension(&candidates[0]));

    let given = path.to_path_buf();
    Ok(if sibling_ext == "dat" {
        FilePair {
            config: given,
            data: sibling,
        }
    } else {
        FilePair {
            config: sibling,
            data: given,
        }
    })
}
