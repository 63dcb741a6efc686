//! Error types for COMTRADE file operations.

use std::path::{Path, PathBuf};

use relaysig_model::DataEncoding;
use thiserror::Error;

/// Errors that can occur when reading COMTRADE files.
#[derive(Debug, Error)]
pub enum ComtradeError {
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read an existing file.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is structurally too short to parse.
    #[error("malformed configuration: {message}")]
    Malformed { message: String },

    /// Path is neither a `.cfg` nor a `.dat` file.
    #[error("unsupported extension for {path}: expected .cfg or .dat")]
    UnsupportedExtension { path: PathBuf },

    /// Data file uses an encoding this reader does not decode.
    #[error("unsupported data encoding {encoding}: only ASCII data files are decoded")]
    UnsupportedEncoding { encoding: DataEncoding },
}

impl ComtradeError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for COMTRADE operations.
pub type Result<T> = std::result::Result<T, ComtradeError>;

/// Reads a text file, replacing invalid UTF-8 sequences.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ComtradeError::read(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
