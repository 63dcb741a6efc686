//! Error types for XRIO reading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur when reading an XRIO document.
#[derive(Debug, Error)]
pub enum XrioError {
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

    /// Document is not well-formed XML.
    #[error("malformed XML: {message}")]
    Malformed { message: String },

    /// Re-serializing an element failed.
    #[error("failed to render XML for <{tag}>: {message}")]
    Render { tag: String, message: String },
}

impl XrioError {
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

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Result type for XRIO operations.
pub type Result<T> = std::result::Result<T, XrioError>;
