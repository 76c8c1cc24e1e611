//! Error types for reading BlueButton exports.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an export from disk.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Export file not found.
    #[error("BlueButton file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Encoding Errors ===
    /// File starts with a byte-order mark for an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path} (expected UTF-8)")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// File is not valid UTF-8.
    #[error("invalid UTF-8 in {path} after byte {valid_up_to}")]
    InvalidUtf8 { path: PathBuf, valid_up_to: usize },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/bluebutton.txt"),
        };
        assert_eq!(
            err.to_string(),
            "BlueButton file not found: /path/to/bluebutton.txt"
        );
    }

    #[test]
    fn test_encoding_error_display() {
        let err = IngestError::UnsupportedEncoding {
            path: PathBuf::from("export.txt"),
            encoding: "UTF-16 LE",
        };
        assert_eq!(
            err.to_string(),
            "unsupported encoding UTF-16 LE in export.txt (expected UTF-8)"
        );
    }
}
