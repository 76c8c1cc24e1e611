//! Error types for parsing BlueButton exports.

use cmsblue_ingest::IngestError;
use thiserror::Error;

use crate::datetime::DateFormatError;

/// Errors that can abort a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    // === Value Errors ===
    /// A date or timestamp did not match its pattern and the options ask
    /// for the parse to fail.
    #[error("line {line}: malformed {key} value: {source}")]
    Format {
        line: usize,
        key: String,
        #[source]
        source: DateFormatError,
    },

    // === Input Errors ===
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Errors raised while assembling a schema table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two rules share a `match` path, so exact lookup would be ambiguous.
    #[error("duplicate schema match '{path}' (entries '{first}' and '{second}')")]
    DuplicateMatch {
        path: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
