//! Classified input lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of a line in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineType {
    /// Section title captured between two dividers (or a promoted claim line).
    Header,
    /// Key/value or free-text content line.
    Body,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Header => "HEADER",
            LineType::Body => "BODY",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-blank line of the export after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    /// Position in the classified sequence (blank lines and dividers excluded).
    pub sequence_key: usize,
    /// 1-based physical line number in the source text.
    pub line_number: usize,
    /// Line text with trailing whitespace removed. Header titles have any
    /// `": value"` suffix stripped.
    pub text: String,
    pub line_type: LineType,
    pub level: usize,
    /// Most recent claim number seen at or before this line.
    pub claim_number: String,
}

impl LineRecord {
    pub fn is_header(&self) -> bool {
        self.line_type == LineType::Header
    }

    pub fn is_body(&self) -> bool {
        self.line_type == LineType::Body
    }

    /// True when the text carries a `key: value` pair.
    pub fn has_pair(&self) -> bool {
        self.text.contains(':')
    }

    /// Text before the first colon, or the whole text.
    pub fn label(&self) -> &str {
        match self.text.split_once(':') {
            Some((label, _)) => label,
            None => &self.text,
        }
    }
}
