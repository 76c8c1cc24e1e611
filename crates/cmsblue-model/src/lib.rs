//! Shared types for the CMS BlueButton text parser.
//!
//! The BlueButton export is a divider-delimited plain-text file produced by
//! MyMedicare.gov. These types describe the intermediate line sequence, the
//! static schema rules that drive the parser, the options a caller can set,
//! and the ordered JSON mapping the parser produces.

pub mod error;
pub mod line;
pub mod options;
pub mod schema;

pub use error::{ModelError, Result};
pub use line::{LineRecord, LineType};
pub use options::{BadDatePolicy, ParseOptions};
pub use schema::{FieldShape, ListItem, SchemaEntry, SectionHandler};

/// Ordered mapping from segment name to parsed content.
///
/// `serde_json` is built with `preserve_order`, so keys keep the order in
/// which segments were found in the export.
pub type Segments = serde_json::Map<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_keep_insertion_order() {
        let mut segments = Segments::new();
        segments.insert("patient".to_string(), serde_json::json!({}));
        segments.insert("claims".to_string(), serde_json::json!([]));
        segments.insert("allergies".to_string(), serde_json::json!([]));
        let keys: Vec<&str> = segments.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["patient", "claims", "allergies"]);
    }
}
