//! Schema lookup.
//!
//! Rules are kept in table order; exact lookups go through a hash index and
//! substring lookups scan the table so earlier rules shadow later ones.

use std::collections::HashMap;
use std::sync::OnceLock;

use cmsblue_model::SchemaEntry;

use crate::error::SchemaError;
use crate::table::SCHEMA_TABLE;

/// How a breadcrumb path is compared with rule `match` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The path equals the rule's `match`.
    Exact,
    /// The path occurs somewhere inside the rule's `match`; the first rule in
    /// table order wins.
    Substring,
}

/// An ordered, immutable rule set with an exact-match index.
#[derive(Debug, Clone)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
    index: HashMap<&'static str, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate `match` paths.
    pub fn new(entries: &[SchemaEntry]) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if let Some(&first) = index.get(entry.match_path) {
                let first: &SchemaEntry = &entries[first];
                return Err(SchemaError::DuplicateMatch {
                    path: entry.match_path,
                    first: first.name,
                    second: entry.name,
                });
            }
            index.insert(entry.match_path, position);
        }
        Ok(Self {
            entries: entries.to_vec(),
            index,
        })
    }

    /// Build without validation; the first of any duplicate paths wins.
    fn build(entries: &[SchemaEntry]) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.match_path).or_insert(position);
        }
        Self {
            entries: entries.to_vec(),
            index,
        }
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exact(&self, path: &str) -> Option<&SchemaEntry> {
        self.index.get(path).map(|&position| &self.entries[position])
    }

    /// Exact lookup restricted to section rules.
    pub fn section(&self, path: &str) -> Option<&SchemaEntry> {
        self.exact(path).filter(|entry| entry.is_section())
    }

    pub fn find(&self, path: &str, mode: MatchMode) -> Option<&SchemaEntry> {
        match mode {
            MatchMode::Exact => self.exact(path),
            MatchMode::Substring if path.is_empty() => None,
            MatchMode::Substring => self
                .entries
                .iter()
                .find(|entry| entry.match_path.contains(path)),
        }
    }
}

/// The built-in MyMedicare.gov schema, shared read-only by every parse.
pub fn default_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| Schema::build(SCHEMA_TABLE))
}
