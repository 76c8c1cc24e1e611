//! Schema rule records.
//!
//! A schema entry describes how a section or field found in the export maps
//! into the output document. Section entries have an undotted `match` (the
//! normalized section title); field entries use the dotted breadcrumb path of
//! the line they apply to, e.g. `patient.homePhone`.

use serde::Serialize;
use std::fmt;

/// Element type of a list-shaped entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListItem {
    Dict,
}

/// Value shape of a section or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldShape {
    Scalar,
    /// A mapping. For fields, `dict_name` groups the value under a shared
    /// sub-dict (e.g. all phone numbers under `phone`).
    Dict { dict_name: Option<&'static str> },
    /// A sequence. Sections with `sub_type: Dict` produce one dict per
    /// repeated entry; fields append scalar values.
    List { sub_type: Option<ListItem> },
}

impl FieldShape {
    pub fn label(&self) -> &'static str {
        match self {
            FieldShape::Scalar => "scalar",
            FieldShape::Dict { .. } => "dict",
            FieldShape::List { sub_type: None } => "list",
            FieldShape::List {
                sub_type: Some(ListItem::Dict),
            } => "list<dict>",
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Section-level processing routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionHandler {
    #[default]
    Generic,
    /// Family members with a relationship `Type` and condition `Type` lines.
    FamilyHistory,
    /// Claims whose line items nest under the owning claim.
    ClaimSummary,
}

impl SectionHandler {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionHandler::Generic => "generic",
            SectionHandler::FamilyHistory => "family_history",
            SectionHandler::ClaimSummary => "claim_summary",
        }
    }
}

impl fmt::Display for SectionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable schema rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    #[serde(rename = "match")]
    pub match_path: &'static str,
    pub name: &'static str,
    pub level: usize,
    pub shape: FieldShape,
    /// Output key override inside the entry's dict (or `dict_name` group).
    pub field: Option<&'static str>,
    /// Defaults written into every dict started for this entry.
    pub pre: &'static [(&'static str, &'static str)],
    pub multi: bool,
    pub handler: SectionHandler,
}

impl SchemaEntry {
    /// A top-level section producing a single dict.
    pub const fn section(match_path: &'static str, name: &'static str) -> Self {
        Self {
            match_path,
            name,
            level: 0,
            shape: FieldShape::Dict { dict_name: None },
            field: None,
            pre: &[],
            multi: false,
            handler: SectionHandler::Generic,
        }
    }

    /// A top-level section producing a list of dicts, one per repeated entry.
    pub const fn list_section(match_path: &'static str, name: &'static str) -> Self {
        Self {
            shape: FieldShape::List {
                sub_type: Some(ListItem::Dict),
            },
            multi: true,
            ..Self::section(match_path, name)
        }
    }

    /// A scalar field addressed by its dotted breadcrumb path.
    pub const fn field(match_path: &'static str, name: &'static str) -> Self {
        Self {
            level: dotted_depth(match_path),
            shape: FieldShape::Scalar,
            ..Self::section(match_path, name)
        }
    }

    /// A field whose value is stored as `<dict_name>.<key>`.
    pub const fn grouped(
        match_path: &'static str,
        dict_name: &'static str,
        key: &'static str,
    ) -> Self {
        Self {
            shape: FieldShape::Dict {
                dict_name: Some(dict_name),
            },
            field: Some(key),
            ..Self::field(match_path, key)
        }
    }

    /// A field whose values are appended to the list stored under `name`.
    pub const fn appended(match_path: &'static str, name: &'static str) -> Self {
        Self {
            shape: FieldShape::List { sub_type: None },
            ..Self::field(match_path, name)
        }
    }

    #[must_use]
    pub const fn at_level(self, level: usize) -> Self {
        Self { level, ..self }
    }

    #[must_use]
    pub const fn with_pre(self, pre: &'static [(&'static str, &'static str)]) -> Self {
        Self { pre, ..self }
    }

    #[must_use]
    pub const fn with_field(self, field: &'static str) -> Self {
        Self {
            field: Some(field),
            ..self
        }
    }

    #[must_use]
    pub const fn with_handler(self, handler: SectionHandler) -> Self {
        Self { handler, ..self }
    }

    /// Section entries are keyed by a bare title, fields by a dotted path.
    pub fn is_section(&self) -> bool {
        !self.match_path.contains('.')
    }

    /// Whether a repeated key starts a new entry instead of overwriting.
    pub fn repeats(&self) -> bool {
        self.multi
            || matches!(
                self.shape,
                FieldShape::List {
                    sub_type: Some(ListItem::Dict)
                }
            )
    }

    /// Key the value is written under.
    pub fn output_key(&self) -> &'static str {
        match self.field {
            Some(field) => field,
            None => self.name,
        }
    }
}

const fn dotted_depth(path: &str) -> usize {
    let bytes = path.as_bytes();
    let mut depth = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'.' {
            depth += 1;
        }
        i += 1;
    }
    depth
}
