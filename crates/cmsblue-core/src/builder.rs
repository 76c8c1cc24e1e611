//! Segment builder.
//!
//! A segment starts at a dispatched section line and runs until a header at
//! or above its own level (or the end of input). Body lines are resolved
//! against the schema, assigned, and written into a working entry; repeating
//! segments flush the working entry to their list whenever a key comes round
//! again.

use std::collections::HashSet;

use cmsblue_ingest::DEFAULT_CLAIM_TITLE;
use cmsblue_model::{FieldShape, LineRecord, ParseOptions, SchemaEntry};
use serde_json::{Map, Value};

use crate::address::{is_address_start, read_address_block};
use crate::assign::{COMMENTS_KEY, KeyValueState, SOURCE_KEY, assign};
use crate::breadcrumb::Breadcrumb;
use crate::error::Result;
use crate::normalize::headless_camel;
use crate::schema::Schema;

const ADDRESS_KEY: &str = "address";
const CATEGORY_KEY: &str = "category";
const CLAIM_NUMBER_KEY: &str = "claimNumber";
const DETAILS_KEY: &str = "details";
const LINE_NUMBER_KEY: &str = "lineNumber";

/// State shared by every segment of one parse.
#[derive(Debug)]
pub struct ParseContext<'a> {
    pub records: &'a [LineRecord],
    pub schema: &'a Schema,
    pub options: &'a ParseOptions,
    pub breadcrumb: Breadcrumb,
}

impl<'a> ParseContext<'a> {
    pub fn new(records: &'a [LineRecord], schema: &'a Schema, options: &'a ParseOptions) -> Self {
        Self {
            records,
            schema,
            options,
            breadcrumb: Breadcrumb::new(),
        }
    }

    /// Nesting level of a header: the deeper of where the classifier put it
    /// and where its schema rule says it belongs.
    pub fn header_level(record: &LineRecord, entry: Option<&SchemaEntry>) -> usize {
        entry.map_or(record.level, |entry| record.level.max(entry.level))
    }

    /// Section rule for a header title, if any.
    pub fn section_for(&self, title: &str) -> Option<&'a SchemaEntry> {
        let schema: &'a Schema = self.schema;
        schema.section(&headless_camel(title))
    }

    /// Record `record` in the breadcrumb and look up its field rule.
    pub fn resolve_field(&mut self, record: &LineRecord) -> Option<&'a SchemaEntry> {
        let candidate = headless_camel(record.label());
        self.breadcrumb.update(record.level, &candidate);
        let path = self.breadcrumb.combined(record.level);
        let schema: &'a Schema = self.schema;
        schema.exact(&path).filter(|entry| !entry.is_section())
    }
}

/// A finished segment and the index of the last record it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    pub name: &'static str,
    pub value: Value,
    pub end: usize,
}

/// Where an assigned value lands inside the working entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Placement {
    Top(String),
    Grouped {
        dict_name: &'static str,
        key: &'static str,
    },
    Appended(&'static str),
    /// Held in the running comment list until the entry is finished.
    Comment,
}

impl Placement {
    pub(crate) fn for_field(key: &str, entry: Option<&SchemaEntry>) -> Self {
        if key == COMMENTS_KEY {
            return Placement::Comment;
        }
        let Some(entry) = entry else {
            return Placement::Top(key.to_string());
        };
        match entry.shape {
            FieldShape::Dict {
                dict_name: Some(dict_name),
            } => Placement::Grouped {
                dict_name,
                key: entry.output_key(),
            },
            FieldShape::List { sub_type: None } => Placement::Appended(entry.output_key()),
            _ => Placement::Top(entry.output_key().to_string()),
        }
    }

    /// Slot used to detect a repeated key.
    fn slot(&self) -> Option<String> {
        match self {
            Placement::Top(key) => Some(key.clone()),
            Placement::Grouped { dict_name, key } => Some(format!("{dict_name}.{key}")),
            Placement::Appended(_) | Placement::Comment => None,
        }
    }
}

/// The entry currently being filled.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkingEntry {
    fields: Map<String, Value>,
    seen: HashSet<String>,
    touched: bool,
}

impl WorkingEntry {
    /// A fresh entry carrying the rule's `pre` defaults.
    pub(crate) fn prefilled(group: &SchemaEntry) -> Self {
        let fields = group
            .pre
            .iter()
            .map(|(key, value)| ((*key).to_string(), Value::from(*value)))
            .collect();
        Self {
            fields,
            ..Self::default()
        }
    }

    pub(crate) fn holds(&self, placement: &Placement) -> bool {
        placement
            .slot()
            .is_some_and(|slot| self.seen.contains(&slot))
    }

    /// Whether any line besides `Source:` landed here.
    pub(crate) fn has_data(&self, kvs: &KeyValueState) -> bool {
        self.touched || !kvs.comments.is_empty()
    }

    pub(crate) fn place(&mut self, placement: Placement, value: Value) {
        if let Some(slot) = placement.slot() {
            if slot != SOURCE_KEY {
                self.touched = true;
            }
            self.seen.insert(slot);
        }
        match placement {
            Placement::Top(key) => {
                self.fields.insert(key, value);
            }
            Placement::Grouped { dict_name, key } => {
                let group = self
                    .fields
                    .entry(dict_name)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !group.is_object() {
                    *group = Value::Object(Map::new());
                }
                if let Value::Object(group) = group {
                    group.insert(key.to_string(), value);
                }
            }
            Placement::Appended(name) => {
                self.touched = true;
                let list = self
                    .fields
                    .entry(name)
                    .or_insert_with(|| Value::Array(Vec::new()));
                match list {
                    Value::Array(items) => items.push(value),
                    other => *other = Value::Array(vec![value]),
                }
            }
            Placement::Comment => {}
        }
    }

    /// Back-fill the running segment values and hand back the fields.
    pub(crate) fn finish(mut self, kvs: &mut KeyValueState) -> Map<String, Value> {
        if !self.fields.contains_key(CATEGORY_KEY) && !kvs.category.is_empty() {
            self.fields
                .insert(CATEGORY_KEY.to_string(), Value::from(kvs.category.as_str()));
        }
        if !kvs.comments.is_empty() {
            let comments = std::mem::take(&mut kvs.comments);
            self.fields
                .insert(COMMENTS_KEY.to_string(), Value::from(comments));
        }
        if !self.fields.contains_key(SOURCE_KEY) && !kvs.source.is_empty() {
            self.fields
                .insert(SOURCE_KEY.to_string(), Value::from(kvs.source.as_str()));
        }
        if !self.fields.contains_key(CLAIM_NUMBER_KEY) && !kvs.claim_number.is_empty() {
            self.fields.insert(
                CLAIM_NUMBER_KEY.to_string(),
                Value::from(kvs.claim_number.as_str()),
            );
        }
        self.fields
    }
}

/// Collects finished entries. With claim nesting, line items (entries that
/// carry a `lineNumber`) go into the `details` list of the latest claim.
#[derive(Debug, Default)]
pub(crate) struct EntrySink {
    entries: Vec<Value>,
    nest_claims: bool,
}

impl EntrySink {
    pub(crate) fn new(nest_claims: bool) -> Self {
        Self {
            entries: Vec::new(),
            nest_claims,
        }
    }

    /// Finish `working` into the list unless nothing was written to it.
    pub(crate) fn flush(&mut self, working: WorkingEntry, kvs: &mut KeyValueState) {
        if working.has_data(kvs) {
            let entry = working.finish(kvs);
            self.push(entry);
        }
    }

    fn push(&mut self, entry: Map<String, Value>) {
        if !(self.nest_claims && entry.contains_key(LINE_NUMBER_KEY)) {
            self.entries.push(Value::Object(entry));
            return;
        }
        if !matches!(self.entries.last(), Some(Value::Object(_))) {
            tracing::debug!("claim line without a claim; opening an empty claim");
            self.entries.push(Value::Object(Map::new()));
        }
        if let Some(Value::Object(claim)) = self.entries.last_mut() {
            let details = claim
                .entry(DETAILS_KEY)
                .or_insert_with(|| Value::Array(Vec::new()));
            match details {
                Value::Array(items) => items.push(Value::Object(entry)),
                other => *other = Value::Array(vec![Value::Object(entry)]),
            }
        }
    }

    pub(crate) fn into_value(self) -> Value {
        Value::Array(self.entries)
    }
}

/// Build the segment opened by `records[start]` with the generic rules.
///
/// With `nest_claims`, claim line items nest under their claim and a
/// promoted `Claim Number:` header opens a new claim.
pub fn build_segment(
    ctx: &mut ParseContext<'_>,
    start: usize,
    entry: &SchemaEntry,
    nest_claims: bool,
) -> Result<SegmentOutcome> {
    let records = ctx.records;
    let head = &records[start];
    let segment_level = if head.is_header() {
        ParseContext::header_level(head, Some(entry))
    } else {
        entry.level
    };
    ctx.breadcrumb.update(segment_level, entry.name);

    let repeats = entry.repeats();
    let mut kvs = KeyValueState::new();
    kvs.category = head.label().trim().to_string();
    let mut sink = EntrySink::new(nest_claims);
    let mut group = entry;
    let mut working = WorkingEntry::prefilled(group);

    let mut index = start + 1;
    while index < records.len() {
        let record = &records[index];

        if record.is_header() && !record.has_pair() {
            let sub = ctx.section_for(&record.text);
            let level = ParseContext::header_level(record, sub);
            if level <= segment_level || !repeats {
                break;
            }
            sink.flush(std::mem::take(&mut working), &mut kvs);
            group = sub.unwrap_or(entry);
            let slot_name =
                sub.map_or_else(|| headless_camel(&record.text), |sub| sub.name.to_string());
            ctx.breadcrumb.update(level, &slot_name);
            kvs.category = record.text.trim().to_string();
            working = WorkingEntry::prefilled(group);
            tracing::trace!(line = record.line_number, group = group.name, "sub-header");
            index += 1;
            continue;
        }

        if record.is_header() && nest_claims {
            // A claim whose introducing divider pair is missing.
            sink.flush(std::mem::take(&mut working), &mut kvs);
            group = ctx.section_for(DEFAULT_CLAIM_TITLE).unwrap_or(entry);
            let group_level = segment_level + 1;
            if record.level > group_level {
                ctx.breadcrumb.update(group_level, group.name);
            }
            kvs.category = DEFAULT_CLAIM_TITLE.to_string();
            working = WorkingEntry::prefilled(group);
        }

        let field = ctx.resolve_field(record);
        assign(record, field, &mut kvs, ctx.options)?;

        if is_address_start(&kvs.key) {
            let (address, last) = read_address_block(records, index);
            let placement = Placement::Top(ADDRESS_KEY.to_string());
            if repeats && working.holds(&placement) {
                sink.flush(std::mem::take(&mut working), &mut kvs);
                working = WorkingEntry::prefilled(group);
            }
            working.place(placement, Value::Object(address.into_map()));
            index = last + 1;
            continue;
        }

        let placement = Placement::for_field(&kvs.key, field);
        if repeats && working.holds(&placement) {
            sink.flush(std::mem::take(&mut working), &mut kvs);
            working = WorkingEntry::prefilled(group);
        }
        working.place(placement, std::mem::take(&mut kvs.value));
        index += 1;
    }

    let value = if repeats {
        sink.flush(working, &mut kvs);
        sink.into_value()
    } else {
        Value::Object(working.finish(&mut kvs))
    };
    Ok(SegmentOutcome {
        name: entry.name,
        value,
        end: index - 1,
    })
}
