//! Key/value assignment for a single line.

use cmsblue_model::{BadDatePolicy, FieldShape, LineRecord, ParseOptions, SchemaEntry};
use serde_json::{Map, Value, json};

use crate::datetime::{DateFormatError, parse_date, parse_time};
use crate::error::{ParseError, Result};
use crate::normalize::headless_camel;

pub const COMMENTS_KEY: &str = "comments";
pub const SOURCE_KEY: &str = "source";
pub const EFFECTIVE_TIME_KEY: &str = "effectiveTime";

/// Working state for the line being assigned plus the running values of the
/// segment it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueState {
    /// Normalized key of the last assigned line.
    pub key: String,
    pub value: Value,
    /// Running segment source, already normalized.
    pub source: String,
    /// Comment lines not yet written to an entry.
    pub comments: Vec<String>,
    pub claim_number: String,
    pub line_number: usize,
    /// Title of the governing header.
    pub category: String,
}

impl KeyValueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assigned value as text, if it is a string.
    pub fn text(&self) -> &str {
        self.value.as_str().unwrap_or_default()
    }
}

/// Map the export's source labels onto the names used in output.
pub fn normalize_source(raw: &str) -> String {
    let value = raw.trim();
    match value.to_ascii_uppercase().as_str() {
        "SELF-ENTERED" => "patient".to_string(),
        "MYMEDICARE.GOV" => "MyMedicare.gov".to_string(),
        upper => upper.to_string(),
    }
}

fn is_date_key(key: &str) -> bool {
    key.to_ascii_uppercase().contains("DATE")
        || key.eq_ignore_ascii_case("dob")
        || key.eq_ignore_ascii_case("dod")
}

/// Keys like `06/01/2015 01` come from a timestamp line split on its colon.
fn is_timestamp_key(key: &str) -> bool {
    key.chars().nth(2) == Some('/')
}

fn apply_policy(
    parsed: std::result::Result<String, DateFormatError>,
    record: &LineRecord,
    key: &str,
    options: &ParseOptions,
) -> Result<String> {
    match parsed {
        Ok(value) => Ok(value),
        Err(source) => match options.on_bad_date {
            BadDatePolicy::Raise => Err(ParseError::Format {
                line: record.line_number,
                key: key.to_string(),
                source,
            }),
            BadDatePolicy::Empty => {
                tracing::warn!(
                    line = record.line_number,
                    key,
                    expected = source.expected,
                    "malformed date replaced with empty value"
                );
                Ok(String::new())
            }
        },
    }
}

/// Derive the normalized key and value of `record` into `kvs`.
///
/// `entry` is the schema rule the line resolved to, if any; it names header
/// lines that carry no `key: value` pair.
pub fn assign(
    record: &LineRecord,
    entry: Option<&SchemaEntry>,
    kvs: &mut KeyValueState,
    options: &ParseOptions,
) -> Result<()> {
    kvs.line_number = record.line_number;

    let (mut key, mut value) = match record.text.split_once(':') {
        Some((label, rest)) => match headless_camel(label) {
            label if label.is_empty() => (COMMENTS_KEY.to_string(), Value::from(rest.trim())),
            label => (label, Value::from(rest.trim())),
        },
        None if record.is_header() => {
            let text = record.text.trim();
            let key = match entry {
                Some(entry) => entry.name.to_string(),
                None => headless_camel(text),
            };
            kvs.category = text.to_string();
            let value = match entry.map(|e| e.shape) {
                Some(FieldShape::Dict { .. }) => {
                    let mut wrapped = Map::new();
                    wrapped.insert(key.clone(), Value::from(text));
                    Value::Object(wrapped)
                }
                _ => Value::from(text),
            };
            (key, value)
        }
        None => (COMMENTS_KEY.to_string(), Value::from(record.text.trim())),
    };

    if key.eq_ignore_ascii_case(SOURCE_KEY) {
        let source = normalize_source(value.as_str().unwrap_or_default());
        kvs.source.clone_from(&source);
        key = SOURCE_KEY.to_string();
        value = Value::from(source);
    }

    if is_timestamp_key(&key) {
        let stamp = apply_policy(parse_time(&record.text), record, EFFECTIVE_TIME_KEY, options)?;
        key = EFFECTIVE_TIME_KEY.to_string();
        value = json!({ "value": stamp });
    } else if is_date_key(&key)
        && let Some(raw) = value.as_str()
    {
        value = Value::from(apply_policy(parse_date(raw), record, &key, options)?);
    }

    key.retain(|c| c != '/' && c != '-');

    if key == COMMENTS_KEY
        && let Some(comment) = value.as_str()
        && !comment.is_empty()
    {
        kvs.comments.push(comment.to_string());
    }
    if !record.claim_number.is_empty() {
        kvs.claim_number.clone_from(&record.claim_number);
    }

    tracing::trace!(line = record.line_number, key = %key, "assigned");
    kvs.key = key;
    kvs.value = value;
    Ok(())
}
