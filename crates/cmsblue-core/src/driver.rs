//! Parse entry points.

use std::path::Path;

use cmsblue_ingest::{read_lines, read_text_file};
use cmsblue_model::{LineRecord, ParseOptions, SchemaEntry, Segments, SectionHandler};
use serde_json::Value;

use crate::builder::{ParseContext, SegmentOutcome, build_segment};
use crate::custom::{build_claim_summary, build_family_history};
use crate::error::Result;
use crate::normalize::headless_camel;
use crate::schema::{MatchMode, Schema, default_schema};

/// Parse a BlueButton export held in memory.
///
/// Malformed dates become empty strings; use [`parse_with_options`] with
/// [`ParseOptions::strict`] to fail on them instead.
pub fn parse(text: &str) -> Result<Segments> {
    parse_with_options(text, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Segments> {
    parse_lines_with_options(&read_lines(text), options)
}

/// Read and parse an export file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Segments> {
    let text = read_text_file(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read export");
    parse_with_options(&text, options)
}

pub fn parse_lines(records: &[LineRecord]) -> Result<Segments> {
    parse_lines_with_options(records, &ParseOptions::default())
}

pub fn parse_lines_with_options(
    records: &[LineRecord],
    options: &ParseOptions,
) -> Result<Segments> {
    parse_lines_with_schema(records, default_schema(), options)
}

/// Parse classified lines against `schema`.
///
/// Each recognised section line opens a segment; everything else at this
/// level (unknown sections and their bodies, stray preamble text) is skipped.
pub fn parse_lines_with_schema(
    records: &[LineRecord],
    schema: &Schema,
    options: &ParseOptions,
) -> Result<Segments> {
    let mut ctx = ParseContext::new(records, schema, options);
    let mut segments = Segments::new();
    let mut seen_header = false;

    let mut index = 0;
    while index < records.len() {
        let record = &records[index];
        let in_preamble = !seen_header;
        seen_header |= record.is_header();

        let Some(entry) = dispatch_entry(&mut ctx, record, in_preamble) else {
            if record.is_header() && !record.has_pair() {
                tracing::debug!(
                    line = record.line_number,
                    title = %record.text,
                    "skipping unknown section"
                );
            }
            index += 1;
            continue;
        };

        tracing::debug!(
            segment = entry.name,
            line = record.line_number,
            handler = %entry.handler,
            "segment dispatched"
        );
        let outcome = build(&mut ctx, index, entry)?;
        tracing::debug!(
            segment = outcome.name,
            last_line = records[outcome.end].line_number,
            "segment ended"
        );
        index = outcome.end + 1;
        merge_segment(&mut segments, outcome.name, outcome.value);
    }
    Ok(segments)
}

/// Section rule opened by `record`, if any.
///
/// Headers are looked up by their full breadcrumb path and then by their
/// bare title. Body lines only open a segment before the first header
/// (the document banner), where the substring fallback also applies.
fn dispatch_entry<'a>(
    ctx: &mut ParseContext<'a>,
    record: &LineRecord,
    in_preamble: bool,
) -> Option<&'a SchemaEntry> {
    if record.is_header() && record.has_pair() {
        return None;
    }
    if record.is_body() && !in_preamble {
        return None;
    }
    let candidate = headless_camel(record.label());
    if candidate.is_empty() {
        return None;
    }
    ctx.breadcrumb.update(record.level, &candidate);
    let path = ctx.breadcrumb.combined(record.level);
    let schema: &'a Schema = ctx.schema;
    let entry = schema
        .section(&path)
        .or_else(|| schema.section(&candidate));
    if record.is_header() {
        return entry;
    }
    entry.or_else(|| {
        schema
            .find(&candidate, MatchMode::Substring)
            .filter(|entry| entry.is_section())
    })
}

fn build(ctx: &mut ParseContext<'_>, start: usize, entry: &SchemaEntry) -> Result<SegmentOutcome> {
    match entry.handler {
        SectionHandler::Generic => build_segment(ctx, start, entry, false),
        SectionHandler::FamilyHistory => build_family_history(ctx, start, entry),
        SectionHandler::ClaimSummary => build_claim_summary(ctx, start, entry),
    }
}

/// Lists from a repeated segment are concatenated; anything else replaces
/// the earlier value in place.
fn merge_segment(segments: &mut Segments, name: &str, value: Value) {
    if let Value::Array(more) = &value
        && let Some(Value::Array(existing)) = segments.get_mut(name)
    {
        existing.extend(more.iter().cloned());
        return;
    }
    segments.insert(name.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_concatenates_lists() {
        let mut segments = Segments::new();
        merge_segment(&mut segments, "allergies", json!([{ "a": 1 }]));
        merge_segment(&mut segments, "patient", json!({ "x": 1 }));
        merge_segment(&mut segments, "allergies", json!([{ "a": 2 }]));
        merge_segment(&mut segments, "patient", json!({ "x": 2 }));
        assert_eq!(segments["allergies"], json!([{ "a": 1 }, { "a": 2 }]));
        assert_eq!(segments["patient"], json!({ "x": 2 }));
        let keys: Vec<&str> = segments.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["allergies", "patient"]);
    }

    #[test]
    fn body_lines_after_first_header_do_not_dispatch() {
        let records = read_lines("----------\nUnknown Things\n----------\nMYMEDICARE.GOV PERSONAL HEALTH INFORMATION\n");
        let segments = parse_lines(&records).expect("parse");
        assert!(segments.is_empty());
    }

    #[test]
    fn banner_opens_header_segment() {
        let segments = parse("MYMEDICARE.GOV PERSONAL HEALTH INFORMATION\n").expect("parse");
        assert_eq!(
            segments["header"]["title"],
            json!("MyMedicare.gov Personal Health Information")
        );
    }

    #[test]
    fn custom_schema() {
        let table = [SchemaEntry::list_section("notes", "notes")];
        let schema = Schema::new(&table).expect("schema");
        let records = read_lines("----------\nNotes\n----------\nText: one\nText: two\n");
        let segments =
            parse_lines_with_schema(&records, &schema, &ParseOptions::default()).expect("parse");
        assert_eq!(
            segments["notes"],
            json!([
                { "text": "one", "category": "Notes" },
                { "text": "two", "category": "Notes" }
            ])
        );
    }
}
