//! Rendering and option resolution shared by the `cmsblue` commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use cmsblue_core::{BadDatePolicy, ParseOptions, Segments};
use serde::Serialize;
use serde_json::Value;

/// One row of the post-parse summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRow {
    pub name: String,
    pub shape: &'static str,
    /// Number of entries for list segments, number of keys for dicts.
    pub entries: usize,
}

pub fn segment_rows(segments: &Segments) -> Vec<SegmentRow> {
    segments
        .iter()
        .map(|(name, value)| {
            let (shape, entries) = match value {
                Value::Array(items) => ("list", items.len()),
                Value::Object(fields) => ("dict", fields.len()),
                _ => ("scalar", 1),
            };
            SegmentRow {
                name: name.clone(),
                shape,
                entries,
            }
        })
        .collect()
}

/// Serialize the parsed document, pretty-printed unless `compact`.
pub fn render_json(segments: &Segments, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(segments)
    } else {
        serde_json::to_string_pretty(segments)
    }
}

/// Parse options from an optional JSON config file, with the command-line
/// policy taking precedence over the file.
pub fn resolve_options(
    config: Option<&Path>,
    on_bad_date: Option<BadDatePolicy>,
) -> Result<ParseOptions> {
    let mut options = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<ParseOptions>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ParseOptions::default(),
    };
    if let Some(policy) = on_bad_date {
        options = options.with_on_bad_date(policy);
    }
    Ok(options)
}

/// Identifying fields of the `patient` segment plus the age they imply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Demographics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_initial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// First word of the gender value (`"Male (M)"` gives `"Male"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// `YYYYMMDD`, as normalized by the parser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_age: Option<i32>,
}

/// Pull demographics out of a parsed document, computing the age as of
/// `today`. Missing or empty fields stay `None`.
pub fn demographics(segments: &Segments, today: NaiveDate) -> Demographics {
    let Some(patient) = segments.get("patient").and_then(Value::as_object) else {
        return Demographics::default();
    };
    let text = |key: &str| {
        patient
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let date_of_birth = text("dateOfBirth");
    let num_age = date_of_birth
        .as_deref()
        .and_then(|dob| NaiveDate::parse_from_str(dob, "%Y%m%d").ok())
        .map(|dob| age_on(dob, today));
    Demographics {
        name: text("name"),
        first_name: text("firstName"),
        middle_initial: text("middleInitial"),
        last_name: text("lastName"),
        gender: text("gender")
            .and_then(|gender| gender.split_whitespace().next().map(str::to_string)),
        date_of_birth,
        num_age,
    }
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years - 1
    } else {
        years
    }
}
