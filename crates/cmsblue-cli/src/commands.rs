use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cmsblue_core::{LineRecord, ParseOptions, default_schema, parse_file};
use cmsblue_ingest::read_lines_from_path;
use cmsblue_model::SchemaEntry;
use tracing::{info, info_span};

use cmsblue_cli::output::{
    Demographics, SegmentRow, demographics, render_json, resolve_options, segment_rows,
};

use crate::cli::{DemographicsArgs, LinesArgs, ParseArgs};

/// What a `parse` run produced.
pub struct ParseReport {
    pub input: PathBuf,
    /// Destination file, or `None` when the JSON went to stdout.
    pub output: Option<PathBuf>,
    pub segments: Vec<SegmentRow>,
}

pub fn run_parse(args: &ParseArgs) -> Result<ParseReport> {
    let span = info_span!("parse", input = %args.input.display());
    let _guard = span.enter();

    let options = resolve_options(args.config.as_deref(), args.on_bad_date.map(Into::into))?;
    let segments = parse_file(&args.input, &options)
        .with_context(|| format!("parse {}", args.input.display()))?;
    info!(segments = segments.len(), on_bad_date = %options.on_bad_date, "export parsed");

    let json = render_json(&segments, args.compact).context("serialize segments")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(output = %path.display(), "json written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write stdout")?;
        }
    }

    Ok(ParseReport {
        input: args.input.clone(),
        output: args.output.clone(),
        segments: segment_rows(&segments),
    })
}

pub fn run_lines(args: &LinesArgs) -> Result<Vec<LineRecord>> {
    let records = read_lines_from_path(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    info!(records = records.len(), "lines classified");
    if args.json {
        let json = serde_json::to_string_pretty(&records).context("serialize lines")?;
        println!("{json}");
    }
    Ok(records)
}

pub fn run_demographics(args: &DemographicsArgs) -> Result<Demographics> {
    let segments = parse_file(&args.input, &ParseOptions::default())
        .with_context(|| format!("parse {}", args.input.display()))?;
    let today = chrono::Local::now().date_naive();
    let summary = demographics(&segments, today);
    let json = serde_json::to_string_pretty(&summary).context("serialize demographics")?;
    println!("{json}");
    Ok(summary)
}

pub fn run_schema() -> &'static [SchemaEntry] {
    default_schema().entries()
}
