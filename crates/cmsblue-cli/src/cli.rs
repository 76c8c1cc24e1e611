//! CLI argument definitions for the BlueButton converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use cmsblue_core::BadDatePolicy;
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cmsblue",
    version,
    about = "Convert MyMedicare.gov BlueButton text exports to JSON",
    long_about = "Convert a MyMedicare.gov BlueButton plain-text export into an ordered JSON \
                  document with one key per recognized section.\n\n\
                  Demographics, contacts, self-reported records, drugs, providers, \
                  insurance plans and claims are supported."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse an export and write the JSON document.
    Parse(ParseArgs),

    /// Show the classified line sequence of an export.
    Lines(LinesArgs),

    /// Print name, gender, date of birth and age from an export.
    Demographics(DemographicsArgs),

    /// List the built-in schema rules.
    Schema,
}

#[derive(Parser)]
pub struct ParseArgs {
    /// BlueButton text export to read.
    #[arg(value_name = "INFILE")]
    pub input: PathBuf,

    /// Write JSON to this file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "OUTFILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long = "compact")]
    pub compact: bool,

    /// Handling of malformed dates (overrides the config file).
    #[arg(long = "on-bad-date", value_enum)]
    pub on_bad_date: Option<BadDateArg>,

    /// JSON file with parse options.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct LinesArgs {
    /// BlueButton text export to read.
    #[arg(value_name = "INFILE")]
    pub input: PathBuf,

    /// Print the records as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct DemographicsArgs {
    /// BlueButton text export to read.
    #[arg(value_name = "INFILE")]
    pub input: PathBuf,
}

/// CLI choices for malformed date handling.
#[derive(Clone, Copy, ValueEnum)]
pub enum BadDateArg {
    /// Stop with an error naming the line.
    Raise,
    /// Keep going with an empty value.
    Empty,
}

impl From<BadDateArg> for BadDatePolicy {
    fn from(arg: BadDateArg) -> Self {
        match arg {
            BadDateArg::Raise => BadDatePolicy::Raise,
            BadDateArg::Empty => BadDatePolicy::Empty,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
