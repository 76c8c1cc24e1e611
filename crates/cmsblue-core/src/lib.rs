//! Schema-driven conversion of MyMedicare.gov BlueButton text exports into
//! an ordered JSON document.
//!
//! # Pipeline
//!
//! 1. [`read_lines`] classifies the text into HEADER/BODY records.
//! 2. The driver walks the records and opens a segment at every section the
//!    schema knows about.
//! 3. The segment builder resolves each body line against the schema via the
//!    breadcrumb path, assigns a normalized key and value, and builds the
//!    segment's dict or list of dicts. Family history and claims use custom
//!    handlers.
//!
//! # Example
//!
//! ```
//! let text = "----------\nDemographic\n----------\nFirst Name: John\nDate of Birth: 01/31/1950\n";
//! let segments = cmsblue_core::parse(text).unwrap();
//! assert_eq!(segments["patient"]["firstName"], "John");
//! assert_eq!(segments["patient"]["dateOfBirth"], "19500131");
//! ```

mod address;
mod assign;
mod breadcrumb;
mod builder;
mod custom;
mod driver;
mod error;
mod normalize;
mod schema;
mod states;
mod table;

pub mod datetime;

// === Error Types ===
pub use error::{ParseError, Result, SchemaError};

// === Parsing ===
pub use driver::{
    parse, parse_file, parse_lines, parse_lines_with_options, parse_lines_with_schema,
    parse_with_options,
};

// === Schema ===
pub use schema::{MatchMode, Schema, default_schema};
pub use table::SCHEMA_TABLE;

// === Building Blocks ===
pub use address::{Address, is_address_start, read_address_block};
pub use assign::{KeyValueState, assign, normalize_source};
pub use breadcrumb::{BREADCRUMB_DEPTH, Breadcrumb};
pub use builder::{ParseContext, SegmentOutcome, build_segment};
pub use custom::{build_claim_summary, build_family_history};
pub use datetime::{DateFormatError, LEGACY_UTC_OFFSET, parse_date, parse_time};
pub use normalize::headless_camel;
pub use states::{US_STATE_CODES, is_state_code};

// === Re-exports ===
pub use cmsblue_ingest::read_lines;
pub use cmsblue_model::{BadDatePolicy, LineRecord, LineType, ParseOptions, Segments};
