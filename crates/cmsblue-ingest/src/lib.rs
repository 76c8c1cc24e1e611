//! Reading and line classification for MyMedicare.gov BlueButton exports.
//!
//! # Features
//!
//! - **Safe file loading**: size limit, UTF-16 rejection, UTF-8 BOM stripping
//! - **Line classification**: HEADER/BODY tagging with nesting levels
//! - **Claim context**: running claim numbers carried onto every line
//! - **Known repairs**: Part D block renaming and unheaded claim promotion
//!
//! # Example
//!
//! ```ignore
//! use cmsblue_ingest::{read_lines, read_text_file};
//!
//! let text = read_text_file(Path::new("bluebutton.txt"))?;
//! for record in read_lines(&text) {
//!     println!("{} {} {}", record.line_type, record.level, record.text);
//! }
//! ```

mod classify;
mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Classification ===
pub use classify::{DEFAULT_CLAIM_TITLE, DIVIDER, PART_D_TITLE, is_divider, read_lines};

// === File Reading ===
pub use reader::{
    MAX_TEXT_FILE_SIZE, check_file_size_with_limit, read_lines_from_path, read_text_file,
    read_text_file_with_limit,
};
