//! Loading export files from disk.

use std::path::Path;

use cmsblue_model::LineRecord;

use crate::classify::read_lines;
use crate::error::{IngestError, Result};

/// Maximum accepted export size (16 MB).
///
/// Single-beneficiary exports are a few hundred kilobytes at most.
pub const MAX_TEXT_FILE_SIZE: u64 = 16 * 1024 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn io_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Read an export as UTF-8 text.
///
/// A UTF-8 byte-order mark is stripped; UTF-16 files are rejected.
pub fn read_text_file(path: &Path) -> Result<String> {
    read_text_file_with_limit(path, MAX_TEXT_FILE_SIZE)
}

/// Read an export as UTF-8 text, rejecting files above `max_size` bytes.
pub fn read_text_file_with_limit(path: &Path, max_size: u64) -> Result<String> {
    check_file_size_with_limit(path, max_size)?;
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let text = decode_text(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read BlueButton export");
    Ok(text)
}

/// Read and classify an export in one step.
pub fn read_lines_from_path(path: &Path) -> Result<Vec<LineRecord>> {
    let text = read_text_file(path)?;
    Ok(read_lines(&text))
}

fn decode_text(path: &Path, bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn test_read_text_file_strips_bom() {
        let file = create_temp_file(b"\xEF\xBB\xBFDemographic\n");
        let text = read_text_file(file.path()).expect("read text");
        assert_eq!(text, "Demographic\n");
    }

    #[test]
    fn test_read_text_file_rejects_utf16() {
        let file = create_temp_file(&[0xFF, 0xFE, b'D', 0x00]);
        let result = read_text_file(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_read_text_file_rejects_invalid_utf8() {
        let file = create_temp_file(b"Name: J\xC3\x28hn\n");
        let result = read_text_file(file.path());
        assert!(matches!(
            result,
            Err(IngestError::InvalidUtf8 { valid_up_to: 7, .. })
        ));
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_file(b"0123456789");
        let result = read_text_file_with_limit(file.path(), 4);
        assert!(matches!(
            result,
            Err(IngestError::FileTooLarge {
                size: 10,
                max_size: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_text_file(Path::new("/nonexistent/bluebutton.txt"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
