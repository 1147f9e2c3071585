//! Word (.docx) format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect a zip container from a file path.
///
/// # Example
/// ```no_run
/// use thesisfmt::detect::detect_format_from_path;
///
/// detect_format_from_path("thesis.docx").unwrap();
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::UnknownFormat)?;
    detect_format_from_bytes(&header)
}

/// Detect a zip container from leading bytes.
///
/// Whether the archive actually holds `word/document.xml` is checked when
/// the package is opened.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<()> {
    if data.starts_with(ZIP_MAGIC) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check whether a path looks like a `.docx` file by extension and magic.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    has_extension && detect_format_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zip_magic() {
        assert!(detect_format_from_bytes(b"PK\x03\x04rest").is_ok());
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1.7"),
            Err(Error::UnknownFormat)
        ));
        assert!(detect_format_from_bytes(b"PK").is_err());
    }
}
