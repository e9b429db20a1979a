use std::path::Path;

use super::{normalize_whitespace, ExtractError};

/// Reads a plain-text resume. Invalid UTF-8 sequences are dropped, never reported.
pub(super) fn read_txt_text(path: &Path) -> Result<String, ExtractError> {
    let raw = std::fs::read(path)?;
    Ok(normalize_whitespace(&decode_utf8_dropping_invalid(&raw)))
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
