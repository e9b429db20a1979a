use std::path::Path;

use super::{normalize_whitespace, ExtractError};

/// Reads a PDF page by page; pages without a text layer contribute an empty string.
pub(super) fn read_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    normalize_whitespace(&pages.join(" "))
}
