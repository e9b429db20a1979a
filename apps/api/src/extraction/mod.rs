//! Document text extraction. Turns an uploaded resume file into one flat,
//! single-spaced string.
//!
//! Dispatch is by file extension. PDF and DOCX readers sit behind the `pdf` and
//! `docx` cargo features; a build without one reports it through
//! [`capabilities`] and fails extraction with `MissingDependency` before any
//! parsing is attempted.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "docx")]
mod docx;
#[cfg(feature = "pdf")]
mod pdf;
mod txt;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type. Supported: .pdf, .docx, .txt")]
    UnsupportedFormat,

    #[error("{0} support is not available in this build")]
    MissingDependency(&'static str),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),
}

type Reader = fn(&Path) -> Result<String, ExtractError>;

#[cfg(feature = "pdf")]
const PDF_READER: Option<Reader> = Some(pdf::read_pdf_text as Reader);
#[cfg(not(feature = "pdf"))]
const PDF_READER: Option<Reader> = None;

#[cfg(feature = "docx")]
const DOCX_READER: Option<Reader> = Some(docx::read_docx_text as Reader);
#[cfg(not(feature = "docx"))]
const DOCX_READER: Option<Reader> = None;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves the format from a file name or path, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(ExtractError::UnsupportedFormat)?;

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(ExtractError::UnsupportedFormat),
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Txt => "TXT",
        }
    }

    /// The reader compiled into this build, if any.
    fn reader(self) -> Option<Reader> {
        match self {
            DocumentFormat::Pdf => PDF_READER,
            DocumentFormat::Docx => DOCX_READER,
            DocumentFormat::Txt => Some(txt::read_txt_text as Reader),
        }
    }

    pub fn is_available(self) -> bool {
        self.reader().is_some()
    }
}

/// Which readers this build carries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub pdf: bool,
    pub docx: bool,
    pub txt: bool,
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        pdf: DocumentFormat::Pdf.is_available(),
        docx: DocumentFormat::Docx.is_available(),
        txt: DocumentFormat::Txt.is_available(),
    }
}

/// Extracts normalized text from the file at `path`, dispatching on its extension.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path)?;
    let read = format
        .reader()
        .ok_or(ExtractError::MissingDependency(format.label()))?;
    read(path)
}

/// Collapses every whitespace run (newlines and tabs included) to one space and trims the ends.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
