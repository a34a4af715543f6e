//! Reference-text extraction for the few-shot examples file.
//!
//! The format is resolved once from the file extension into a `FormatTag`,
//! which picks the extractor. Absence of a reader for a format is a
//! configuration error surfaced to the caller, not a runtime probe.

use std::fs;
use std::path::Path;

use crate::errors::AppError;

/// Supported reference-file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    PlainText,
    Pdf,
}

impl FormatTag {
    /// Resolves the format from the file extension. Markdown is read as
    /// plain text. Anything else (including DOCX) is unsupported here.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" | "md" => Ok(FormatTag::PlainText),
            "pdf" => Ok(FormatTag::Pdf),
            other => Err(AppError::Validation(format!(
                "Unsupported few-shot file format '.{other}' (expected .txt, .md, or .pdf)"
            ))),
        }
    }
}

/// Reads the full text of a reference file using the extractor selected by
/// its format tag.
pub fn extract_text(path: &Path) -> Result<String, AppError> {
    match FormatTag::from_path(path)? {
        FormatTag::PlainText => Ok(fs::read_to_string(path)?),
        FormatTag::Pdf => pdf_extract::extract_text(path)
            .map_err(|e| AppError::Validation(format!("PDF extraction failed: {e}"))),
    }
}
