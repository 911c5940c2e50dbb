// PDF text extraction, a thin wrapper over the `pdf-extract` crate API.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
}

/// Extracts all recoverable text from a PDF held fully in memory. Pages
/// that yield no text contribute nothing; an empty result is a valid value
/// and blankness is the caller's decision.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))
}
