// Text extraction: reduces raw job and resume text to the structured fields
// the matching engine consumes. Deterministic; no LLM calls.

pub mod handlers;
pub mod jd_analyzer;
pub mod lexicon;
pub mod resume_parser;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Document contains no extractable text")]
    EmptyDocument,

    #[error("PDF parse error: {0}")]
    Pdf(String),
}
