//! Error types for the fatron-core library.

use thiserror::Error;

/// Main error type for the fatron library.
#[derive(Error, Debug)]
pub enum FatronError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract the text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to invoice field extraction.
///
/// Extraction is deliberately forgiving: missing header fields become empty
/// strings and unparseable numeric cells become missing values. The only
/// hard failure is a document where no line item matched at all.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No line item matched anywhere in the document.
    #[error("no line items found in document")]
    NoLineItems,
}

/// Result type for the fatron library.
pub type Result<T> = std::result::Result<T, FatronError>;
