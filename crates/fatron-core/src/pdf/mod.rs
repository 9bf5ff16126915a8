//! PDF text linearization.

mod extractor;

pub use extractor::{DocumentText, PdfExtractor};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
