//! PDF text extraction using lopdf and pdf-extract.
//!
//! The extraction pipeline consumes text lines only; pages without a text
//! layer contribute nothing (scanned/image-only pages are out of scope).

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// Linearized text of one document: the concatenated full text plus the
/// ordered sequence of trimmed, non-empty lines. Produced once per run and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Full concatenated text.
    pub full_text: String,
    /// Trimmed, non-empty lines in document order.
    pub lines: Vec<String>,
    /// Number of pages in the source document.
    pub page_count: u32,
}

impl DocumentText {
    /// Build directly from plain text (already-linearized input, tests).
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        Self {
            full_text: text.to_string(),
            lines,
            page_count: 1,
        }
    }
}

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from memory.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        self.document = Some(doc);
        Ok(())
    }

    /// Number of pages in the loaded document.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Extract the full text layer and linearize it into trimmed lines.
    pub fn linearize(&self) -> Result<DocumentText> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let full_text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let lines: Vec<String> = full_text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();

        debug!(
            "Linearized {} pages into {} lines ({} chars)",
            self.page_count(),
            lines.len(),
            full_text.len()
        );

        Ok(DocumentText {
            full_text,
            lines,
            page_count: self.page_count(),
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}
