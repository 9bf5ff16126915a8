//! Core library for medical invoice processing.
//!
//! This crate provides:
//! - PDF text linearization (lopdf + pdf-extract, text layer only)
//! - Header, line-item and declared-subtotal extraction for one invoice
//!   layout family with two template variants
//! - Reclassification of declared subtotals into TRON aggregator codes,
//!   including item-level decomposition of the MCDT diagnostics section
//! - Rectangular table rendering of every result structure

pub mod aggregate;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use aggregate::{AggregationEngine, AggregationResult, ClassificationTables, DEFAULT_TABLES};
pub use error::{ExtractionError, FatronError, PdfError, Result};
pub use invoice::{select_variant, InvoicePipeline};
pub use models::invoice::{
    AggregatedBucket, ClientInfo, DeclaredSubtotal, ExtractionStats, InvoiceMetadata, LineItem,
    ProcessedInvoice, TemplateVariant,
};
pub use models::table::{Table, ToTable, AGGREGATOR_SHEET_NAME};
pub use pdf::{DocumentText, PdfExtractor};
