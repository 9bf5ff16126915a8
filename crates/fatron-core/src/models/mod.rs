//! Data models for extraction results.

pub mod invoice;
pub mod table;

pub use invoice::{
    AggregatedBucket, ClientInfo, DeclaredSubtotal, ExtractionStats, InvoiceMetadata, LineItem,
    ProcessedInvoice, TemplateVariant,
};
pub use table::{Table, ToTable};
