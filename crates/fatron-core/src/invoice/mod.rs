//! Invoice field extraction and pipeline.

mod parser;
pub mod rules;
pub mod variant;

pub use parser::InvoicePipeline;
pub use variant::select_variant;
