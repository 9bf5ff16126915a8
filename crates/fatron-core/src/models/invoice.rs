//! Result models for a single invoice processing run.
//!
//! Everything here is created fresh per document and discarded afterwards;
//! the only cross-document state in the crate is the static classification
//! tables in [`crate::aggregate::tables`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice template layout variant.
///
/// Two layouts of the same invoice family are recognized. They differ in
/// header field anchors and in the subtotal marker wording; the line-item
/// pattern is shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    /// Original template layout.
    #[default]
    Old,
    /// Newer template layout (distinct field labels).
    New,
}

/// Client identity extracted from the invoice header.
///
/// Fields are soft: an absent anchor yields an empty string, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client (insured person) name.
    pub name: String,
    /// Tax identification number (NIF).
    pub tax_id: String,
}

/// Invoice metadata extracted from the invoice header.
///
/// The schema is unified across template variants; `variant` records which
/// anchor set produced the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceMetadata {
    /// Policy number (apólice).
    pub policy_number: String,
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date, when an anchored date was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    /// Claim/process number (sinistro/processo).
    pub claim_number: String,
    /// Template variant the header was extracted with.
    pub variant: TemplateVariant,
}

/// A single extracted line item.
///
/// The six numeric fields are always populated from a normalized six-slot
/// run: short captures are right-padded with zero, and a token that fails
/// comma-decimal parsing becomes `None` (missing), never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item date (day/month/year in the source).
    pub date: NaiveDate,
    /// Alphanumeric item code.
    pub code: String,
    /// Free-text description.
    pub description: String,
    /// Quantity.
    pub quantity: Option<Decimal>,
    /// Unit value.
    pub unit_value: Option<Decimal>,
    /// Line total before tax.
    pub total_before_tax: Option<Decimal>,
    /// Discount.
    pub discount: Option<Decimal>,
    /// Tax (IVA) amount.
    pub tax: Option<Decimal>,
    /// Line total after tax.
    pub total_after_tax: Option<Decimal>,
}

/// A section subtotal as declared in the source document.
///
/// Declared figures are what the invoice prints for a named section, as
/// opposed to totals recomputed from individual items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredSubtotal {
    /// Section label, trimmed, as printed before the first numeric token.
    pub section: String,
    /// Declared item count for the section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_quantity: Option<Decimal>,
    /// Declared monetary total for the section.
    pub declared_total: Decimal,
}

/// One output row of the reclassification engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBucket {
    /// Canonical TRON aggregator description.
    pub description: String,
    /// TRON aggregator code. Empty only for the grand-total row; the
    /// sentinel `"?"` marks a canonical description missing from the code
    /// map and must be surfaced for operator review.
    pub code: String,
    /// Summed monetary total.
    pub total: Decimal,
}

/// Counters surfaced to the user after a run.
///
/// Line-item matching is a best-effort sieve; these counts let the caller
/// judge how much of the document was actually captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Trimmed, non-empty lines scanned.
    pub lines_scanned: usize,
    /// Lines that matched the line-item pattern.
    pub items_matched: usize,
    /// Lines that matched the subtotal pattern.
    pub subtotals_matched: usize,
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedInvoice {
    /// Client identity.
    pub client: ClientInfo,
    /// Invoice metadata.
    pub metadata: InvoiceMetadata,
    /// Extracted line items, in document order.
    pub items: Vec<LineItem>,
    /// Declared section subtotals, in document order.
    pub subtotals: Vec<DeclaredSubtotal>,
    /// Reclassified aggregator buckets, grand-total row last.
    pub buckets: Vec<AggregatedBucket>,
    /// Extraction warnings (missing fields, unmapped codes, shortfalls).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Extraction counters.
    pub stats: ExtractionStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ProcessedInvoice {
    /// The grand-total row appended by the aggregation engine.
    pub fn grand_total(&self) -> Option<&AggregatedBucket> {
        self.buckets.last().filter(|b| b.code.is_empty())
    }
}
