//! Rule-based extractors for the invoice layout family.

pub mod amounts;
pub mod header;
pub mod items;
pub mod patterns;
pub mod subtotals;

pub use amounts::{format_eur_amount, parse_eur_amount};
pub use header::extract_header;
pub use items::{extract_line_items, normalize_amount_run, NUMERIC_SLOTS};
pub use subtotals::SubtotalExtractor;
