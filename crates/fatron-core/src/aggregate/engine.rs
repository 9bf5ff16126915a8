//! Reclassification of declared subtotals into TRON aggregator buckets.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::tables::{
    ClassificationTables, DEFAULT_TABLES, FALLBACK_BUCKET, GENERIC_MCDT_BUCKET, GRAND_TOTAL_LABEL,
    NURSING_BUCKET, UNMAPPED_CODE,
};
use crate::models::invoice::{AggregatedBucket, DeclaredSubtotal, LineItem};

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    /// Buckets grouped by (description, code), grand-total row last.
    pub buckets: Vec<AggregatedBucket>,
    /// Reconciliation and mapping warnings to surface to the operator.
    pub warnings: Vec<String>,
}

/// Aggregation engine over a set of classification tables.
pub struct AggregationEngine<'a> {
    tables: &'a ClassificationTables,
}

impl<'a> AggregationEngine<'a> {
    /// Engine with the compiled-in default tables.
    pub fn with_defaults() -> AggregationEngine<'static> {
        AggregationEngine {
            tables: &DEFAULT_TABLES,
        }
    }

    /// Engine with injected tables (variant coverage in tests).
    pub fn new(tables: &'a ClassificationTables) -> Self {
        Self { tables }
    }

    /// Reclassify the declared subtotals, decomposing the diagnostics
    /// section by item-level keywords, and group into output buckets with
    /// a single synthetic grand-total row appended.
    pub fn aggregate(
        &self,
        subtotals: &[DeclaredSubtotal],
        items: &[LineItem],
    ) -> AggregationResult {
        let mut result = AggregationResult::default();
        let mut contributions: Vec<(&'static str, Decimal)> = Vec::new();

        for subtotal in subtotals {
            if self.tables.has_nursing_prefix(&subtotal.section) {
                // Section-code prefix routes the full declared total to
                // nursing regardless of the rest of the label.
                contributions.push((NURSING_BUCKET, subtotal.declared_total));
            } else if self.tables.is_mcdt_label(&subtotal.section) {
                self.decompose_mcdt(subtotal, items, &mut contributions, &mut result.warnings);
            } else {
                let canonical = self
                    .tables
                    .canonical_for_label(&subtotal.section)
                    .unwrap_or(FALLBACK_BUCKET);
                contributions.push((canonical, subtotal.declared_total));
            }
        }

        debug!("{} bucket contributions before grouping", contributions.len());
        self.group(contributions, &mut result);
        result
    }

    /// Decompose the diagnostics section from the matching line items
    /// instead of trusting the single declared figure.
    fn decompose_mcdt(
        &self,
        subtotal: &DeclaredSubtotal,
        items: &[LineItem],
        contributions: &mut Vec<(&'static str, Decimal)>,
        warnings: &mut Vec<String>,
    ) {
        let mut dressing_total = Decimal::ZERO;
        let mut subtype_totals: Vec<(&'static str, Decimal)> = Vec::new();

        for item in items {
            let pre_tax = match item.total_before_tax {
                Some(v) => v,
                None => continue,
            };

            if self.tables.is_dressing(&item.description) {
                // Dressings are mis-filed under diagnostics in this layout
                // family; reroute them to nursing.
                dressing_total += pre_tax;
            } else if let Some(canonical) = self.tables.mcdt_subtype_for(&item.description) {
                match subtype_totals.iter_mut().find(|(c, _)| *c == canonical) {
                    Some((_, total)) => *total += pre_tax,
                    None => subtype_totals.push((canonical, pre_tax)),
                }
            }
        }

        if dressing_total > Decimal::ZERO {
            contributions.push((NURSING_BUCKET, dressing_total));
        }

        if subtype_totals.is_empty() {
            // No sub-type keyword matched any item: fall back to the whole
            // remainder under the generic diagnostics bucket.
            contributions.push((GENERIC_MCDT_BUCKET, subtotal.declared_total - dressing_total));
            return;
        }

        let classified: Decimal = subtype_totals.iter().map(|(_, total)| *total).sum();
        let shortfall = subtotal.declared_total - dressing_total - classified;
        if shortfall != Decimal::ZERO {
            // Items undetected or mis-described; the difference is dropped,
            // not reconciled into a residual bucket.
            warn!(
                "MCDT decomposition differs from declared total by {}",
                shortfall
            );
            warnings.push(format!(
                "Secção MCDT: diferença de {} € entre o total declarado e os itens classificados",
                shortfall
            ));
        }

        contributions.extend(subtype_totals);
    }

    /// Group contributions by (description, code) preserving first-seen
    /// order, then append the grand-total row.
    fn group(&self, contributions: Vec<(&'static str, Decimal)>, result: &mut AggregationResult) {
        for (canonical, amount) in contributions {
            let code = match self.tables.code_for(canonical) {
                Some(code) => code.to_string(),
                None => {
                    result.warnings.push(format!(
                        "Descrição TRON sem código no mapa: {canonical}"
                    ));
                    UNMAPPED_CODE.to_string()
                }
            };

            match result
                .buckets
                .iter_mut()
                .find(|b| b.description == canonical && b.code == code)
            {
                Some(bucket) => bucket.total += amount,
                None => result.buckets.push(AggregatedBucket {
                    description: canonical.to_string(),
                    code,
                    total: amount,
                }),
            }
        }

        let grand_total: Decimal = result.buckets.iter().map(|b| b.total).sum();
        result.buckets.push(AggregatedBucket {
            description: GRAND_TOTAL_LABEL.to_string(),
            code: String::new(),
            total: grand_total,
        });
    }
}
