//! The end-to-end processing pipeline.
//!
//! Strictly linear with one branch point (variant selection). Extraction
//! problems are recovered locally with safe defaults so a run always yields
//! partial results for inspection; the only hard failure is a document with
//! zero extractable line items.

use std::time::Instant;

use tracing::{debug, info};

use crate::aggregate::{AggregationEngine, ClassificationTables, DEFAULT_TABLES};
use crate::error::{ExtractionError, Result};
use crate::invoice::rules::{extract_header, extract_line_items, SubtotalExtractor};
use crate::invoice::variant::select_variant;
use crate::models::invoice::{ExtractionStats, ProcessedInvoice};
use crate::pdf::{DocumentText, PdfExtractor};

/// Single-document processing pipeline.
pub struct InvoicePipeline {
    tables: &'static ClassificationTables,
}

impl InvoicePipeline {
    /// Pipeline with the compiled-in classification tables.
    pub fn new() -> Self {
        Self {
            tables: &DEFAULT_TABLES,
        }
    }

    /// Pipeline with injected tables (tests, variant coverage).
    pub fn with_tables(tables: &'static ClassificationTables) -> Self {
        Self { tables }
    }

    /// Process a PDF document from memory.
    pub fn process(&self, data: &[u8]) -> Result<ProcessedInvoice> {
        let mut extractor = PdfExtractor::new();
        extractor.load(data)?;
        let document = extractor.linearize()?;
        self.process_document(&document)
    }

    /// Process already-linearized text.
    pub fn process_text(&self, text: &str) -> Result<ProcessedInvoice> {
        self.process_document(&DocumentText::from_text(text))
    }

    /// Run the extraction and aggregation stages over linearized text.
    pub fn process_document(&self, document: &DocumentText) -> Result<ProcessedInvoice> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let variant = select_variant(&document.full_text);
        info!(
            "Processing document: {} lines, template variant {:?}",
            document.lines.len(),
            variant
        );

        let (client, metadata) = extract_header(&document.full_text, variant);
        if client.name.is_empty() {
            warnings.push("Nome do cliente não encontrado".to_string());
        }
        if client.tax_id.is_empty() {
            warnings.push("NIF não encontrado".to_string());
        }
        if metadata.invoice_number.is_empty() {
            warnings.push("Número de fatura não encontrado".to_string());
        }

        let items = extract_line_items(&document.lines);
        if items.is_empty() {
            // An empty invoice must never be reported as success.
            return Err(ExtractionError::NoLineItems.into());
        }

        let subtotals = SubtotalExtractor::for_variant(variant).extract(&document.lines);
        if subtotals.is_empty() {
            warnings.push("Nenhum subtotal declarado encontrado".to_string());
        }

        let aggregation = AggregationEngine::new(self.tables).aggregate(&subtotals, &items);
        warnings.extend(aggregation.warnings);

        let stats = ExtractionStats {
            lines_scanned: document.lines.len(),
            items_matched: items.len(),
            subtotals_matched: subtotals.len(),
        };

        debug!(
            "Extracted {} items, {} subtotals, {} buckets",
            stats.items_matched,
            stats.subtotals_matched,
            aggregation.buckets.len()
        );

        Ok(ProcessedInvoice {
            client,
            metadata,
            items,
            subtotals,
            buckets: aggregation.buckets,
            warnings,
            stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FatronError;
    use crate::models::invoice::TemplateVariant;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const BASIC_INVOICE: &str = "\
Clínica Exemplo, S.A.
Segurado: MARIA DOS SANTOS
Apólice n.º AP-44512
Factura n.º 2024/0117
Data: 01/02/2024
N.º Contribuinte: 123456789

01/02/2024 COD1 Luva cirurgica 2,00 5,00 10,00 0,00 0,00 10,00
Contagem e valor (€) 21 - MATERIAL DE CONSUMO 2,00 10,00
";

    #[test]
    fn test_end_to_end_scenario() {
        let pipeline = InvoicePipeline::new();
        let result = pipeline.process_text(BASIC_INVOICE).unwrap();

        assert_eq!(result.metadata.variant, TemplateVariant::Old);
        assert_eq!(result.client.name, "MARIA DOS SANTOS");

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].quantity, Some(dec("2.00")));
        assert_eq!(result.items[0].total_after_tax, Some(dec("10.00")));

        assert_eq!(result.subtotals.len(), 1);
        assert_eq!(result.subtotals[0].section, "21 - MATERIAL DE CONSUMO");
        assert_eq!(result.subtotals[0].declared_total, dec("10.00"));

        // Prefix rule routes the declared total to contracted nursing,
        // and exactly one grand-total row closes the table.
        assert_eq!(result.buckets.len(), 2);
        assert_eq!(result.buckets[0].description, "Enfermagem convencionada");
        assert_eq!(result.buckets[0].code, "33");
        assert_eq!(result.buckets[0].total, dec("10.00"));

        let grand = result.grand_total().unwrap();
        assert_eq!(grand.total, dec("10.00"));

        assert_eq!(result.stats.items_matched, 1);
        assert_eq!(result.stats.subtotals_matched, 1);
    }

    #[test]
    fn test_injected_tables() {
        let pipeline = InvoicePipeline::with_tables(&DEFAULT_TABLES);
        let result = pipeline.process_text(BASIC_INVOICE).unwrap();
        assert_eq!(result.buckets.len(), 2);
    }

    #[test]
    fn test_zero_items_is_a_hard_failure() {
        let pipeline = InvoicePipeline::new();
        let err = pipeline
            .process_text("Factura n.º 1\nsem linhas de consumo\n")
            .unwrap_err();
        assert!(matches!(
            err,
            FatronError::Extraction(ExtractionError::NoLineItems)
        ));
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let pipeline = InvoicePipeline::new();
        let mut a = pipeline.process_text(BASIC_INVOICE).unwrap();
        let mut b = pipeline.process_text(BASIC_INVOICE).unwrap();
        a.processing_time_ms = 0;
        b.processing_time_ms = 0;

        assert_eq!(a.items, b.items);
        assert_eq!(a.subtotals, b.subtotals);
        assert_eq!(a.buckets, b.buckets);
        assert_eq!(a.warnings, b.warnings);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_missing_header_fields_only_warn() {
        let pipeline = InvoicePipeline::new();
        let result = pipeline
            .process_text("01/02/2024 COD1 Consulta 1,00 20,00 20,00\n")
            .unwrap();

        assert_eq!(result.client.name, "");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Nome do cliente")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("subtotal")));
    }

    #[test]
    fn test_new_variant_document() {
        let text = "\
Cliente: JOÃO PEREIRA
Fatura 2024/55
Data de emissão: 15/03/2024
NIF: 222333444

15/03/2024 F01 Antibiotico oral 1,00 12,00 12,00 0,00 0,60 12,60
Quantidade e valor (€) FÁRMACOS 1,00 12,60
";
        let pipeline = InvoicePipeline::new();
        let result = pipeline.process_text(text).unwrap();

        assert_eq!(result.metadata.variant, TemplateVariant::New);
        assert_eq!(result.client.name, "JOÃO PEREIRA");
        assert_eq!(result.subtotals.len(), 1);
        assert_eq!(result.buckets[0].description, "Fármacos");
        assert_eq!(result.buckets[0].code, "52");
        assert_eq!(result.buckets[0].total, dec("12.60"));
    }

    #[test]
    fn test_mcdt_document_decomposition() {
        let text = "\
Segurado: ANA COSTA
Factura n.º 9

02/02/2024 M1 Penso esterilizado 1,00 50,00 50,00 0,00 0,00 50,00
02/02/2024 M2 RX Torax 1,00 200,00 200,00 0,00 0,00 200,00
02/02/2024 M3 Consulta avulsa 1,00 100,00 100,00 0,00 0,00 100,00
Contagem e valor (€) MCDT 3,00 500,00
";
        let pipeline = InvoicePipeline::new();
        let result = pipeline.process_text(text).unwrap();

        let nursing = result
            .buckets
            .iter()
            .find(|b| b.description == "Enfermagem convencionada")
            .unwrap();
        assert_eq!(nursing.total, dec("50.00"));

        let rx = result
            .buckets
            .iter()
            .find(|b| b.description == "MCDT - Radiologia")
            .unwrap();
        assert_eq!(rx.total, dec("200.00"));

        // The unclassified 100 € is dropped and surfaced as a warning.
        assert!(result.warnings.iter().any(|w| w.contains("MCDT")));
    }
}
