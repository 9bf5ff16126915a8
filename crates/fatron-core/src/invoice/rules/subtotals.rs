//! Declared section-subtotal extraction.
//!
//! A line only qualifies when it carries all three markers: the count
//! keyword, the value keyword and the currency symbol. The triple gate
//! keeps unrelated lines that merely contain numbers from matching.

use tracing::{debug, warn};

use super::amounts::parse_eur_amount;
use super::patterns::AMOUNT_TOKEN;
use crate::models::invoice::{DeclaredSubtotal, TemplateVariant};

const VALUE_KEYWORD: &str = "valor";
const CURRENCY: char = '€';

/// Subtotal extractor for one template variant.
pub struct SubtotalExtractor {
    count_keyword: &'static str,
}

impl SubtotalExtractor {
    /// Extractor with the count keyword for the given variant.
    pub fn for_variant(variant: TemplateVariant) -> Self {
        let count_keyword = match variant {
            TemplateVariant::Old => "contagem",
            TemplateVariant::New => "quantidade",
        };
        Self { count_keyword }
    }

    /// Extract all declared subtotals from the ordered line sequence.
    pub fn extract(&self, lines: &[String]) -> Vec<DeclaredSubtotal> {
        let subtotals: Vec<DeclaredSubtotal> = lines
            .iter()
            .filter_map(|l| self.parse_subtotal_line(l))
            .collect();
        debug!("Matched {} declared subtotals", subtotals.len());
        subtotals
    }

    /// Parse a single line against the subtotal pattern.
    pub fn parse_subtotal_line(&self, line: &str) -> Option<DeclaredSubtotal> {
        let lower = line.to_lowercase();
        if !lower.contains(self.count_keyword)
            || !lower.contains(VALUE_KEYWORD)
            || !line.contains(CURRENCY)
        {
            return None;
        }

        // Everything after the currency marker: optional closing paren,
        // then the section label followed by the numeric tokens.
        let idx = line.find(CURRENCY)?;
        let trailing = line[idx + CURRENCY.len_utf8()..]
            .trim_start_matches(|c: char| c == ')' || c == ':' || c.is_whitespace());

        let tokens: Vec<_> = AMOUNT_TOKEN.find_iter(trailing).collect();
        // A declared count and a declared total at minimum.
        if tokens.len() < 2 {
            return None;
        }

        let first = &tokens[0];
        let last = tokens.last()?;

        let section = trailing[..first.start()].trim().to_string();
        let declared_quantity = parse_eur_amount(first.as_str());
        // Last token guards against numeric noise embedded between the two.
        let declared_total = match parse_eur_amount(last.as_str()) {
            Some(total) => total,
            None => {
                warn!("Unparseable declared total on subtotal line: {}", line);
                return None;
            }
        };

        Some(DeclaredSubtotal {
            section,
            declared_quantity,
            declared_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn old() -> SubtotalExtractor {
        SubtotalExtractor::for_variant(TemplateVariant::Old)
    }

    #[test]
    fn test_parse_declared_subtotal() {
        let sub = old()
            .parse_subtotal_line("Contagem e valor (€) 21 - MATERIAL DE CONSUMO 2,00 10,00")
            .unwrap();

        assert_eq!(sub.section, "21 - MATERIAL DE CONSUMO");
        assert_eq!(
            sub.declared_quantity,
            Some(Decimal::from_str("2.00").unwrap())
        );
        assert_eq!(sub.declared_total, Decimal::from_str("10.00").unwrap());
    }

    #[test]
    fn test_missing_currency_symbol_never_matches() {
        assert!(old()
            .parse_subtotal_line("Contagem e valor 10,00 20,00")
            .is_none());
    }

    #[test]
    fn test_fewer_than_two_tokens_dropped() {
        assert!(old()
            .parse_subtotal_line("Contagem e valor (€) FÁRMACOS 10,00")
            .is_none());
    }

    #[test]
    fn test_total_is_last_token_despite_noise() {
        let sub = old()
            .parse_subtotal_line("Contagem e valor (€) MCDT 3,00 1,00 150,00")
            .unwrap();
        assert_eq!(sub.section, "MCDT");
        assert_eq!(
            sub.declared_quantity,
            Some(Decimal::from_str("3.00").unwrap())
        );
        assert_eq!(sub.declared_total, Decimal::from_str("150.00").unwrap());
    }

    #[test]
    fn test_new_variant_keyword() {
        let new = SubtotalExtractor::for_variant(TemplateVariant::New);

        assert!(new
            .parse_subtotal_line("Contagem e valor (€) FÁRMACOS 1,00 2,00")
            .is_none());
        let sub = new
            .parse_subtotal_line("Quantidade e valor (€) FÁRMACOS 1,00 2,00")
            .unwrap();
        assert_eq!(sub.section, "FÁRMACOS");
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let lines: Vec<String> = vec![
            "Contagem e valor (€) FÁRMACOS 1,00 5,00".to_string(),
            "uma linha qualquer 3,00".to_string(),
            "Contagem e valor (€) MCDT 2,00 7,00".to_string(),
        ];
        let subs = old().extract(&lines);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].section, "FÁRMACOS");
        assert_eq!(subs[1].section, "MCDT");
    }
}
