//! Layout variant selection.
//!
//! An explicit ordered rule list evaluated top-down, first match wins. The
//! markers are field labels unique to the newer template; a document with
//! none of them is treated as the old layout.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::invoice::TemplateVariant;

lazy_static! {
    /// Ordered variant rules. Order is load-bearing and covered by tests.
    static ref VARIANT_RULES: Vec<(Regex, TemplateVariant)> = vec![
        (
            Regex::new(r"(?i)Data\s+de\s+emiss[ãa]o").unwrap(),
            TemplateVariant::New,
        ),
        (
            Regex::new(r"(?i)N\.?[ºo°]\s*Processo").unwrap(),
            TemplateVariant::New,
        ),
        (
            Regex::new(r"(?im)^\s*Cliente\s*:").unwrap(),
            TemplateVariant::New,
        ),
    ];
}

/// Select the template variant for the given full text.
pub fn select_variant(text: &str) -> TemplateVariant {
    for (pattern, variant) in VARIANT_RULES.iter() {
        if pattern.is_match(text) {
            debug!("Variant rule {:?} matched: {:?}", pattern.as_str(), variant);
            return *variant;
        }
    }
    TemplateVariant::Old
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_old() {
        assert_eq!(select_variant("Factura n.º 1\nSegurado: X"), TemplateVariant::Old);
        assert_eq!(select_variant(""), TemplateVariant::Old);
    }

    #[test]
    fn test_new_markers() {
        assert_eq!(
            select_variant("Fatura FT 1\nData de emissão: 01/01/2024"),
            TemplateVariant::New
        );
        assert_eq!(
            select_variant("N.º Processo: PRC-9"),
            TemplateVariant::New
        );
        assert_eq!(select_variant("Cliente: ANA"), TemplateVariant::New);
    }

    #[test]
    fn test_marker_must_be_a_label_not_a_substring() {
        // "Cliente" inside a sentence is not the anchored field label.
        assert_eq!(
            select_variant("O cliente foi atendido."),
            TemplateVariant::Old
        );
        // "Processo" without the number prefix stays old.
        assert_eq!(
            select_variant("processo clínico arquivado"),
            TemplateVariant::Old
        );
    }
}
