//! Header field extraction.
//!
//! Soft-extraction contract: every field whose anchor is absent yields an
//! empty string (or `None` for the date) and fields never affect each other.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{
    CLAIM_OLD, CLIENT_NAME_NEW, CLIENT_NAME_OLD, INVOICE_NUMBER_NEW, INVOICE_NUMBER_OLD,
    ISSUE_DATE_NEW, ISSUE_DATE_OLD, POLICY_NEW, POLICY_OLD, PROCESS_NEW, TAX_ID,
};
use crate::models::invoice::{ClientInfo, InvoiceMetadata, TemplateVariant};

/// Extract client identity and invoice metadata from the full text.
pub fn extract_header(text: &str, variant: TemplateVariant) -> (ClientInfo, InvoiceMetadata) {
    let client = ClientInfo {
        // First match: the header prints the name before any footer echoes.
        name: match variant {
            TemplateVariant::Old => first_capture(&CLIENT_NAME_OLD, text),
            TemplateVariant::New => first_capture(&CLIENT_NAME_NEW, text),
        },
        // Last match wins: repeated headers/footers also carry NIF-like
        // tokens and the client block is printed last.
        tax_id: last_capture(&TAX_ID, text),
    };

    let metadata = match variant {
        TemplateVariant::Old => InvoiceMetadata {
            policy_number: first_capture(&POLICY_OLD, text),
            invoice_number: first_capture(&INVOICE_NUMBER_OLD, text),
            issue_date: capture_date(&ISSUE_DATE_OLD, text),
            claim_number: first_capture(&CLAIM_OLD, text),
            variant,
        },
        TemplateVariant::New => InvoiceMetadata {
            policy_number: first_capture(&POLICY_NEW, text),
            invoice_number: first_capture(&INVOICE_NUMBER_NEW, text),
            issue_date: capture_date(&ISSUE_DATE_NEW, text),
            claim_number: first_capture(&PROCESS_NEW, text),
            variant,
        },
    };

    (client, metadata)
}

fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

fn last_capture(re: &Regex, text: &str) -> String {
    re.captures_iter(text)
        .last()
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

fn capture_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    let token = first_capture(re, text);
    if token.is_empty() {
        return None;
    }
    let mut parts = token.splitn(3, '/');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OLD_HEADER: &str = "\
Clínica Exemplo, S.A.   NIF 500100200
Segurado: MARIA DOS SANTOS
Apólice n.º AP-44512
Factura n.º 2024/0117
Sinistro: SN-2024-889
Data: 01/02/2024
N.º Contribuinte: 123456789
";

    #[test]
    fn test_old_header_extraction() {
        let (client, meta) = extract_header(OLD_HEADER, TemplateVariant::Old);

        assert_eq!(client.name, "MARIA DOS SANTOS");
        // Last tax-id-like match wins over the clinic's own NIF.
        assert_eq!(client.tax_id, "123456789");
        assert_eq!(meta.policy_number, "AP-44512");
        assert_eq!(meta.invoice_number, "2024/0117");
        assert_eq!(meta.claim_number, "SN-2024-889");
        assert_eq!(meta.issue_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(meta.variant, TemplateVariant::Old);
    }

    #[test]
    fn test_new_header_extraction() {
        let text = "\
Cliente: JOÃO PEREIRA
N.º Apólice: 99/2023
Fatura FT 2024/55
N.º Processo: PRC-71
Data de emissão: 15/03/2024
NIF: 222333444
";
        let (client, meta) = extract_header(text, TemplateVariant::New);

        assert_eq!(client.name, "JOÃO PEREIRA");
        assert_eq!(client.tax_id, "222333444");
        assert_eq!(meta.policy_number, "99/2023");
        assert_eq!(meta.invoice_number, "2024/55");
        assert_eq!(meta.claim_number, "PRC-71");
        assert_eq!(meta.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_missing_anchors_yield_empty_fields() {
        let (client, meta) = extract_header("texto sem âncoras", TemplateVariant::Old);

        assert_eq!(client.name, "");
        assert_eq!(client.tax_id, "");
        assert_eq!(meta.policy_number, "");
        assert_eq!(meta.invoice_number, "");
        assert_eq!(meta.claim_number, "");
        assert_eq!(meta.issue_date, None);
    }
}
