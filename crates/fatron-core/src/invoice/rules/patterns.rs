//! Common regex patterns for invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// A comma-decimal monetary/quantity token, optionally space-grouped
/// (e.g. "10,00" or "1 234,56").
pub const AMOUNT_SRC: &str = r"\d{1,3}(?:[ \u{00a0}]?\d{3})*,\d{2}";

lazy_static! {
    /// Standalone comma-decimal numeric token.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(AMOUNT_SRC).unwrap();

    /// Line-item pattern: date, alphanumeric code, non-greedy description,
    /// trailing run of one to eight comma-decimal tokens. The description
    /// is non-greedy so it never swallows the numeric run.
    pub static ref LINE_ITEM: Regex = Regex::new(&format!(
        r"^(\d{{1,2}}/\d{{1,2}}/\d{{4}})\s+([A-Za-z0-9][A-Za-z0-9.\-/]*)\s+(.+?)\s+({amt}(?:\s+{amt}){{0,7}})\s*$",
        amt = AMOUNT_SRC
    ))
    .unwrap();

    // Header anchors, old template
    pub static ref CLIENT_NAME_OLD: Regex = Regex::new(
        r"(?im)^\s*Segurado\s*:?\s*(.+)$"
    ).unwrap();

    pub static ref POLICY_OLD: Regex = Regex::new(
        r"(?i)Ap[óo]lice\s*(?:n\.?[ºo°])?\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_OLD: Regex = Regex::new(
        r"(?i)Fa[ct]tura\s*(?:n\.?[ºo°])?\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref CLAIM_OLD: Regex = Regex::new(
        r"(?i)Sinistro\s*(?:n\.?[ºo°])?\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref ISSUE_DATE_OLD: Regex = Regex::new(
        r"(?i)Data\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    // Header anchors, new template
    pub static ref CLIENT_NAME_NEW: Regex = Regex::new(
        r"(?im)^\s*Cliente\s*:?\s*(.+)$"
    ).unwrap();

    pub static ref POLICY_NEW: Regex = Regex::new(
        r"(?i)N\.?[ºo°]\s*Ap[óo]lice\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_NEW: Regex = Regex::new(
        r"(?i)Fatura\s*(?:FT)?\s*(?:n\.?[ºo°])?\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref PROCESS_NEW: Regex = Regex::new(
        r"(?i)(?:N\.?[ºo°]\s*)?Processo\s*:?\s*([A-Za-z0-9/\-]+)"
    ).unwrap();

    pub static ref ISSUE_DATE_NEW: Regex = Regex::new(
        r"(?i)Data\s+de\s+emiss[ãa]o\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    /// Tax id (NIF): nine digits behind a contribuinte/NIF anchor. Repeated
    /// headers and footers make the last occurrence the trustworthy one.
    pub static ref TAX_ID: Regex = Regex::new(
        r"(?i)(?:NIF|N\.?[ºo°]?\s*Contribuinte|Contribuinte)\s*\.?\s*:?\s*(\d{9})"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_matches_full_row() {
        let line = "01/02/2024 COD1 Luva cirurgica 2,00 5,00 10,00 0,00 0,00 10,00";
        let caps = LINE_ITEM.captures(line).unwrap();
        assert_eq!(&caps[1], "01/02/2024");
        assert_eq!(&caps[2], "COD1");
        assert_eq!(&caps[3], "Luva cirurgica");
        assert_eq!(&caps[4], "2,00 5,00 10,00 0,00 0,00 10,00");
    }

    #[test]
    fn test_line_item_description_keeps_embedded_numbers() {
        let line = "03/02/2024 P10 Penso 10x10 1,00 2,50 2,50";
        let caps = LINE_ITEM.captures(line).unwrap();
        assert_eq!(&caps[3], "Penso 10x10");
        assert_eq!(&caps[4], "1,00 2,50 2,50");
    }

    #[test]
    fn test_line_item_rejects_line_without_amounts() {
        assert!(!LINE_ITEM.is_match("01/02/2024 COD1 Luva cirurgica"));
        assert!(!LINE_ITEM.is_match("Contagem e valor (€) FÁRMACOS 1,00 2,00"));
    }

    #[test]
    fn test_amount_token_grouped() {
        let m = AMOUNT_TOKEN.find("total 1 234,56 €").unwrap();
        assert_eq!(m.as_str(), "1 234,56");
    }

    #[test]
    fn test_tax_id_anchor() {
        let caps = TAX_ID.captures("N.º Contribuinte: 123456789").unwrap();
        assert_eq!(&caps[1], "123456789");
        let caps = TAX_ID.captures("NIF 987654321").unwrap();
        assert_eq!(&caps[1], "987654321");
    }
}
