//! Line-item extraction.
//!
//! A best-effort sieve over the linearized lines: each line either matches
//! the full item pattern or is skipped. "No match on this line" is not a
//! document-level error; the caller surfaces match counts instead.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::amounts::parse_eur_amount;
use super::patterns::{AMOUNT_TOKEN, LINE_ITEM};
use crate::models::invoice::LineItem;

/// Number of numeric slots every item row is normalized to.
pub const NUMERIC_SLOTS: usize = 6;

/// Extract all line items from the ordered line sequence.
pub fn extract_line_items(lines: &[String]) -> Vec<LineItem> {
    let items: Vec<LineItem> = lines.iter().filter_map(|l| parse_item_line(l)).collect();
    debug!("Matched {} line items across {} lines", items.len(), lines.len());
    items
}

/// Parse a single line against the item pattern.
pub fn parse_item_line(line: &str) -> Option<LineItem> {
    let caps = LINE_ITEM.captures(line)?;

    let date = parse_item_date(&caps[1])?;
    let code = caps[2].to_string();
    let description = caps[3].trim().to_string();
    let slots = normalize_amount_run(&caps[4]);

    Some(LineItem {
        date,
        code,
        description,
        quantity: slots[0],
        unit_value: slots[1],
        total_before_tax: slots[2],
        discount: slots[3],
        tax: slots[4],
        total_after_tax: slots[5],
    })
}

/// Normalize a captured numeric run to exactly six slots.
///
/// Invariant: always exactly six numeric fields. Real invoices omit the
/// discount/tax columns when zero, so short runs are right-padded with the
/// literal zero value; tokens beyond six are silently dropped. A token that
/// fails comma-decimal parsing becomes `None` (missing), the row is kept.
pub fn normalize_amount_run(run: &str) -> [Option<Decimal>; NUMERIC_SLOTS] {
    let mut slots = [Some(Decimal::ZERO); NUMERIC_SLOTS];

    for (i, token) in AMOUNT_TOKEN.find_iter(run).take(NUMERIC_SLOTS).enumerate() {
        slots[i] = parse_eur_amount(token.as_str());
    }

    slots
}

fn parse_item_date(token: &str) -> Option<NaiveDate> {
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
    use std::str::FromStr;

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_six_tokens_kept_in_order() {
        let item =
            parse_item_line("01/02/2024 COD1 Luva cirurgica 2,00 5,00 10,00 0,00 0,00 10,00")
                .unwrap();

        assert_eq!(item.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(item.code, "COD1");
        assert_eq!(item.description, "Luva cirurgica");
        assert_eq!(item.quantity, dec("2.00"));
        assert_eq!(item.unit_value, dec("5.00"));
        assert_eq!(item.total_before_tax, dec("10.00"));
        assert_eq!(item.discount, dec("0.00"));
        assert_eq!(item.tax, dec("0.00"));
        assert_eq!(item.total_after_tax, dec("10.00"));
    }

    #[test]
    fn test_short_run_padded_with_zero() {
        // Four captured tokens: discount and tax columns were omitted.
        let item = parse_item_line("05/03/2024 RX12 RX Torax 1,00 25,00 25,00 25,00").unwrap();

        assert_eq!(item.quantity, dec("1.00"));
        assert_eq!(item.unit_value, dec("25.00"));
        assert_eq!(item.total_before_tax, dec("25.00"));
        assert_eq!(item.discount, dec("25.00"));
        assert_eq!(item.tax, Some(Decimal::ZERO));
        assert_eq!(item.total_after_tax, Some(Decimal::ZERO));
    }

    #[test]
    fn test_extra_tokens_dropped() {
        let run = "1,00 2,00 3,00 4,00 5,00 6,00 7,00 8,00";
        let slots = normalize_amount_run(run);
        assert_eq!(slots[5], dec("6.00"));
    }

    #[test]
    fn test_grouped_token_not_split() {
        let slots = normalize_amount_run("2,00 1 250,00 2 500,00");
        assert_eq!(slots[0], dec("2.00"));
        assert_eq!(slots[1], dec("1250.00"));
        assert_eq!(slots[2], dec("2500.00"));
        assert_eq!(slots[3], Some(Decimal::ZERO));
    }

    #[test]
    fn test_non_matching_lines_skipped() {
        let lines: Vec<String> = vec![
            "FATURA N.º 2024/001".to_string(),
            "01/02/2024 COD1 Luva cirurgica 2,00 5,00 10,00".to_string(),
            "Contagem e valor (€) FÁRMACOS 1,00 2,00".to_string(),
        ];
        let items = extract_line_items(&lines);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "COD1");
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        assert!(parse_item_line("31/02/2024 COD1 Luva 1,00 2,00").is_none());
    }
}
