//! Comma-decimal amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a European comma-decimal amount (e.g. "1 234,56").
///
/// Grouping spaces (including non-breaking) are stripped and the comma is
/// the decimal separator. Returns `None` on anything that does not parse to
/// a finite decimal; callers treat that as a missing value, never an error.
pub fn parse_eur_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned.replace(',', ".")).ok()
}

/// Format an amount in European style ("1 234,56").
pub fn format_eur_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return s,
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && *c != '-' && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eur_amount() {
        assert_eq!(
            parse_eur_amount("1 234,56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(
            parse_eur_amount("10,00"),
            Some(Decimal::from_str("10.00").unwrap())
        );
        assert_eq!(
            parse_eur_amount("12 345 678,90"),
            Some(Decimal::from_str("12345678.90").unwrap())
        );
    }

    #[test]
    fn test_parse_eur_amount_rejects_garbage() {
        assert_eq!(parse_eur_amount(""), None);
        assert_eq!(parse_eur_amount("abc"), None);
        assert_eq!(parse_eur_amount("1,2,3"), None);
    }

    #[test]
    fn test_format_eur_amount() {
        assert_eq!(
            format_eur_amount(Decimal::from_str("1234.56").unwrap()),
            "1 234,56"
        );
        assert_eq!(
            format_eur_amount(Decimal::from_str("10").unwrap()),
            "10,00"
        );
        assert_eq!(
            format_eur_amount(Decimal::from_str("12345678.9").unwrap()),
            "12 345 678,90"
        );
    }
}
