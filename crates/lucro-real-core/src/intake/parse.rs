//! Tolerant parsing of user-typed amounts.
//!
//! Anything that cannot be read as a number becomes zero; the caller never
//! sees a parse error.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::Money;

/// Parse an amount typed by a user ("1500", "1.500,50", "R$ 2.000", "1,234.5").
///
/// Empty input is zero. Malformed input is zero and logged.
pub fn parse_currency(raw: &str) -> Money {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match normalize(trimmed).and_then(|s| parse_decimal_value(&s)) {
        Some(value) => value,
        None => {
            log::warn!("could not read '{}' as an amount; treating as 0", raw);
            Decimal::ZERO
        }
    }
}

/// Parse an amount held in a JSON value: numbers as-is, strings tolerantly,
/// anything else as zero.
pub fn parse_currency_value(value: &serde_json::Value) -> Money {
    match value {
        serde_json::Value::Number(n) => parse_decimal_value(&n.to_string()).unwrap_or_else(|| {
            log::warn!("number {} out of range; treating as 0", n);
            Decimal::ZERO
        }),
        serde_json::Value::String(s) => parse_currency(s),
        serde_json::Value::Null => Decimal::ZERO,
        other => {
            log::warn!("unexpected amount {}; treating as 0", other);
            Decimal::ZERO
        }
    }
}

fn parse_decimal_value(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Strip currency symbols and grouping, leaving `-?digits(.digits)?`.
fn normalize(input: &str) -> Option<String> {
    let mut s = input.replace("R$", "");
    s.retain(|c| !matches!(c, '$' | '€' | '£' | ' ' | '\u{a0}'));

    let negative = s.starts_with('-');
    let body = s.trim_start_matches('-');
    if body.is_empty() {
        return None;
    }
    if body.contains(['e', 'E']) {
        return Some(s);
    }
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let last_dot = body.rfind('.');
    let last_comma = body.rfind(',');
    let decimal_sep = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(if comma > dot { ',' } else { '.' }),
        (None, Some(_)) if body.matches(',').count() == 1 => Some(','),
        (Some(_), None) if body.matches('.').count() == 1 => Some('.'),
        _ => None,
    };

    let cleaned = match decimal_sep {
        Some(sep) => {
            let (int_part, frac_part) = body.rsplit_once(sep)?;
            let int_digits: String = int_part.chars().filter(char::is_ascii_digit).collect();
            format!("{int_digits}.{frac_part}")
        }
        None => body.chars().filter(char::is_ascii_digit).collect(),
    };

    Some(if negative { format!("-{cleaned}") } else { cleaned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_currency("1500"), dec!(1500));
        assert_eq!(parse_currency(" 1500.75 "), dec!(1500.75));
        assert_eq!(parse_currency("-200"), dec!(-200));
    }

    #[test]
    fn test_brazilian_formatting() {
        assert_eq!(parse_currency("R$ 1.500,50"), dec!(1500.50));
        assert_eq!(parse_currency("1500,5"), dec!(1500.5));
        assert_eq!(parse_currency("1.234.567"), dec!(1234567));
    }

    #[test]
    fn test_us_formatting() {
        assert_eq!(parse_currency("$1,234.50"), dec!(1234.50));
        assert_eq!(parse_currency("1,000,000"), dec!(1000000));
    }

    #[test]
    fn test_malformed_is_zero() {
        assert_eq!(parse_currency(""), Decimal::ZERO);
        assert_eq!(parse_currency("abc"), Decimal::ZERO);
        assert_eq!(parse_currency("12abc"), Decimal::ZERO);
        assert_eq!(parse_currency("R$"), Decimal::ZERO);
        assert_eq!(parse_currency("--"), Decimal::ZERO);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_currency("1.5e3"), dec!(1500));
    }

    #[test]
    fn test_json_values() {
        assert_eq!(parse_currency_value(&serde_json::json!(2500)), dec!(2500));
        assert_eq!(parse_currency_value(&serde_json::json!("2.500,00")), dec!(2500));
        assert_eq!(parse_currency_value(&serde_json::Value::Null), Decimal::ZERO);
        assert_eq!(parse_currency_value(&serde_json::json!(true)), Decimal::ZERO);
    }
}
