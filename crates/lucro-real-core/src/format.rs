//! Locale-aware rendering of amounts and percentages for alert messages.
//!
//! Rounding follows the usual "half away from zero" rule used by
//! number formatters in browsers and spreadsheets.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Currency, Money, Percent};
use crate::LucroRealError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "de-DE")]
    DeDe,
}

impl Locale {
    fn group_separator(self) -> char {
        match self {
            Locale::EnUs => ',',
            Locale::PtBr | Locale::EsEs | Locale::DeDe => '.',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Locale::EnUs => '.',
            Locale::PtBr | Locale::EsEs | Locale::DeDe => ',',
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
            Locale::EsEs => "es-ES",
            Locale::DeDe => "de-DE",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = LucroRealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            "es-es" | "es" => Ok(Locale::EsEs),
            "de-de" | "de" => Ok(Locale::DeDe),
            other => Err(LucroRealError::Config(format!("unsupported locale '{other}'"))),
        }
    }
}

/// Renders money and percentages for one locale/currency pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    locale: Locale,
    currency: Currency,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self::new(Locale::default(), Currency::default())
    }
}

impl MoneyFormatter {
    pub fn new(locale: Locale, currency: Currency) -> Self {
        Self { locale, currency }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// `R$ 1.234,56` in pt-BR, `$1,234.56` in en-US, `1.234,56 €` in de-DE.
    pub fn currency(&self, value: Money) -> String {
        let body = self.number(value.abs(), 2);
        let sign = if is_negative_after_rounding(value, 2) { "-" } else { "" };
        let symbol = self.currency.symbol();
        match self.locale {
            Locale::EnUs => format!("{sign}{symbol}{body}"),
            Locale::PtBr => format!("{sign}{symbol} {body}"),
            Locale::EsEs | Locale::DeDe => format!("{sign}{body} {symbol}"),
        }
    }

    /// Percentage points with a fixed number of decimals, e.g. `20,0%`.
    pub fn percent(&self, value: Percent, decimals: u32) -> String {
        format!("{}%", self.number(value, decimals))
    }

    /// Grouped number with exactly `decimals` fractional digits.
    pub fn number(&self, value: Decimal, decimals: u32) -> String {
        let fixed = to_fixed(value, decimals);
        let (negative, digits) = match fixed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, fixed.as_str()),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
        if negative && !is_all_zero(digits) {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part, self.locale.group_separator()));
        if let Some(frac) = frac_part {
            out.push(self.locale.decimal_separator());
            out.push_str(frac);
        }
        out
    }
}

/// Round half away from zero and render with exactly `decimals` digits,
/// always using `.` as decimal separator.
pub fn to_fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

fn is_negative_after_rounding(value: Decimal, decimals: u32) -> bool {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero) < Decimal::ZERO
}

fn is_all_zero(digits: &str) -> bool {
    digits.chars().all(|c| c == '0' || c == '.')
}

fn group_thousands(int_part: &str, separator: char) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_brl_currency_pt_br() {
        let f = MoneyFormatter::default();
        assert_eq!(f.currency(dec!(1412)), "R$ 1.412,00");
        assert_eq!(f.currency(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(f.currency(dec!(0)), "R$ 0,00");
    }

    #[test]
    fn test_negative_currency_keeps_sign_before_symbol() {
        let f = MoneyFormatter::default();
        assert_eq!(f.currency(dec!(-500)), "-R$ 500,00");
        // Rounds to zero, so no sign.
        assert_eq!(f.currency(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_en_us_and_de_de_layouts() {
        let us = MoneyFormatter::new(Locale::EnUs, Currency::USD);
        assert_eq!(us.currency(dec!(1234.5)), "$1,234.50");

        let de = MoneyFormatter::new(Locale::DeDe, Currency::EUR);
        assert_eq!(de.currency(dec!(1234.5)), "1.234,50 €");
    }

    #[test]
    fn test_other_currency_renders_code() {
        let f = MoneyFormatter::new(Locale::EnUs, Currency::Other("CHF".into()));
        assert_eq!(f.currency(dec!(10)), "CHF10.00");
    }

    #[test]
    fn test_percent_rounds_half_away_from_zero() {
        let f = MoneyFormatter::default();
        assert_eq!(f.percent(dec!(20), 1), "20,0%");
        assert_eq!(f.percent(dec!(12.25), 1), "12,3%");
        assert_eq!(f.percent(dec!(-7.75), 1), "-7,8%");
        assert_eq!(f.percent(dec!(77.7), 0), "78%");
    }

    #[test]
    fn test_to_fixed_pads_decimals() {
        assert_eq!(to_fixed(dec!(3), 2), "3.00");
        assert_eq!(to_fixed(dec!(2.345), 2), "2.35");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("pt_BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("EN-us".parse::<Locale>().unwrap(), Locale::EnUs);
        assert!("xx-YY".parse::<Locale>().is_err());
    }
}
