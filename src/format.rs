//! Display formatters.
//!
//! Pure functions turning raw input or stored numbers into display text.
//! They never fail: garbage input is coerced (non-digits are dropped, NaN
//! renders as `"NaN"`), never rejected.
//!
//! Currency and number formatting is display-only. A currency field stores
//! `FieldValue::Number(Some(1000000.0))`; only what the user sees is
//! `"1.000.000 ₫"`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of digits kept by [`format_phone_number`].
pub const PHONE_MAX_DIGITS: usize = 12;

const PHONE_GROUP: usize = 3;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// `$1,000.00`
    Prefix,
    /// `1.000 ₫`, separated by a non-breaking space.
    Suffix,
}

/// Number formatting conventions for one locale.
///
/// # Examples
///
/// ```rust
/// use fieldkit::format::{format_currency_in, NumberLocale};
///
/// assert_eq!(format_currency_in(1234.5, &NumberLocale::en_us()), "$1,234.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberLocale {
    pub group_separator: char,
    pub decimal_separator: char,
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    /// Fraction digits always shown for currency amounts.
    pub currency_digits: u8,
    /// Maximum fraction digits for plain numbers; trailing zeros are cut.
    pub max_fraction_digits: u8,
}

impl NumberLocale {
    /// Vietnamese conventions with the đồng as currency.
    pub fn vi_vn() -> Self {
        Self {
            group_separator: '.',
            decimal_separator: ',',
            currency_symbol: "₫".to_string(),
            symbol_position: SymbolPosition::Suffix,
            currency_digits: 0,
            max_fraction_digits: 3,
        }
    }

    /// US English conventions with the dollar as currency.
    pub fn en_us() -> Self {
        Self {
            group_separator: ',',
            decimal_separator: '.',
            currency_symbol: "$".to_string(),
            symbol_position: SymbolPosition::Prefix,
            currency_digits: 2,
            max_fraction_digits: 3,
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::vi_vn()
    }
}

/// Group the digits of a phone number as `XXX XXX XXX XXX`.
///
/// Every non-digit is dropped first and at most 12 digits are kept, so the
/// function can run on every keystroke and on its own output.
///
/// # Examples
///
/// ```rust
/// use fieldkit::format::format_phone_number;
///
/// assert_eq!(format_phone_number(""), "");
/// assert_eq!(format_phone_number("0912"), "091 2");
/// assert_eq!(format_phone_number("(091) 234-5678"), "091 234 567 8");
/// assert_eq!(format_phone_number("091 234 567 8"), "091 234 567 8");
/// ```
pub fn format_phone_number(value: &str) -> String {
    let digits: Vec<char> = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect();

    digits
        .chunks(PHONE_GROUP)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an amount as currency in the default (`vi-VN`) locale.
///
/// # Examples
///
/// ```rust
/// use fieldkit::format::format_currency;
///
/// assert_eq!(format_currency(1_000_000.0), "1.000.000\u{a0}₫");
/// assert_eq!(format_currency(-1500.6), "-1.501\u{a0}₫");
/// ```
pub fn format_currency(value: f64) -> String {
    format_currency_in(value, &NumberLocale::default())
}

/// Format an amount as currency in the given locale.
pub fn format_currency_in(value: f64, locale: &NumberLocale) -> String {
    let amount = format_decimal(value, locale, locale.currency_digits, false);
    match locale.symbol_position {
        SymbolPosition::Prefix => match amount.strip_prefix('-') {
            Some(unsigned) => format!("-{}{unsigned}", locale.currency_symbol),
            None => format!("{}{amount}", locale.currency_symbol),
        },
        SymbolPosition::Suffix => format!("{amount}\u{a0}{}", locale.currency_symbol),
    }
}

/// Format a number with thousands separators in the default (`vi-VN`)
/// locale.
///
/// # Examples
///
/// ```rust
/// use fieldkit::format::format_number;
///
/// assert_eq!(format_number(1234567.0), "1.234.567");
/// assert_eq!(format_number(1234.5), "1.234,5");
/// assert_eq!(format_number(0.12345), "0,123");
/// ```
pub fn format_number(value: f64) -> String {
    format_number_in(value, &NumberLocale::default())
}

/// Format a number with thousands separators in the given locale.
pub fn format_number_in(value: f64, locale: &NumberLocale) -> String {
    format_decimal(value, locale, locale.max_fraction_digits, true)
}

/// Format a calendar date the way `<input type="date">` expects it.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use fieldkit::format::format_date_for_input;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(format_date_for_input(date), "2024-03-09");
/// ```
pub fn format_date_for_input(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format the UTC calendar date of an instant for a date input.
pub fn format_datetime_for_input(at: DateTime<Utc>) -> String {
    format_date_for_input(at.date_naive())
}

fn format_decimal(value: f64, locale: &NumberLocale, digits: u8, trim_zeros: bool) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let digits = usize::from(digits);
    let rounded = round_half_away(value.abs(), digits);
    let fixed = format!("{rounded:.digits$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (fixed.as_str(), ""),
    };
    let frac_part = if trim_zeros {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.group_separator));
    if !frac_part.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

/// Round to `digits` decimals, ties away from zero.
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10_f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn group_digits(int_part: &str, separator: char) -> String {
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

    #[test]
    fn test_phone_grouping_steps() {
        assert_eq!(format_phone_number("091"), "091");
        assert_eq!(format_phone_number("091234"), "091 234");
        assert_eq!(format_phone_number("0912345"), "091 234 5");
        assert_eq!(format_phone_number("091234567"), "091 234 567");
        assert_eq!(format_phone_number("091234567890"), "091 234 567 890");
    }

    #[test]
    fn test_phone_truncates_after_twelve_digits() {
        assert_eq!(format_phone_number("0912345678901234"), "091 234 567 890");
    }

    #[test]
    fn test_phone_ignores_non_ascii_digits() {
        assert_eq!(format_phone_number("٠١٢abc"), "");
    }

    #[test]
    fn test_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(2.5), "3\u{a0}₫");
        assert_eq!(format_currency(-2.5), "-3\u{a0}₫");
        assert_eq!(format_currency(0.4), "0\u{a0}₫");
        assert_eq!(format_currency(-0.4), "0\u{a0}₫");
    }

    #[test]
    fn test_currency_prefix_locale() {
        let en = NumberLocale::en_us();
        assert_eq!(format_currency_in(1_000_000.0, &en), "$1,000,000.00");
        assert_eq!(format_currency_in(-12.346, &en), "-$12.35");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-∞\u{a0}₫");
    }

    #[test]
    fn test_number_small_values() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1.000");
        assert_eq!(format_number(-1000.25), "-1.000,25");
    }

    #[test]
    fn test_locale_from_partial_config() {
        let locale: NumberLocale =
            serde_json::from_value(serde_json::json!({ "currency_symbol": "VND" })).unwrap();
        assert_eq!(locale.group_separator, '.');
        assert_eq!(format_currency_in(5000.0, &locale), "5.000\u{a0}VND");
    }
}
