//! Number coercion for text coming out of input elements.
//!
//! Browsers hand every input value over as text. Two coercions decide what
//! counts as a number:
//!
//! - [`coerce_number`] converts the *whole* string, the way a host
//!   `Number(text)` call does: surrounding whitespace is ignored, the empty
//!   string is `0`, and `0x`/`0o`/`0b` integer literals are accepted.
//! - [`parse_float_prefix`] reads the longest decimal *prefix*, the way a
//!   host `parseFloat(text)` call does: `"12px"` is `12`, `""` is nothing.
//!
//! Neither ever returns NaN; a failed coercion is `None`.

/// Coerce a whole string to a number.
///
/// # Examples
///
/// ```rust
/// use fieldkit::numeric::coerce_number;
///
/// assert_eq!(coerce_number(" 42 "), Some(42.0));
/// assert_eq!(coerce_number(""), Some(0.0));
/// assert_eq!(coerce_number("0x10"), Some(16.0));
/// assert_eq!(coerce_number("-Infinity"), Some(f64::NEG_INFINITY));
/// assert_eq!(coerce_number("12a"), None);
/// assert_eq!(coerce_number("inf"), None);
/// ```
pub fn coerce_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    if let Some(value) = radix_literal(text) {
        return value;
    }

    let (negative, unsigned) = split_sign(text);
    if unsigned == "Infinity" {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    match scan_decimal(text) {
        Some(len) if len == text.len() => text.parse().ok(),
        _ => None,
    }
}

/// Parse the longest leading decimal number of a string.
///
/// Leading whitespace is skipped; anything after the number is ignored.
///
/// # Examples
///
/// ```rust
/// use fieldkit::numeric::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("12.5kg"), Some(12.5));
/// assert_eq!(parse_float_prefix("  -3e2"), Some(-300.0));
/// assert_eq!(parse_float_prefix("0x10"), Some(0.0));
/// assert_eq!(parse_float_prefix("."), None);
/// assert_eq!(parse_float_prefix("   "), None);
/// ```
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();

    let (negative, unsigned) = split_sign(text);
    if unsigned.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let len = scan_decimal(text)?;
    text[..len].parse().ok()
}

/// Whether `text` is accepted as a number by both coercions.
///
/// This is the acceptance test for number inputs: the whole string must be
/// a number, and it must also start like one (so blank text is refused even
/// though it coerces to zero).
pub fn is_numeric_input(text: &str) -> bool {
    coerce_number(text).is_some() && parse_float_prefix(text).is_some()
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Length of the longest prefix of `text` that is a decimal literal:
/// `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least one
/// mantissa digit.
fn scan_decimal(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        i = j;
    }

    if digits == 0 {
        return None;
    }

    // The exponent only counts when it carries at least one digit.
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(i)
}

/// `0x`, `0o` and `0b` integer literals. Returns `None` when `text` has no
/// such prefix, `Some(None)` when it has one but the digits are invalid.
fn radix_literal(text: &str) -> Option<Option<f64>> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(None),
        }
    }
    Some(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number_decimal_forms() {
        assert_eq!(coerce_number("1."), Some(1.0));
        assert_eq!(coerce_number(".5"), Some(0.5));
        assert_eq!(coerce_number("+7"), Some(7.0));
        assert_eq!(coerce_number("1e3"), Some(1000.0));
        assert_eq!(coerce_number("-0"), Some(-0.0));
    }

    #[test]
    fn test_coerce_number_rejects_garbage() {
        assert_eq!(coerce_number("."), None);
        assert_eq!(coerce_number("1e"), None);
        assert_eq!(coerce_number("1 2"), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("infinity"), None);
        assert_eq!(coerce_number("0x"), None);
        assert_eq!(coerce_number("0b102"), None);
        assert_eq!(coerce_number("-0x10"), None);
    }

    #[test]
    fn test_coerce_number_radix() {
        assert_eq!(coerce_number("0b101"), Some(5.0));
        assert_eq!(coerce_number("0o17"), Some(15.0));
        assert_eq!(coerce_number("0XfF"), Some(255.0));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("3.14abc"), Some(3.14));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("Infinityx"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_is_numeric_input() {
        assert!(is_numeric_input("12"));
        assert!(is_numeric_input(" 12 "));
        assert!(is_numeric_input("0x10"));
        assert!(!is_numeric_input("12a"));
        assert!(!is_numeric_input("   "));
        assert!(!is_numeric_input("abc"));
    }
}
