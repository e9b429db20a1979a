// Experience Engine: total years of professional experience from an uploaded resume.
// Implements: text extraction hand-off, model estimation with heuristic fallback,
// duration rendering, batch results.
// All model calls go through llm_client.

use once_cell::sync::Lazy;
use regex::Regex;

pub mod duration;
pub mod estimator;
pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod pipeline;
pub mod prompts;

static DECIMAL_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern is valid"));

/// Rounds to one decimal place from the exact binary value, ties to even.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Parses a numeral matched by `\d+(?:\.\d+)?`, accepting any Unicode decimal digits.
pub(crate) fn parse_numeral(numeral: &str) -> Option<f64> {
    if numeral.is_ascii() {
        return numeral.parse().ok();
    }

    let mut ascii = String::with_capacity(numeral.len());
    for c in numeral.chars() {
        if c.is_ascii() {
            ascii.push(c);
        } else {
            ascii.push(char::from(b'0' + unicode_digit_value(c)?));
        }
    }
    ascii.parse().ok()
}

fn is_decimal_digit(code_point: u32) -> bool {
    char::from_u32(code_point)
        .is_some_and(|c| DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4])))
}

/// Decimal digits are encoded in contiguous runs of ten starting at zero, so a
/// digit's value is its offset from the start of its run, modulo ten.
fn unicode_digit_value(c: char) -> Option<u8> {
    let code_point = u32::from(c);
    if !is_decimal_digit(code_point) {
        return None;
    }
    let mut start = code_point;
    while start > 0 && is_decimal_digit(start - 1) {
        start -= 1;
    }
    u8::try_from((code_point - start) % 10).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(3.0), 3.0);
        assert_eq!(round_to_tenth(3.04), 3.0);
        assert_eq!(round_to_tenth(3.06), 3.1);
        assert_eq!(round_to_tenth(5.46), 5.5);
    }

    #[test]
    fn test_round_to_tenth_uses_exact_value_ties_to_even() {
        // 0.25 and 2.25 are exact ties; 0.35 and 1.45 sit just below the midpoint.
        assert_eq!(round_to_tenth(0.25), 0.2);
        assert_eq!(round_to_tenth(2.25), 2.2);
        assert_eq!(round_to_tenth(0.35), 0.3);
        assert_eq!(round_to_tenth(1.45), 1.4);
        assert_eq!(round_to_tenth(0.75), 0.8);
    }

    #[test]
    fn test_round_to_tenth_keeps_huge_values_finite() {
        assert_eq!(round_to_tenth(1e20), 1e20);
        assert_eq!(round_to_tenth(1e308), 1e308);
        assert!(round_to_tenth(f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_parse_numeral_ascii() {
        assert_eq!(parse_numeral("12.5"), Some(12.5));
        assert_eq!(parse_numeral("007"), Some(7.0));
    }

    #[test]
    fn test_parse_numeral_unicode_digits() {
        // Arabic-Indic three, Bengali five point five, mathematical bold seven.
        assert_eq!(parse_numeral("\u{0663}"), Some(3.0));
        assert_eq!(parse_numeral("\u{09EB}.\u{09EB}"), Some(5.5));
        assert_eq!(parse_numeral("\u{1D7D5}"), Some(7.0));
        assert_eq!(parse_numeral("1\u{0660}"), Some(10.0));
    }

    #[test]
    fn test_parse_numeral_rejects_non_digits() {
        assert_eq!(parse_numeral("\u{00BD}"), None);
        assert_eq!(parse_numeral("x"), None);
    }
}
