//! Regex fallback used whenever the model is unavailable or its answer is unusable.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_numeral, round_to_tenth};

static YEARS_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:\+)?\s*(?:years?|yrs?)").expect("years pattern is valid")
});

/// Largest "N years" / "N+ yrs" figure mentioned in the text, to one decimal. 0.0 when none.
///
/// This takes a maximum, it does not merge ranges. A numeral too long for `f64`
/// yields infinity; callers decide what to do with it.
pub fn estimate_years_heuristically(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let lowered = text.to_lowercase();
    YEARS_MENTION
        .captures_iter(&lowered)
        .filter_map(|caps| parse_numeral(&caps[1]))
        .reduce(f64::max)
        .map(round_to_tenth)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_the_largest_mention() {
        assert_eq!(
            estimate_years_heuristically("I have 5 years and 3 yrs experience"),
            5.0
        );
    }

    #[test]
    fn test_no_mention_is_zero() {
        assert_eq!(estimate_years_heuristically("no experience mentioned"), 0.0);
        assert_eq!(estimate_years_heuristically(""), 0.0);
    }

    #[test]
    fn test_decimal_and_plus_forms() {
        assert_eq!(estimate_years_heuristically("2.5yrs at Initech"), 2.5);
        assert_eq!(estimate_years_heuristically("10+ Years of Go"), 10.0);
        assert_eq!(estimate_years_heuristically("7 + yr on-call"), 7.0);
    }

    #[test]
    fn test_max_not_sum_of_roles() {
        let text = "Software engineer, 3 years experience, then 2.5 years as lead, currently present";
        assert_eq!(estimate_years_heuristically(text), 3.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(estimate_years_heuristically("12.34 YEARS"), 12.3);
        assert_eq!(estimate_years_heuristically("4.96 years"), 5.0);
    }

    #[test]
    fn test_exact_ties_round_to_even_tenth() {
        assert_eq!(estimate_years_heuristically("2.25 years at Acme"), 2.2);
        assert_eq!(estimate_years_heuristically("1.45 yrs"), 1.4);
    }

    #[test]
    fn test_unicode_digits_count() {
        assert_eq!(estimate_years_heuristically("\u{0663} years, 2 yrs"), 3.0);
    }

    #[test]
    fn test_twenty_digit_figure_is_kept() {
        assert_eq!(
            estimate_years_heuristically("99999999999999999999 years of patience"),
            1e20
        );
    }

    #[test]
    fn test_numeral_beyond_f64_is_infinite() {
        let text = format!("{} years", "9".repeat(400));
        assert!(estimate_years_heuristically(&text).is_infinite());
    }

    #[test]
    fn test_bare_numbers_are_ignored() {
        assert_eq!(estimate_years_heuristically("Team of 40, shipped 2019"), 0.0);
    }
}
