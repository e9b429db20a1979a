use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the fractional year becomes whole months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Nearest month, ties to even.
    #[default]
    Round,
    Floor,
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" => Ok(RoundingMode::Round),
            "floor" => Ok(RoundingMode::Floor),
            other => Err(format!("rounding must be 'round' or 'floor', got '{other}'")),
        }
    }
}

/// Renders decimal years as "N years M months".
///
/// Units are never singularized: one year renders as "1 years". Years are kept as
/// a float throughout, so any finite figure renders its exact whole-year count.
pub fn format_duration(decimal_years: f64, mode: RoundingMode) -> String {
    let mut years = decimal_years.trunc();
    let fraction_in_months = (decimal_years - years) * 12.0;
    let mut months = match mode {
        RoundingMode::Round => fraction_in_months.round_ties_even(),
        RoundingMode::Floor => fraction_in_months.trunc(),
    };

    if months >= 12.0 {
        years += 1.0;
        months -= 12.0;
    }

    let has_years = years != 0.0;
    let has_months = months != 0.0;
    match (has_years, has_months) {
        (false, false) => "0 years".to_string(),
        (true, false) => format!("{years:.0} years"),
        (false, true) => format!("{months:.0} months"),
        (true, true) => format!("{years:.0} years {months:.0} months"),
    }
}
