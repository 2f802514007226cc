//! Display units
//!
//! Amounts are always stored in millilitres; the unit only affects rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millilitres per US fluid ounce
pub const ML_PER_OZ: f64 = 29.5735;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Ml,
    Oz,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::Oz => "oz",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(Unit::Ml),
            "oz" => Ok(Unit::Oz),
            other => Err(format!("unknown unit '{}' (expected ml or oz)", other)),
        }
    }
}

/// Render an amount given in millilitres
///
/// Millilitres print as-is (no trailing `.0` for whole numbers); ounces are
/// converted and printed to two decimals.
pub fn format_amount(unit: Unit, ml: f64) -> String {
    match unit {
        Unit::Ml => format!("{} ml", ml),
        Unit::Oz => format!("{:.2} oz", ml / ML_PER_OZ),
    }
}

/// Render a per-ingredient ABV, `—` when unknown
pub fn format_abv(abv: Option<f64>) -> String {
    match abv {
        Some(v) => format!("{}%", v.round()),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_ml() {
        assert_eq!(format_amount(Unit::Ml, 45.0), "45 ml");
        assert_eq!(format_amount(Unit::Ml, 2.5), "2.5 ml");
    }

    #[test]
    fn test_format_amount_oz() {
        assert_eq!(format_amount(Unit::Oz, 29.5735), "1.00 oz");
        assert_eq!(format_amount(Unit::Oz, 45.0), "1.52 oz");
    }

    #[test]
    fn test_format_abv() {
        assert_eq!(format_abv(Some(40.0)), "40%");
        assert_eq!(format_abv(Some(44.7)), "45%");
        assert_eq!(format_abv(None), "—");
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("OZ".parse::<Unit>(), Ok(Unit::Oz));
        assert!("cup".parse::<Unit>().is_err());
    }
}
