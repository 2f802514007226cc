//! ABV and dilution estimation
//!
//! `abv = round(100 * alcohol / max(1, total + total * dilution(method)))`
//! where `alcohol = Σ amount * abv / 100` (zero in NA mode). Always
//! recomputed from the current ingredient list, never cached.

use moodmix_common::flavor::round_half_up;
use moodmix_common::rules::DilutionByMethod;
use moodmix_common::{Method, Recipe};

/// Estimate ABV from `(amount_ml, abv_percent)` lines
///
/// Negative amounts count as 0. The result is clamped to 0–100.
pub fn estimate_abv<I>(lines: I, method: Method, dilution: &DilutionByMethod, na: bool) -> u32
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut total = 0.0;
    let mut alcohol = 0.0;
    for (amount, abv) in lines {
        let amount = amount.max(0.0);
        total += amount;
        alcohol += amount * abv.max(0.0) / 100.0;
    }
    if na {
        alcohol = 0.0;
    }
    let diluted = total + total * dilution.factor(method);
    let abv = round_half_up(100.0 * alcohol / diluted.max(1.0));
    abv.clamp(0.0, 100.0) as u32
}

/// Estimate ABV of a recipe's current ingredient list
///
/// Lines with unknown ABV count as non-alcoholic.
pub fn recipe_abv(recipe: &Recipe, dilution: &DilutionByMethod, na: bool) -> u32 {
    estimate_abv(
        recipe
            .ingredients
            .iter()
            .map(|i| (i.amount_ml, i.abv.unwrap_or(0.0))),
        recipe.method,
        dilution,
        na,
    )
}

/// Rough calorie estimate for a served volume
pub fn estimate_calories(total_ml: f64) -> u32 {
    round_half_up(total_ml.max(0.0) * 0.6) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaken_reference_value() {
        // 100 ml total, 20 ml alcohol, 18% melt: 100 * 20 / 118 = 16.95
        let abv = estimate_abv([(50.0, 40.0), (50.0, 0.0)], Method::Shake, &DilutionByMethod::default(), false);
        assert_eq!(abv, 17);
    }

    #[test]
    fn test_na_is_zero() {
        let abv = estimate_abv([(50.0, 40.0)], Method::Stir, &DilutionByMethod::default(), true);
        assert_eq!(abv, 0);
    }

    #[test]
    fn test_method_changes_dilution() {
        let d = DilutionByMethod::default();
        let lines = [(60.0, 40.0), (30.0, 0.0)];
        let shaken = estimate_abv(lines, Method::Shake, &d, false);
        let built = estimate_abv(lines, Method::Build, &d, false);
        assert!(built > shaken);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(estimate_abv(Vec::<(f64, f64)>::new(), Method::Build, &DilutionByMethod::default(), false), 0);
    }

    #[test]
    fn test_calories() {
        assert_eq!(estimate_calories(150.0), 90);
        assert_eq!(estimate_calories(-3.0), 0);
    }
}
