//! Eager rule-set validation

use super::{NamingRules, RuleSet};
use crate::{Error, Result};

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidRules(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRules(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}

fn validate_naming(naming: &NamingRules) -> Result<()> {
    if naming.max_len == 0 {
        return Err(Error::InvalidRules("naming_v2.max_len must be > 0".to_string()));
    }
    for tpl in &naming.templates {
        if !tpl.contains("{prefix}") || !tpl.contains("{style}") {
            return Err(Error::InvalidRules(format!(
                "naming_v2 template '{}' must contain {{prefix}} and {{style}}",
                tpl
            )));
        }
    }
    check_non_negative("naming_v2.thresholds.high", naming.thresholds.high)?;
    for (style, weight) in &naming.style_weights {
        check_non_negative(&format!("naming_v2.style_weights.{}", style), *weight)?;
    }
    Ok(())
}

impl RuleSet {
    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        check_non_negative("fusion_weights.mood", self.fusion_weights.mood)?;
        check_non_negative("fusion_weights.taste", self.fusion_weights.taste)?;

        let d = &self.dilution_by_method;
        check_fraction("dilution_by_method.shake", d.shake)?;
        check_fraction("dilution_by_method.stir", d.stir)?;
        check_fraction("dilution_by_method.build", d.build)?;

        for (i, t) in self.template_catalog.iter().enumerate() {
            if t.id.trim().is_empty() {
                return Err(Error::InvalidRules(format!(
                    "template_catalog[{}] has an empty id",
                    i
                )));
            }
        }

        let low_sugar = self.low_sugar();
        check_fraction(
            "low_sugar_preference.reduce_sweetener_ratio",
            low_sugar.reduce_sweetener_ratio,
        )?;
        check_fraction("low_sugar_preference.sweet_target_max", low_sugar.sweet_target_max)?;

        check_non_negative("effervescence_boost_factor", self.effervescence_boost_factor)?;

        if let Some(naming) = &self.naming_v2 {
            validate_naming(naming)?;
        }
        Ok(())
    }
}
