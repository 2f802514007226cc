//! Selected ingredients paired with their template role and amount
//!
//! Keeping role, ingredient and amount together means an omitted role never
//! shifts the amounts of the roles after it.

use crate::abv::estimate_abv;
use moodmix_common::rules::{DilutionByMethod, RoleDef};
use moodmix_common::{FlavorVector, Ingredient, Method, RecipeIngredient};

/// Amount for an ingredient that has no role definition
pub const PAD_AMOUNT_ML: f64 = 15.0;

/// One selected ingredient
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub role: Option<&'a RoleDef>,
    pub ingredient: &'a Ingredient,
    pub amount_ml: f64,
}

impl<'a> Slot<'a> {
    /// Slot at the role's own amount
    pub fn for_role(role: &'a RoleDef, ingredient: &'a Ingredient) -> Self {
        Self {
            role: Some(role),
            ingredient,
            amount_ml: role.ml(),
        }
    }

    /// Slot with an optional role; no role means the pad amount
    pub fn with_optional_role(role: Option<&'a RoleDef>, ingredient: &'a Ingredient) -> Self {
        match role {
            Some(r) => Self::for_role(r, ingredient),
            None => Self {
                role: None,
                ingredient,
                amount_ml: PAD_AMOUNT_ML,
            },
        }
    }

    /// Role name as written in the template, empty without a role
    pub fn role_name(&self) -> &str {
        self.role.map(|r| r.role.as_str()).unwrap_or("")
    }
}

/// Amount-weighted flavor of the selection
pub fn blend_flavor(slots: &[Slot<'_>]) -> FlavorVector {
    FlavorVector::weighted_average(slots.iter().map(|s| (&s.ingredient.flavors, s.amount_ml)))
}

/// Rounded total volume
pub fn total_ml(slots: &[Slot<'_>]) -> f64 {
    slots.iter().map(|s| s.amount_ml.max(0.0)).sum::<f64>().round()
}

pub fn selection_abv(slots: &[Slot<'_>], method: Method, dilution: &DilutionByMethod, na: bool) -> u32 {
    estimate_abv(
        slots.iter().map(|s| (s.amount_ml, s.ingredient.abv_or_zero())),
        method,
        dilution,
        na,
    )
}

/// Recipe ingredient lines
pub fn recipe_lines(slots: &[Slot<'_>]) -> Vec<RecipeIngredient> {
    slots
        .iter()
        .map(|s| RecipeIngredient {
            name: s.ingredient.name.clone(),
            amount_ml: s.amount_ml,
            abv: s.ingredient.abv,
        })
        .collect()
}
