//! Finalization: post-generation constraint repair
//!
//! Runs after every engine:
//!
//! 1. backfill missing per-line ABV from the catalog by name
//! 2. with inventory preference, inject inventory items the recipe lacks
//! 3. recompute total volume, ABV and (when present) calories
//!
//! This is the only place inventory items are added to a recipe. Running it
//! twice with the same options gives the same result as running it once.

use crate::abv::{estimate_calories, recipe_abv};
use crate::constraints::{normalize_inventory_ids, ConstraintFilter};
use crate::options::GenerateOptions;
use crate::slots::PAD_AMOUNT_ML;
use moodmix_common::rules::DilutionByMethod;
use moodmix_common::{CatalogIndex, Category, Recipe, RecipeIngredient};
use tracing::{debug, warn};

/// Inputs finalization reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizeOptions {
    pub inventory_items: Vec<String>,
    pub prefer_inventory: bool,
    pub na: bool,
    pub allergies: Vec<String>,
}

impl From<&GenerateOptions> for FinalizeOptions {
    fn from(opts: &GenerateOptions) -> Self {
        Self {
            inventory_items: opts.inventory_items.clone(),
            prefer_inventory: opts.prefer_inventory,
            na: opts.na,
            allergies: opts.normalized_allergies(),
        }
    }
}

/// Injected amount for an inventory item of a category
pub fn default_amount_for_category(category: &Category) -> f64 {
    match category {
        Category::Base | Category::Spirit | Category::NaBase => 45.0,
        Category::Liquor | Category::Juice => 20.0,
        Category::Syrup => 15.0,
        Category::Mixer | Category::Soft => 120.0,
        Category::Bitters => 2.0,
        Category::Herb | Category::Garnish => 1.0,
        _ => PAD_AMOUNT_ML,
    }
}

fn backfill_abv(catalog: &CatalogIndex, lines: &mut [RecipeIngredient]) {
    for line in lines.iter_mut().filter(|l| l.abv.is_none()) {
        if let Some(abv) = catalog.ingredient_by_name(&line.name).and_then(|i| i.abv) {
            line.abv = Some(abv);
        }
    }
}

fn inject_inventory(catalog: &CatalogIndex, recipe: &mut Recipe, opts: &FinalizeOptions) {
    let filter = ConstraintFilter::new(opts.na, opts.allergies.clone());
    for id in normalize_inventory_ids(catalog, &opts.inventory_items) {
        match catalog.ingredient_by_id(&id).or_else(|| catalog.ingredient_by_name(&id)) {
            Some(ing) if !filter.allows(ing) => {
                debug!("Inventory item {} skipped by constraints", id);
            }
            Some(ing) => {
                if !recipe.has_ingredient_named(&ing.name) {
                    recipe.ingredients.push(RecipeIngredient {
                        name: ing.name.clone(),
                        amount_ml: default_amount_for_category(&ing.category),
                        abv: ing.abv,
                    });
                }
            }
            None => {
                if !recipe.has_ingredient_named(&id) {
                    warn!("Inventory item {} not in catalog, added as display-only line", id);
                    recipe.ingredients.push(RecipeIngredient {
                        name: id,
                        amount_ml: PAD_AMOUNT_ML,
                        abv: None,
                    });
                }
            }
        }
    }
}

/// Finalize an engine's recipe
pub fn finalize(mut recipe: Recipe, catalog: &CatalogIndex, dilution: &DilutionByMethod, opts: &FinalizeOptions) -> Recipe {
    backfill_abv(catalog, &mut recipe.ingredients);
    if opts.prefer_inventory && !opts.inventory_items.is_empty() {
        inject_inventory(catalog, &mut recipe, opts);
    }
    recipe.total_ml = recipe.sum_amounts();
    recipe.estimated_abv = recipe_abv(&recipe, dilution, opts.na);
    if recipe.estimated_calories.is_some() {
        recipe.estimated_calories = Some(estimate_calories(recipe.total_ml));
    }
    recipe
}
