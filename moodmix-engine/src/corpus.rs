//! Corpus engine: retrieve the closest reference recipe, then adapt it
//!
//! Candidates are scored by the L2 distance between their computed flavor
//! and the fused target, plus a flat penalty in NA mode for any line the
//! catalog knows to be alcoholic. The lowest score wins; ties keep corpus
//! order. The winner is copied and adapted for NA, low sugar and a sparkling
//! top-up.

use crate::constraints::mood_allows_sparkling_fallback;
use crate::context::EngineContext;
use crate::fusion::{effervescence_preference, fuse_target};
use crate::options::GenerateOptions;
use moodmix_common::flavor::round_half_up;
use moodmix_common::{
    CatalogIndex, Category, CorpusIngredient, CorpusRecipe, Error, FlavorKey, FlavorVector, Method, Recipe,
    RecipeIngredient, Result, Unit,
};
use tracing::debug;

/// Score penalty for an alcoholic candidate in NA mode
pub const NA_PENALTY: f64 = 0.35;

/// Syrup scale in low-sugar mode
pub const LOW_SUGAR_SYRUP_SCALE: f64 = 0.7;

pub const NA_BASE_NAME: &str = "无酒精植物基底";
pub const TOP_UP_NAME: &str = "苏打水";
pub const TOP_UP_ML: f64 = 40.0;
pub const TEMPLATE_ID: &str = "corpus_adapt";

const SPARKLING_LINE_PATTERNS: [&str; 7] = ["苏打水", "汤力水", "汽水", "ginger", "soda", "tonic", "cola"];

/// Effervescence preference at or above which a top-up is considered
const TOP_UP_THRESHOLD: f64 = 0.6;

fn is_alcoholic_line(catalog: &CatalogIndex, line: &CorpusIngredient) -> bool {
    catalog
        .ingredient_by_name(&line.name)
        .is_some_and(|i| i.is_alcoholic())
}

/// Amount-weighted flavor of corpus lines, looked up by name
///
/// Lines the catalog does not know contribute volume but no flavor.
pub fn corpus_flavor(catalog: &CatalogIndex, lines: &[CorpusIngredient]) -> FlavorVector {
    let known: Vec<_> = lines
        .iter()
        .filter_map(|l| catalog.ingredient_by_name(&l.name).map(|i| (i, l.amount_ml.max(0.0))))
        .collect();
    let total = lines.iter().map(|l| l.amount_ml.max(0.0)).sum::<f64>().max(1.0);

    let mut out = FlavorVector::default();
    for key in FlavorKey::ALL {
        let sum: f64 = known.iter().map(|(i, a)| i.flavors.get(key) * a).sum();
        out.set(key, sum / total);
    }
    out
}

/// Retrieval score of a candidate, lower is better
pub fn score_candidate(catalog: &CatalogIndex, target: &FlavorVector, recipe: &CorpusRecipe, na: bool) -> f64 {
    let distance = corpus_flavor(catalog, &recipe.ingredients).distance(target);
    let penalty = if na && recipe.ingredients.iter().any(|l| is_alcoholic_line(catalog, l)) {
        NA_PENALTY
    } else {
        0.0
    };
    distance + penalty
}

/// Best candidate; the first one wins a tie
pub fn pick_candidate<'a>(
    catalog: &CatalogIndex,
    target: &FlavorVector,
    corpus: &'a [CorpusRecipe],
    na: bool,
) -> Option<&'a CorpusRecipe> {
    let mut best: Option<(&CorpusRecipe, f64)> = None;
    for candidate in corpus {
        let score = score_candidate(catalog, target, candidate, na);
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(r, _)| r)
}

fn has_sparkling_line(lines: &[CorpusIngredient]) -> bool {
    lines.iter().any(|l| {
        let name = l.name.to_lowercase();
        SPARKLING_LINE_PATTERNS.iter().any(|p| name.contains(p))
    })
}

/// Adapt a copy of a corpus recipe to the user's constraints
///
/// The source record is never modified.
pub fn adapt(ctx: &EngineContext, base: &CorpusRecipe, opts: &GenerateOptions) -> Result<CorpusRecipe> {
    let catalog = ctx.catalog();
    let mood = ctx.mood(&opts.mood_key)?;
    let mut out = base.clone();

    if opts.na {
        for line in out.ingredients.iter_mut() {
            if is_alcoholic_line(catalog, line) {
                line.name = NA_BASE_NAME.to_string();
            }
        }
        out.method = Method::Build.as_str().to_string();
        out.glass = "highball".to_string();
    }

    if opts.low_sugar {
        for line in out.ingredients.iter_mut() {
            let is_syrup = catalog
                .ingredient_by_name(&line.name)
                .is_some_and(|i| i.category == Category::Syrup);
            if is_syrup {
                line.amount_ml = round_half_up(line.amount_ml * LOW_SUGAR_SYRUP_SCALE);
            }
        }
    }

    let wants_bubbles = effervescence_preference(&opts.taste) >= TOP_UP_THRESHOLD;
    if wants_bubbles && !has_sparkling_line(&out.ingredients) && mood_allows_sparkling_fallback(mood, None) {
        out.ingredients.push(CorpusIngredient {
            name: TOP_UP_NAME.to_string(),
            amount_ml: TOP_UP_ML,
        });
        if !opts.na {
            out.method = Method::Build.as_str().to_string();
            out.glass = "highball".to_string();
        }
    }
    Ok(out)
}

/// Generate a recipe with the corpus engine
///
/// ABV is left at 0 and calories unset; finalization computes them.
pub fn generate(ctx: &EngineContext, opts: &GenerateOptions) -> Result<Recipe> {
    let mood = ctx.mood(&opts.mood_key)?;
    let catalog = ctx.catalog();
    let target = fuse_target(&ctx.rules().fusion_weights, mood, &opts.taste);

    let picked = pick_candidate(catalog, &target, ctx.corpus(), opts.na).ok_or(Error::EmptyCorpus)?;
    debug!("Corpus pick: {} ({})", picked.name, picked.id);

    let adapted = adapt(ctx, picked, opts)?;
    let flavor = corpus_flavor(catalog, &adapted.ingredients);
    let total_ml = adapted
        .ingredients
        .iter()
        .map(|l| l.amount_ml.max(0.0))
        .sum::<f64>()
        .round();
    let glass = if adapted.glass.trim().is_empty() {
        "coupe".to_string()
    } else {
        adapted.glass.clone()
    };

    Ok(Recipe {
        name: format!("{} · 语料改编", adapted.name),
        story: format!("根据“{}”与口味偏好，从经典配方检索并轻量改编。", mood.display_name),
        mood: mood.key.clone(),
        template: TEMPLATE_ID.to_string(),
        method: Method::parse(&adapted.method).unwrap_or(Method::Shake),
        glass,
        ice: None,
        garnish: adapted.garnish.clone(),
        ingredients: adapted
            .ingredients
            .iter()
            .map(|l| RecipeIngredient {
                name: l.name.clone(),
                amount_ml: l.amount_ml,
                abv: None,
            })
            .collect(),
        total_ml,
        unit: Unit::default(),
        estimated_abv: 0,
        estimated_calories: None,
        flavor,
    })
}
