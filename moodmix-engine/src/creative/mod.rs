//! Creative engine
//!
//! Mood → intent → strategy → envelope → style (+ motif) → role picks with
//! semantic tags → low-sugar → micro-tuning → bilingual name.
//!
//! # Submodules
//!
//! - [`intent`]: intent profile, strategy, flavor envelope
//! - [`style`]: template/method/glass resolution and motifs
//! - [`tags`]: semantic tags, garnish hints, pairing harmony
//! - [`tuning`]: the micro-tuning optimizer

pub mod intent;
pub mod style;
pub mod tags;
pub mod tuning;

pub use intent::{build_envelope, derive_intent, select_strategy, Envelope};
pub use style::{apply_motif, choose_motif, pick_style, StyleSpec};
pub use tuning::{micro_tune_amounts, TuneLine, TuneParams};

use crate::constraints::{ConstraintFilter, Inventory};
use crate::context::EngineContext;
use crate::fusion::{apply_low_sugar_target, fuse_target, reduce_sweetener_ml};
use crate::naming::{generate_bilingual, CreativeNameInput};
use crate::options::GenerateOptions;
use crate::slots::{blend_flavor, recipe_lines, selection_abv, total_ml, Slot};
use moodmix_common::flavor::{clamp01, FlavorVector};
use moodmix_common::rules::{NamingRules, RoleSelector};
use moodmix_common::similarity::rank_by_flavor;
use moodmix_common::{CatalogIndex, Category, Ingredient, Recipe, Result, RuleSet, Unit};
use tracing::debug;

/// Similarity shortlist size before tag re-ranking
const SHORTLIST: usize = 12;

/// Naming variability when the caller gives none
pub const DEFAULT_VARIABILITY: f64 = 0.3;

/// Candidate pool for a role with no usable selector, by role name
fn role_name_pool<'a>(catalog: &'a CatalogIndex, role: &str, na: bool) -> Vec<&'a Ingredient> {
    let all = || catalog.ingredients().iter().collect::<Vec<_>>();
    let first = |cats: &[Category]| catalog.first_category(cats).unwrap_or_else(all);
    match role {
        "base" | "modifier" if na => catalog
            .first_category(&[Category::NaBase, Category::Soft, Category::Mixer])
            .unwrap_or_else(|| catalog.ingredients().iter().filter(|i| !i.is_alcoholic()).collect()),
        "base" | "modifier" => first(&[Category::Base, Category::Spirit]),
        "citrus" | "sour" => first(&[
            Category::Other("sour".to_string()),
            Category::Other("citrus".to_string()),
            Category::Juice,
        ]),
        "sweet" | "sweetener" => first(&[Category::Syrup, Category::Other("sweetener".to_string())]),
        "aroma" | "liqueur" => first(&[
            Category::Other("aroma".to_string()),
            Category::Other("liqueur".to_string()),
            Category::Liquor,
            Category::Bitters,
        ]),
        "bitter" | "bitters" => first(&[Category::Bitters]),
        "mixer" => first(&[Category::Mixer, Category::Soft]),
        _ => all(),
    }
}

/// Per-call picking state
struct RolePicker<'a> {
    catalog: &'a CatalogIndex,
    rules: &'a RuleSet,
    filter: &'a ConstraintFilter,
    inventory: Inventory,
    prefer_inventory: bool,
    desired_tags: &'a [String],
}

impl<'a> RolePicker<'a> {
    fn pool(&self, role: &str) -> Vec<&'a Ingredient> {
        let from_selector = match self.rules.role_selectors.get(role) {
            Some(RoleSelector::Ids(ids)) => ids.iter().filter_map(|id| self.catalog.ingredient_by_id(id)).collect(),
            Some(RoleSelector::Categories(cats)) => cats.iter().flat_map(|c| self.catalog.category(c)).collect(),
            None => Vec::new(),
        };
        if from_selector.is_empty() {
            role_name_pool(self.catalog, &role.to_lowercase(), self.filter.na)
        } else {
            from_selector
        }
    }

    /// Filter, rank by similarity, re-rank by desired tags, prefer inventory
    fn pick(&self, role: &str, palate: &FlavorVector) -> Option<&'a Ingredient> {
        let allowed = self.filter.apply(self.pool(role));
        let mut ranked = rank_by_flavor(palate, allowed, Some(SHORTLIST));
        if !self.desired_tags.is_empty() {
            let tables = &self.rules.semantic_tags;
            ranked.sort_by_key(|i| std::cmp::Reverse(tags::tag_match_score(tables, i, self.desired_tags)));
        }
        if self.prefer_inventory {
            ranked = self.inventory.reorder(ranked);
        }
        ranked.into_iter().next()
    }
}

/// Base-spirit key for naming: the first base/spirit ingredient's id (or
/// name) containing a spirit-hint key
fn naming_base_spirit<'n>(naming: &'n NamingRules, slots: &[Slot<'_>]) -> &'n str {
    let Some(base) = slots
        .iter()
        .find(|s| matches!(s.ingredient.category, Category::Base | Category::Spirit))
    else {
        return "";
    };
    let label = base.ingredient.id_or_name().to_lowercase();
    naming
        .spirit_hints
        .keys()
        .find(|k| label.contains(k.as_str()))
        .map(String::as_str)
        .unwrap_or("")
}

/// Generate a recipe with the creative engine
///
/// Fails only with [`moodmix_common::Error::UnknownMood`]. Roles no allowed
/// ingredient can fill are left out. ABV is estimated here and recomputed by
/// finalization.
pub fn generate(ctx: &EngineContext, opts: &GenerateOptions) -> Result<Recipe> {
    let mood = ctx.mood(&opts.mood_key)?;
    let rules = ctx.rules();
    let catalog = ctx.catalog();

    let intent = derive_intent(rules, mood);
    let strategy = select_strategy(&opts.taste, opts.risk_level, opts.contrast_threshold);

    let mut palate = fuse_target(&rules.fusion_weights, mood, &opts.taste);
    if opts.low_sugar {
        palate = apply_low_sugar_target(rules.low_sugar(), &palate);
    }
    let envelope = build_envelope(strategy, palate);

    let mut style = pick_style(rules, strategy, opts.na);
    let motif = choose_motif(rules, &mood.key, strategy);
    if let Some(m) = motif {
        style = apply_motif(rules, style, m);
    }
    let desired_tags: Vec<String> = motif.map(|m| m.tags.clone()).unwrap_or_default();
    debug!(
        "Creative strategy {} template {} motif {}",
        strategy,
        style.template,
        motif.map(|m| m.id.as_str()).unwrap_or("-")
    );

    let filter = ConstraintFilter::new(opts.na, opts.normalized_allergies());
    let picker = RolePicker {
        catalog,
        rules,
        filter: &filter,
        inventory: Inventory::new(catalog, &opts.inventory_items),
        prefer_inventory: opts.prefer_inventory,
        desired_tags: &desired_tags,
    };

    let mut slots: Vec<Slot<'_>> = style
        .roles
        .iter()
        .filter_map(|role| picker.pick(&role.role, &envelope.palate).map(|ing| Slot::for_role(role, ing)))
        .collect();

    if opts.low_sugar {
        let pref = rules.low_sugar();
        for slot in slots.iter_mut() {
            let role = slot.role_name().to_lowercase();
            if role.contains("sweet") || role.contains("syrup") {
                slot.amount_ml = reduce_sweetener_ml(pref, slot.amount_ml);
            }
        }
    }

    if opts.micro_tune.enabled {
        let (iterations, step_ml) = opts.micro_tune.resolve();
        let params = TuneParams::new(iterations, step_ml, true);
        let lines: Vec<TuneLine<'_>> = slots
            .iter()
            .map(|s| TuneLine { flavor: &s.ingredient.flavors, role: s.role_name() })
            .collect();
        let amounts: Vec<f64> = slots.iter().map(|s| s.amount_ml).collect();
        let tuned = micro_tune_amounts(&lines, &amounts, &envelope.palate, &params);
        for (slot, amount) in slots.iter_mut().zip(tuned) {
            slot.amount_ml = amount;
        }
    }

    let flavor = blend_flavor(&slots);
    let tables = &rules.semantic_tags;
    let has_sparkling = slots
        .iter()
        .any(|s| tags::has_tag(tables, s.ingredient, tags::SPARKLING_TAG));

    let selected: Vec<&Ingredient> = slots.iter().map(|s| s.ingredient).collect();
    debug!(
        "Pairing harmony {:.2} over {} ingredients",
        tags::harmony(tables, &rules.pairing_scores, &selected),
        selected.len()
    );

    let fallback_naming = NamingRules::default();
    let naming = rules.naming_v2.as_ref().unwrap_or(&fallback_naming);
    let seed_salt = opts.effective_seed_salt();
    let bilingual = generate_bilingual(
        naming,
        &CreativeNameInput {
            mood,
            envelope: &envelope,
            has_sparkling,
            na: opts.na,
            method: style.method,
            base_spirit: naming_base_spirit(naming, &slots),
            variability: opts.variability.unwrap_or(DEFAULT_VARIABILITY),
            seed_salt: &seed_salt,
            modernity: clamp01(opts.modernity.unwrap_or(intent.modernity)),
            risk: clamp01(opts.risk_level.unwrap_or(0.5)),
        },
    );

    let mut hints = desired_tags.clone();
    if has_sparkling {
        hints.push(tags::SPARKLING_TAG.to_string());
    }
    let garnish = tags::garnish_from_hints(catalog, &filter, &hints);

    Ok(Recipe {
        name: bilingual.title(),
        story: bilingual.story(),
        mood: mood.key.clone(),
        template: style.template.clone(),
        method: style.method,
        glass: style.glass.clone(),
        ice: None,
        garnish,
        ingredients: recipe_lines(&slots),
        total_ml: total_ml(&slots),
        unit: Unit::default(),
        estimated_abv: selection_abv(&slots, style.method, &rules.dilution_by_method, opts.na),
        estimated_calories: None,
        flavor,
    })
}
