//! Classic engine
//!
//! Template-driven generation: a template is resolved through a fixed
//! ladder of fallbacks, each role is filled with the best-matching allowed
//! ingredient, amounts are tuned from the taste sliders and the result is
//! named procedurally.
//!
//! # Template ladder
//!
//! | Rung | Condition |
//! |------|-----------|
//! | [`TemplateRung::Sparkling`] | NA or effervescence ≥ 0.6, and a highball/collins template exists |
//! | [`TemplateRung::MoodCandidate`] | the mood's first template candidate is in the catalog |
//! | [`TemplateRung::CatalogFirst`] | the template catalog is non-empty |
//! | [`TemplateRung::Builtin`] | always (`sour`, no roles) |

use crate::abv::estimate_calories;
use crate::constraints::{is_sparkling, mood_allows_sparkling_fallback, ConstraintFilter, Inventory};
use crate::context::EngineContext;
use crate::fusion::{effervescence_preference, fuse_target, reduce_sweetener_ml};
use crate::naming::{detect_base_spirit, generate_name, generate_simple_name, ClassicNameInput};
use crate::options::GenerateOptions;
use crate::slots::{blend_flavor, recipe_lines, selection_abv, total_ml, Slot};
use moodmix_common::flavor::{clamp01, round_half_up, FlavorKey, FlavorVector, TasteInput};
use moodmix_common::rules::{RatioTuning, RoleSelector, TemplateDef};
use moodmix_common::similarity::{best_match, rank_by_flavor};
use moodmix_common::{CatalogIndex, Category, Ingredient, Method, MoodProfile, Recipe, Result, RuleSet, Unit};
use tracing::debug;

/// Effervescence preference at which sparkling styles kick in
pub const SPARKLING_PREFERENCE: f64 = 0.6;

/// Template id used when the catalog offers nothing
pub const BUILTIN_TEMPLATE_ID: &str = "sour";

pub const DEFAULT_GLASS: &str = "coupe";

/// Size of the similarity shortlist for the fallback selection
const FALLBACK_SHORTLIST: usize = 12;
/// Ingredients taken by the fallback selection
const FALLBACK_PICKS: usize = 4;

const STORY: &str = "灵感来袭。此杯结合你的口味微调形成的风味倾向，带来恰到好处的层次。";

/// Which fallback resolved the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRung {
    Sparkling,
    MoodCandidate,
    CatalogFirst,
    Builtin,
}

/// Resolved template
#[derive(Debug, Clone, Copy)]
pub struct TemplateChoice<'a> {
    pub rung: TemplateRung,
    /// `None` only for [`TemplateRung::Builtin`]
    pub def: Option<&'a TemplateDef>,
}

impl<'a> TemplateChoice<'a> {
    pub fn id(&self) -> &'a str {
        self.def.map(|t| t.id.as_str()).unwrap_or(BUILTIN_TEMPLATE_ID)
    }

    pub fn method(&self) -> Method {
        self.def.and_then(|t| t.method).unwrap_or(Method::Shake)
    }

    pub fn glass(&self) -> String {
        self.def
            .and_then(|t| t.default_glass.clone())
            .unwrap_or_else(|| DEFAULT_GLASS.to_string())
    }
}

/// Walk the template ladder
pub fn choose_template<'a>(rules: &'a RuleSet, mood: &MoodProfile, eff_pref: f64, na: bool) -> TemplateChoice<'a> {
    if na || eff_pref >= SPARKLING_PREFERENCE {
        if let Some(def) = ["highball", "collins"].iter().find_map(|id| rules.template(id)) {
            return TemplateChoice { rung: TemplateRung::Sparkling, def: Some(def) };
        }
    }
    if let Some(def) = mood.template_candidates.first().and_then(|c| rules.template(c)) {
        return TemplateChoice { rung: TemplateRung::MoodCandidate, def: Some(def) };
    }
    if let Some(def) = rules.template_catalog.first() {
        return TemplateChoice { rung: TemplateRung::CatalogFirst, def: Some(def) };
    }
    TemplateChoice { rung: TemplateRung::Builtin, def: None }
}

/// Candidate pool of a role selector, in selector order
fn selector_pool<'a>(catalog: &'a CatalogIndex, selector: &RoleSelector) -> Vec<&'a Ingredient> {
    match selector {
        RoleSelector::Ids(ids) => ids.iter().filter_map(|id| catalog.ingredient_by_id(id)).collect(),
        RoleSelector::Categories(categories) => categories.iter().flat_map(|c| catalog.category(c)).collect(),
    }
}

/// Per-call selection state
struct Picker<'a> {
    catalog: &'a CatalogIndex,
    filter: ConstraintFilter,
    inventory: Inventory,
    prefer_inventory: bool,
}

impl<'a> Picker<'a> {
    /// Filter, then move held ingredients forward when preferred
    fn prepare(&self, pool: Vec<&'a Ingredient>) -> Vec<&'a Ingredient> {
        let pool = self.filter.apply(pool);
        if self.prefer_inventory {
            self.inventory.reorder(pool)
        } else {
            pool
        }
    }

    fn pick(&self, target: &FlavorVector, pool: Vec<&'a Ingredient>) -> Option<&'a Ingredient> {
        best_match(target, self.prepare(pool))
    }

    /// Base ingredient for the fallback selection
    fn fallback_base(&self, target: &FlavorVector) -> Option<&'a Ingredient> {
        let catalog = self.catalog;
        let pool = if self.filter.na {
            catalog
                .first_category(&[Category::NaBase, Category::Soft, Category::Mixer])
                .unwrap_or_else(|| catalog.ingredients().iter().filter(|i| !i.is_alcoholic()).collect())
        } else {
            catalog
                .first_category(&[Category::Base, Category::Spirit])
                .unwrap_or_else(|| catalog.ingredients().iter().collect())
        };
        let pool = self.filter.apply(pool);
        if self.prefer_inventory {
            if let Some(held) = pool.iter().copied().find(|i| self.inventory.holds(i)) {
                return Some(held);
            }
        }
        best_match(target, pool)
    }

    /// Flavor-matched list used when no template role resolved
    fn fallback_selection(&self, target: &FlavorVector) -> Vec<&'a Ingredient> {
        let base = self.fallback_base(target);
        let pool = self.prepare(self.catalog.ingredients().iter().collect());
        let matched = rank_by_flavor(target, pool, Some(FALLBACK_SHORTLIST));
        base.into_iter()
            .chain(matched.into_iter().filter(|i| !base.is_some_and(|b| std::ptr::eq(*i, b))))
            .take(FALLBACK_PICKS)
            .collect()
    }
}

/// Taste units away from the slider midpoint, in steps of 10 points
fn taste_units(taste: &TasteInput, key: FlavorKey) -> f64 {
    round_half_up((taste.slider(key) - 50.0) / 10.0)
}

/// Slider-driven amount for one role
pub fn tune_role_amount(tuning: &RatioTuning, role: &str, amount_ml: f64, taste: &TasteInput) -> f64 {
    let adjusted = match role {
        "sweetener" => amount_ml + taste_units(taste, FlavorKey::Sweet) * tuning.sweet_adjust_ml_per_unit,
        "citrus" => amount_ml + taste_units(taste, FlavorKey::Sour) * tuning.sour_adjust_ml_per_unit,
        "mixer" | "tropical_juice" => amount_ml + taste_units(taste, FlavorKey::Fruit) * tuning.fruit_adjust_ml_per_unit,
        "bitters" => amount_ml + taste_units(taste, FlavorKey::Bitter) * tuning.bitter_adjust_dashes_per_unit,
        "base" => amount_ml + taste_units(taste, FlavorKey::Body) * tuning.boozy_adjust_base_ml,
        _ => amount_ml,
    };
    round_half_up(adjusted.max(0.0))
}

/// Generate a recipe with the classic engine
///
/// Fails only with [`moodmix_common::Error::UnknownMood`]. Roles that no
/// allowed ingredient can fill are omitted.
pub fn generate(ctx: &EngineContext, opts: &GenerateOptions) -> Result<Recipe> {
    let mood = ctx.mood(&opts.mood_key)?;
    let rules = ctx.rules();
    let catalog = ctx.catalog();

    let target = fuse_target(&rules.fusion_weights, mood, &opts.taste);
    let eff_pref = effervescence_preference(&opts.taste);
    let template = choose_template(rules, mood, eff_pref, opts.na);
    let method = template.method();
    debug!(
        "Classic template {} via {:?} (effervescence {:.2})",
        template.id(),
        template.rung,
        eff_pref
    );

    let picker = Picker {
        catalog,
        filter: ConstraintFilter::new(opts.na, opts.normalized_allergies()),
        inventory: Inventory::new(catalog, &opts.inventory_items),
        prefer_inventory: opts.prefer_inventory,
    };

    let roles = template.def.map(|t| t.roles.as_slice()).unwrap_or_default();
    let mut slots: Vec<Slot<'_>> = roles
        .iter()
        .filter_map(|role| {
            let selector = rules.role_selectors.get(&role.role)?;
            let ingredient = picker.pick(&target, selector_pool(catalog, selector))?;
            Some(Slot::for_role(role, ingredient))
        })
        .collect();

    if slots.is_empty() {
        slots = picker
            .fallback_selection(&target)
            .into_iter()
            .enumerate()
            .map(|(i, ing)| Slot::with_optional_role(roles.get(i), ing))
            .collect();
        debug!("No template role resolved, fallback selection of {}", slots.len());
    }

    if opts.na {
        slots.retain(|s| !s.ingredient.is_alcoholic());
    }

    for slot in slots.iter_mut() {
        let role = slot.role_name().to_string();
        slot.amount_ml = tune_role_amount(&rules.ratio_tuning, &role, slot.amount_ml, &opts.taste);
    }

    if opts.low_sugar {
        let pref = rules.low_sugar();
        for slot in slots.iter_mut().filter(|s| s.role_name() == "sweetener") {
            slot.amount_ml = reduce_sweetener_ml(pref, slot.amount_ml);
        }
    }

    if eff_pref >= SPARKLING_PREFERENCE
        && mood_allows_sparkling_fallback(mood, Some(template.id()))
        && !slots.iter().any(|s| is_sparkling(s.ingredient))
    {
        let candidate = catalog
            .ingredients()
            .iter()
            .find(|i| is_sparkling(i) && picker.filter.allows(i));
        if let (Some(candidate), Some(last)) = (candidate, slots.last_mut()) {
            debug!("Sparkling fallback: {} replaces {}", candidate.name, last.ingredient.name);
            last.ingredient = candidate;
        }
    }

    // roles tuned down to nothing leave no line
    slots.retain(|s| s.amount_ml > 0.0);

    let mut flavor = blend_flavor(&slots);
    let has_sparkling = slots.iter().any(|s| is_sparkling(s.ingredient));
    if has_sparkling {
        flavor.spicy = clamp01(flavor.spicy + eff_pref * rules.effervescence_boost_factor);
    }

    let estimated_abv = selection_abv(&slots, method, &rules.dilution_by_method, opts.na);

    let base_id = slots
        .iter()
        .find(|s| s.ingredient.category.is_base_like())
        .and_then(|s| s.ingredient.id.as_deref());
    let garnish = rules.garnish_for_base(base_id);

    let selected: Vec<&Ingredient> = slots.iter().map(|s| s.ingredient).collect();
    let seed_salt = opts.effective_seed_salt();
    let name_input = ClassicNameInput {
        mood,
        flavor: &flavor,
        has_sparkling,
        na: opts.na,
        method,
        base_spirit: detect_base_spirit(base_id, &selected),
        variability: opts.variability.unwrap_or(0.0),
        seed_salt: &seed_salt,
    };
    let name = match &rules.naming_v2 {
        Some(naming) => generate_name(naming, &name_input),
        None => generate_simple_name(&rules.naming, &name_input),
    };

    let total = total_ml(&slots);
    Ok(Recipe {
        name,
        story: STORY.to_string(),
        mood: mood.key.clone(),
        template: template.id().to_string(),
        method,
        glass: template.glass(),
        ice: Some(rules.ice_rules.for_method(method).to_string()),
        garnish,
        ingredients: recipe_lines(&slots),
        total_ml: total,
        unit: Unit::default(),
        estimated_abv,
        estimated_calories: Some(estimate_calories(total)),
        flavor,
    })
}
