//! Taste-style labels
//!
//! A style label names the two dominant flavor dimensions ("柑橘清新",
//! "醇厚稳重"). Two variants exist:
//!
//! - [`choose_style_weighted`] (classic): weighted picks plus alias
//!   substitution, with a sparkling override that still honours a strong
//!   sour/fruit combination.
//! - [`choose_style_relaxed`] (creative): plain seeded picks, the secondary
//!   dimension's threshold relaxed by 0.1.

use super::seed::{seeded_pick, seeded_pick_weighted};
use moodmix_common::flavor::{FlavorKey, FlavorVector};
use moodmix_common::rules::NamingRules;

/// Label when no table entry applies
pub const BALANCED_STYLE: &str = "风味平衡";

/// Order used to break ties between equally strong dimensions
const STYLE_DIM_ORDER: [FlavorKey; 7] = [
    FlavorKey::Sour,
    FlavorKey::Fruit,
    FlavorKey::Sweet,
    FlavorKey::Aroma,
    FlavorKey::Body,
    FlavorKey::Spicy,
    FlavorKey::Bitter,
];

/// The two strongest dimensions, ties resolved by [`STYLE_DIM_ORDER`]
pub fn top_two_dims(flavor: &FlavorVector) -> (FlavorKey, FlavorKey) {
    let mut dims = STYLE_DIM_ORDER;
    dims.sort_by(|a, b| flavor.get(*b).total_cmp(&flavor.get(*a)));
    (dims[0], dims[1])
}

fn alias_or_self(naming: &NamingRules, picked: &str, seed: &str) -> String {
    naming
        .style_aliases
        .get(picked)
        .and_then(|aliases| seeded_pick(aliases, seed))
        .cloned()
        .unwrap_or_else(|| picked.to_string())
}

fn weighted_style<'a>(naming: &'a NamingRules, pool: &'a [String], seed: &str) -> Option<&'a String> {
    seeded_pick_weighted(pool, seed, |s| naming.style_weight(s))
}

/// Style label for the classic engine
pub fn choose_style_weighted(naming: &NamingRules, flavor: &FlavorVector, has_sparkling: bool) -> String {
    let styles = &naming.taste_styles;
    let th = naming.thresholds.high;
    let (a, b) = top_two_dims(flavor);
    let a_strong = flavor.get(a) >= th;
    let b_strong = flavor.get(b) >= th;

    if has_sparkling {
        let top_is_citrus = matches!(
            (a, b),
            (FlavorKey::Sour, FlavorKey::Fruit) | (FlavorKey::Fruit, FlavorKey::Sour)
        );
        let picked = match styles.combos.get("sour+fruit") {
            Some(citrus) if top_is_citrus && (a_strong || b_strong) => {
                weighted_style(naming, citrus, "sparkling-citrus")
                    .cloned()
                    .unwrap_or_else(|| styles.sparkling_style.clone())
            }
            _ => styles.sparkling_style.clone(),
        };
        return alias_or_self(naming, &picked, "alias-spark");
    }

    if a_strong && b_strong {
        let forward = format!("{}+{}", a, b);
        let backward = format!("{}+{}", b, a);
        let combo = [forward, backward]
            .into_iter()
            .find_map(|key| styles.combos.get(&key).filter(|l| !l.is_empty()).map(|l| (key, l)));
        if let Some((key, pool)) = combo {
            if let Some(picked) = weighted_style(naming, pool, &format!("combo-{}", key)) {
                return alias_or_self(naming, picked, &format!("alias-{}", key));
            }
        }
    }

    if let Some(picked) = styles
        .singles
        .get(a.as_str())
        .and_then(|pool| weighted_style(naming, pool, &format!("single-{}", a)))
    {
        return alias_or_self(naming, picked, &format!("alias-{}", a));
    }

    BALANCED_STYLE.to_string()
}

/// Style label for the creative engine
///
/// Sparkling with sour ≥ 0.4 always reads as the sparkling style.
pub fn choose_style_relaxed(naming: &NamingRules, palate: &FlavorVector, has_sparkling: bool) -> String {
    let styles = &naming.taste_styles;
    if has_sparkling && palate.sour >= 0.4 {
        return styles.sparkling_style.clone();
    }

    let th = naming.thresholds.high;
    let (a, b) = top_two_dims(palate);
    let (va, vb) = (palate.get(a), palate.get(b));

    if va >= th && vb >= th - 0.1 {
        let key = format!("{}+{}", a, b);
        if let Some(picked) = styles
            .combos
            .get(&key)
            .and_then(|pool| seeded_pick(pool, &format!("{}|{}|{}", key, va, vb)))
        {
            return picked.clone();
        }
    }

    styles
        .singles
        .get(a.as_str())
        .and_then(|pool| seeded_pick(pool, &format!("{}|{}", a, va)))
        .cloned()
        .unwrap_or_else(|| BALANCED_STYLE.to_string())
}
