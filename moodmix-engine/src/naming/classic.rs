//! Classic-engine names
//!
//! With a `naming_v2` table the name is procedurally assembled from a
//! weighted prefix, a taste style and optional hints. Without one, a
//! simplified `left·style` form is used.

use super::assemble::{assemble_name, NameParts};
use super::seed::{seeded_pick, seeded_pick_weighted};
use super::style::{choose_style_weighted, top_two_dims};
use moodmix_common::flavor::{FlavorKey, FlavorVector};
use moodmix_common::rules::{LegacyNaming, NamingRules, BARE_NAME_TEMPLATE};
use moodmix_common::{Ingredient, Method, MoodProfile};

/// Generation facts the classic name depends on
#[derive(Debug, Clone)]
pub struct ClassicNameInput<'a> {
    pub mood: &'a MoodProfile,
    pub flavor: &'a FlavorVector,
    pub has_sparkling: bool,
    pub na: bool,
    pub method: Method,
    /// Base-spirit key such as `gin` or `whiskey`
    pub base_spirit: Option<&'a str>,
    pub variability: f64,
    pub seed_salt: &'a str,
}

const QUANTIZE_ORDER: [FlavorKey; 7] = [
    FlavorKey::Sweet,
    FlavorKey::Sour,
    FlavorKey::Bitter,
    FlavorKey::Fruit,
    FlavorKey::Aroma,
    FlavorKey::Spicy,
    FlavorKey::Body,
];

/// Quantize a flavor into a short signature, e.g. `1-2-0-3-1-0-2`
///
/// Each dimension maps to `min(3, floor(v * 4))`.
pub fn quantize_flavor(flavor: &FlavorVector) -> String {
    QUANTIZE_ORDER
        .iter()
        .map(|k| ((flavor.get(*k) * 4.0).floor().clamp(0.0, 3.0) as u8).to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Map an ingredient label onto a base-spirit key
fn spirit_key_of(label: &str) -> Option<&'static str> {
    let s = label.to_lowercase();
    // "ginger" is not gin
    if s.replace("ginger", "").contains("gin") {
        Some("gin")
    } else if s.contains("scotch") {
        Some("scotch")
    } else if s.contains("whisky") || s.contains("whiskey") || s.contains("bourbon") {
        Some("whiskey")
    } else if s.contains("rum") {
        Some("rum")
    } else if s.contains("vodka") {
        Some("vodka")
    } else if s.contains("tequila") || s.contains("mezcal") {
        Some("tequila")
    } else if s.contains("brandy") || s.contains("cognac") {
        Some("brandy")
    } else {
        None
    }
}

/// Detect the base spirit from the base id, then each ingredient's id, name
/// and category
pub fn detect_base_spirit(base_id: Option<&str>, selected: &[&Ingredient]) -> Option<&'static str> {
    if let Some(key) = base_id.and_then(spirit_key_of) {
        return Some(key);
    }
    selected.iter().find_map(|ing| {
        ing.id
            .as_deref()
            .and_then(spirit_key_of)
            .or_else(|| spirit_key_of(&ing.name))
            .or_else(|| spirit_key_of(ing.category.as_str()))
    })
}

fn contains_any(s: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| !t.is_empty() && s.contains(t.as_str()))
}

/// Procedurally assembled name from a `naming_v2` table
pub fn generate_name(naming: &NamingRules, input: &ClassicNameInput<'_>) -> String {
    let mood = input.mood;
    let seed = format!(
        "{}|{}|{}|{}|{}|{}",
        mood.key,
        quantize_flavor(input.flavor),
        if input.has_sparkling { "s" } else { "ns" },
        if input.na { "na" } else { "alc" },
        input.base_spirit.unwrap_or("unknown"),
        input.seed_salt
    );

    let style = choose_style_weighted(naming, input.flavor, input.has_sparkling);

    let prefix = seeded_pick_weighted(&naming.prefix_pool, &seed, |p| {
        if contains_any(p, &mood.naming_hints) {
            2.0
        } else {
            1.0
        }
    })
    .cloned()
    .unwrap_or_else(|| mood.display_name.clone());

    let mut spirit_hint = input
        .base_spirit
        .and_then(|s| naming.spirit_hint(s))
        .unwrap_or_default()
        .to_string();
    if input.na && contains_any(&spirit_hint, &naming.na_banned_terms) {
        spirit_hint.clear();
    }

    let connector = seeded_pick(&naming.connectors, &seed)
        .cloned()
        .unwrap_or_else(|| "·".to_string());

    let mut template = seeded_pick(&naming.templates, &seed)
        .map(String::as_str)
        .unwrap_or(BARE_NAME_TEMPLATE);
    if input.variability <= 0.3 && template.contains("{twist}") {
        template = BARE_NAME_TEMPLATE;
    }

    let mut twist = if input.variability > 0.3 {
        seeded_pick(&naming.twists, &format!("{}-tw", seed))
            .cloned()
            .unwrap_or_default()
    } else {
        String::new()
    };
    if input.na && contains_any(&twist, &naming.na_banned_terms) {
        twist.clear();
    }

    let parts = NameParts {
        tech_hint: naming.technique_hint(input.method).unwrap_or_default().to_string(),
        prefix,
        connector,
        style,
        spirit_hint,
        twist,
    };
    let name = assemble_name(naming, &parts, template, input.na);
    if name.is_empty() {
        mood.display_name.clone()
    } else {
        name
    }
}

/// Style word for the simplified form, by dominant dimension
fn simple_style(flavor: &FlavorVector, has_sparkling: bool) -> &'static str {
    if has_sparkling {
        return "清新气泡";
    }
    match top_two_dims(flavor).0 {
        FlavorKey::Sour => "酸爽提神",
        FlavorKey::Fruit => "果香明亮",
        FlavorKey::Sweet => "甜润顺口",
        FlavorKey::Aroma => "芳香层次",
        FlavorKey::Body => "醇厚稳重",
        FlavorKey::Spicy => "辛香跃动",
        FlavorKey::Bitter => "微苦平衡",
    }
}

/// Simplified `left·style` name used without a `naming_v2` table
///
/// `left` is a seeded color word, else a nature word, else the mood's display
/// name.
pub fn generate_simple_name(words: &LegacyNaming, input: &ClassicNameInput<'_>) -> String {
    let seed = format!("{}|{}|{}", input.mood.key, quantize_flavor(input.flavor), input.seed_salt);
    let left = seeded_pick(&words.colors, &seed)
        .or_else(|| seeded_pick(&words.nature, &seed))
        .cloned()
        .unwrap_or_else(|| input.mood.display_name.clone());
    format!("{}·{}", left, simple_style(input.flavor, input.has_sparkling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodmix_common::catalog::normalize::{fallback_moods, normalize_ingredient};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn excited() -> MoodProfile {
        fallback_moods().into_iter().find(|m| m.key == "excited").unwrap()
    }

    fn input<'a>(mood: &'a MoodProfile, flavor: &'a FlavorVector) -> ClassicNameInput<'a> {
        ClassicNameInput {
            mood,
            flavor,
            has_sparkling: false,
            na: false,
            method: Method::Shake,
            base_spirit: Some("gin"),
            variability: 0.0,
            seed_salt: "2024-01-01",
        }
    }

    #[test]
    fn test_quantize() {
        let flavor = FlavorVector { sweet: 1.0, sour: 0.5, bitter: 0.24, fruit: 0.3, ..Default::default() };
        assert_eq!(quantize_flavor(&flavor), "3-2-0-1-0-0-0");
    }

    #[test]
    fn test_detect_base_spirit() {
        let bourbon = normalize_ingredient(&json!({ "id": "bourbon", "name": "Bourbon", "category": "base" }));
        let lime = normalize_ingredient(&json!({ "id": "lime_juice", "name": "青柠汁", "category": "juice" }));
        assert_eq!(detect_base_spirit(Some("gin"), &[&bourbon]), Some("gin"));
        assert_eq!(detect_base_spirit(None, &[&lime, &bourbon]), Some("whiskey"));
        assert_eq!(detect_base_spirit(None, &[&lime]), None);

        let ginger = normalize_ingredient(&json!({ "id": "ginger_beer", "name": "Ginger Beer", "category": "mixer" }));
        assert_eq!(detect_base_spirit(None, &[&ginger]), None);
    }

    #[test]
    fn test_name_is_deterministic() {
        let mood = excited();
        let flavor = FlavorVector { sour: 0.7, fruit: 0.65, ..Default::default() };
        let naming = NamingRules {
            prefix_pool: vec!["晨曦".into(), "火花".into(), "海风".into()],
            ..Default::default()
        };
        let a = generate_name(&naming, &input(&mood, &flavor));
        let b = generate_name(&naming, &input(&mood, &flavor));
        assert_eq!(a, b);
        assert!(a.contains('·'));
    }

    #[test]
    fn test_low_variability_skips_twist_templates() {
        let mood = excited();
        let flavor = FlavorVector { body: 0.7, ..Default::default() };
        let naming = NamingRules {
            prefix_pool: vec!["晨曦".into()],
            twists: vec!["微醺".into()],
            templates: vec!["{prefix}{connector}{style}{twist}".into()],
            ..Default::default()
        };
        let name = generate_name(&naming, &input(&mood, &flavor));
        assert_eq!(name, "晨曦·风味平衡");
    }

    #[test]
    fn test_na_drops_banned_spirit_hint() {
        let mood = excited();
        let flavor = FlavorVector { body: 0.7, ..Default::default() };
        let mut spirit_hints = BTreeMap::new();
        spirit_hints.insert("gin".to_string(), vec!["杜松酒".to_string()]);
        let naming = NamingRules {
            prefix_pool: vec!["晨曦".into()],
            templates: vec!["{prefix}{connector}{spiritHint}{style}".into()],
            spirit_hints,
            na_banned_terms: vec!["酒".into()],
            ..Default::default()
        };
        let mut na_input = input(&mood, &flavor);
        na_input.na = true;
        let name = generate_name(&naming, &na_input);
        assert!(!name.contains('酒'));
        assert!(!generate_name(&naming, &input(&mood, &flavor)).is_empty());
    }

    #[test]
    fn test_simple_name() {
        let mood = excited();
        let flavor = FlavorVector { sour: 0.9, ..Default::default() };
        let words = LegacyNaming { colors: vec![], nature: vec!["海浪".into()] };
        assert_eq!(generate_simple_name(&words, &input(&mood, &flavor)), "海浪·酸爽提神");

        let empty = LegacyNaming::default();
        assert_eq!(generate_simple_name(&empty, &input(&mood, &flavor)), "兴奋·酸爽提神");
    }
}
