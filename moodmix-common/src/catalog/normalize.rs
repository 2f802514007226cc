//! Raw record normalization
//!
//! Catalog files in the wild disagree on field names (`id`/`key`,
//! `name`/`displayName`, `flavors`/`flavorVector`, `spice`/`spicy`) and on the
//! ABV scale (fraction or percent). Everything funnels through here into the
//! canonical [`Ingredient`] and [`MoodProfile`] shapes. Nothing in this module
//! fails: unusable fields fall back to empty/zero.

use super::model::{AbvPreference, Category, Ingredient, MoodProfile};
use crate::flavor::{FlavorKey, PartialFlavor};
use serde_json::{json, Map, Value};
use tracing::warn;

fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_nonempty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a free-form identifier: lower-case, whitespace runs become `_`
pub fn to_id(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// Map a raw flavor object onto the fixed dimensions
///
/// `spice` is read as `spicy`; when both are present `spicy` wins.
/// Unknown keys are ignored.
pub fn remap_flavor_keys(src: &Value) -> PartialFlavor {
    let mut out = PartialFlavor::new();
    let Some(obj) = src.as_object() else {
        return out;
    };

    for key in [
        FlavorKey::Sweet,
        FlavorKey::Sour,
        FlavorKey::Bitter,
        FlavorKey::Fruit,
        FlavorKey::Aroma,
        FlavorKey::Body,
    ] {
        if let Some(v) = as_number(obj.get(key.as_str())) {
            out.insert(key, v);
        }
    }
    for alias in ["spice", "spicy"] {
        if let Some(v) = as_number(obj.get(alias)) {
            out.insert(FlavorKey::Spicy, v);
        }
    }
    out
}

/// Normalize an ABV figure to percent
///
/// Values above 1 are already percent; anything else is a fraction and is
/// scaled by 100 and rounded.
pub fn normalize_abv(raw: f64) -> f64 {
    if raw > 1.0 {
        raw
    } else {
        (raw * 100.0).round()
    }
}

/// Normalize one raw ingredient record
pub fn normalize_ingredient(raw: &Value) -> Ingredient {
    let id = as_nonempty_str(raw.get("id")).map(str::to_string);
    let name = as_nonempty_str(raw.get("name"))
        .map(str::to_string)
        .or_else(|| id.clone())
        .unwrap_or_default();
    let category = as_nonempty_str(raw.get("category"))
        .map(Category::parse)
        .unwrap_or(Category::Unknown);
    // Only genuine numbers count as an ABV figure
    let abv = raw
        .get("abv")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(normalize_abv);
    let allergens = string_list(raw.get("allergens"))
        .into_iter()
        .map(|a| a.to_lowercase())
        .collect();
    let flavors = raw
        .get("flavors")
        .filter(|v| v.is_object())
        .or_else(|| raw.get("flavorVector"))
        .map(remap_flavor_keys)
        .unwrap_or_default();

    Ingredient {
        id,
        name,
        category,
        abv,
        allergens,
        flavors,
    }
}

fn normalize_abv_preference(raw: Option<&Value>) -> Option<AbvPreference> {
    let obj = raw?.as_object()?;
    let target = as_number(obj.get("target"))?;
    let range = match obj.get("range") {
        Some(Value::Array(bounds)) if bounds.len() == 2 => {
            (as_number(bounds.first())?, as_number(bounds.get(1))?)
        }
        _ => (target, target),
    };
    Some(AbvPreference { target, range })
}

/// Normalize one raw mood record
pub fn normalize_mood(raw: &Value) -> MoodProfile {
    let id = as_nonempty_str(raw.get("id"));
    let key = as_nonempty_str(raw.get("key"))
        .or(id)
        .unwrap_or_default()
        .to_string();
    let display_name = as_nonempty_str(raw.get("displayName"))
        .or_else(|| as_nonempty_str(raw.get("name")))
        .or(id)
        .map(str::to_string)
        .unwrap_or_else(|| key.clone());

    // methodBias may be a list or a weight map; a map contributes its keys
    let method_bias = match raw.get("methodBias") {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        other => string_list(other),
    };

    MoodProfile {
        key,
        display_name,
        target_flavor_bias: raw
            .get("targetFlavorBias")
            .map(remap_flavor_keys)
            .unwrap_or_default(),
        method_bias,
        glass_candidates: string_list(raw.get("glassCandidates")),
        base_candidates: string_list(raw.get("baseCandidates")),
        template_candidates: string_list(raw.get("templateCandidates")),
        abv_preference: normalize_abv_preference(raw.get("abvPreference")),
        naming_hints: string_list(raw.get("namingHints")),
    }
}

/// Locate the record list inside a catalog document
///
/// Accepts a bare array or an object holding the list under one of
/// `wrapper_keys`.
fn records<'a>(doc: &'a Value, wrapper_keys: &[&str]) -> &'a [Value] {
    match doc {
        Value::Array(items) => items,
        Value::Object(obj) => wrapper_keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Normalize every ingredient record in a catalog document
pub fn normalize_ingredients(doc: &Value) -> Vec<Ingredient> {
    records(doc, &["ingredients"])
        .iter()
        .filter(|r| {
            let ok = r.is_object();
            if !ok {
                warn!("Skipping non-object ingredient record: {}", r);
            }
            ok
        })
        .map(normalize_ingredient)
        .collect()
}

/// Normalize every mood record in a catalog document
///
/// Records that yield no key are dropped. Fallback moods are not appended
/// here; see [`with_fallback_moods`].
pub fn normalize_moods(doc: &Value) -> Vec<MoodProfile> {
    records(doc, &["moods", "profiles"])
        .iter()
        .map(normalize_mood)
        .filter(|m| {
            if m.key.is_empty() {
                warn!("Skipping mood record without key or id");
                return false;
            }
            true
        })
        .collect()
}

fn fallback_mood_records() -> [Value; 2] {
    [
        json!({
            "id": "angry",
            "name": "生气",
            "targetFlavorBias": { "sweet": 0.2, "sour": 0.4, "bitter": 0.5, "aroma": 0.3, "fruit": 0.2, "spice": 0.6, "body": 0.6 },
            "methodBias": ["stir", "build"],
            "glassCandidates": ["rocks"],
            "baseCandidates": ["Whiskey", "Rum"],
            "templateCandidates": ["OldFashioned", "Highball"],
            "abvPreference": { "target": 16, "range": [12, 22] },
            "namingHints": ["火焰", "烈"]
        }),
        json!({
            "id": "excited",
            "name": "兴奋",
            "targetFlavorBias": { "sweet": 0.55, "sour": 0.6, "bitter": 0.2, "aroma": 0.5, "fruit": 0.7, "spice": 0.3, "body": 0.45 },
            "methodBias": ["shake"],
            "glassCandidates": ["highball", "collins", "coupe"],
            "baseCandidates": ["Vodka", "Gin", "Rum"],
            "templateCandidates": ["Highball", "Collins", "Sour"],
            "abvPreference": { "target": 12, "range": [8, 16] },
            "namingHints": ["火花", "跃动"]
        }),
    ]
}

/// The two built-in fallback moods, normalized
pub fn fallback_moods() -> Vec<MoodProfile> {
    fallback_mood_records().iter().map(normalize_mood).collect()
}

/// Append each built-in fallback mood whose key the catalog lacks
pub fn with_fallback_moods(mut moods: Vec<MoodProfile>) -> Vec<MoodProfile> {
    for extra in fallback_moods() {
        if !moods.iter().any(|m| m.key == extra.key) {
            moods.push(extra);
        }
    }
    moods
}

/// Parse a catalog document, degrading to an empty document on bad JSON
pub fn parse_document(label: &str, text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Malformed {} catalog ({}), using empty catalog", label, e);
            Value::Object(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("Lime  Juice"), "lime_juice");
        assert_eq!(to_id("Highball"), "highball");
    }

    #[test]
    fn test_abv_fraction_is_upconverted() {
        let ing = normalize_ingredient(&json!({
            "name": "Test Spirit", "category": "spirit", "abv": 0.4, "flavors": { "body": 0.5 }
        }));
        assert_eq!(ing.abv, Some(40.0));
        assert_eq!(ing.category, Category::Spirit);
    }

    #[test]
    fn test_abv_percent_kept() {
        let ing = normalize_ingredient(&json!({ "name": "Vodka", "category": "spirit", "abv": 40 }));
        assert_eq!(ing.abv, Some(40.0));
    }

    #[test]
    fn test_abv_string_is_not_a_figure() {
        let ing = normalize_ingredient(&json!({ "name": "X", "abv": "40" }));
        assert_eq!(ing.abv, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let ing = normalize_ingredient(&json!({ "id": "mystery" }));
        assert_eq!(ing.name, "mystery");
        assert_eq!(ing.category, Category::Unknown);
        assert!(ing.allergens.is_empty());
        assert!(ing.flavors.is_empty());
    }

    #[test]
    fn test_flavor_vector_alias_and_spice() {
        let ing = normalize_ingredient(&json!({
            "name": "Ginger", "flavorVector": { "spice": 0.7, "sweet": "0.2" }
        }));
        assert_eq!(ing.flavors.get(FlavorKey::Spicy), 0.7);
        assert_eq!(ing.flavors.get(FlavorKey::Sweet), 0.2);
    }

    #[test]
    fn test_spicy_overrides_spice() {
        let f = remap_flavor_keys(&json!({ "spice": 0.1, "spicy": 0.9 }));
        assert_eq!(f.get(FlavorKey::Spicy), 0.9);
    }

    #[test]
    fn test_mood_id_and_name_mapping() {
        let m1 = normalize_mood(&json!({ "id": "happy", "targetFlavorBias": { "sweet": 0.6 } }));
        assert_eq!(m1.key, "happy");
        assert_eq!(m1.display_name, "happy");

        let m2 = normalize_mood(&json!({ "key": "calm", "name": "宁静" }));
        assert_eq!(m2.key, "calm");
        assert_eq!(m2.display_name, "宁静");
    }

    #[test]
    fn test_method_bias_object_contributes_keys() {
        let m = normalize_mood(&json!({ "key": "k", "methodBias": { "shake": 0.7, "stir": 0.3 } }));
        assert_eq!(m.method_bias.len(), 2);
        assert!(m.method_bias.contains(&"shake".to_string()));
    }

    #[test]
    fn test_fallback_moods_appended_once() {
        let existing = normalize_moods(&json!({ "moods": [{ "key": "angry", "name": "怒" }] }));
        let all = with_fallback_moods(existing);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].display_name, "怒");
        assert_eq!(all[1].key, "excited");
        assert_eq!(all[1].abv_preference.map(|p| p.range), Some((8.0, 16.0)));
    }

    #[test]
    fn test_records_accepts_wrappers_and_arrays() {
        assert_eq!(normalize_moods(&json!({ "profiles": [{ "id": "a" }] })).len(), 1);
        assert_eq!(normalize_ingredients(&json!([{ "id": "a" }, 3])).len(), 1);
        assert!(normalize_ingredients(&json!("nonsense")).is_empty());
    }
}
