//! Semantic tags, tag-driven garnish and pairing harmony

use crate::constraints::ConstraintFilter;
use moodmix_common::rules::{PairingScores, SemanticTags};
use moodmix_common::{CatalogIndex, Category, Ingredient};

pub const SPARKLING_TAG: &str = "sparkling";
pub const CITRUS_TAG: &str = "citrus";

/// Most garnish items picked from tags
pub const MAX_GARNISH: usize = 2;

/// Tags of an ingredient: name-pattern tags first, then category tags
///
/// Name patterns match case-insensitively. Duplicates are removed, first
/// occurrence kept.
pub fn tags_of(tables: &SemanticTags, ing: &Ingredient) -> Vec<String> {
    let name = ing.name.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for (tag, patterns) in &tables.patterns {
        if patterns
            .iter()
            .any(|p| !p.is_empty() && name.contains(&p.to_lowercase()))
        {
            out.push(tag.clone());
        }
    }
    if let Some(extra) = tables.by_category.get(ing.category.as_str()) {
        out.extend(extra.iter().cloned());
    }
    let mut seen = std::collections::HashSet::new();
    out.retain(|t| seen.insert(t.clone()));
    out
}

pub fn has_tag(tables: &SemanticTags, ing: &Ingredient, tag: &str) -> bool {
    tags_of(tables, ing).iter().any(|t| t == tag)
}

/// Desired-tag match score; `sparkling` and `citrus` count double
pub fn tag_match_score(tables: &SemanticTags, ing: &Ingredient, desired: &[String]) -> u32 {
    if desired.is_empty() {
        return 0;
    }
    tags_of(tables, ing)
        .iter()
        .filter(|t| desired.contains(t))
        .map(|t| if t == SPARKLING_TAG || t == CITRUS_TAG { 2 } else { 1 })
        .sum()
}

fn label_matches(ing: &Ingredient, needles: &[&str]) -> bool {
    let label = ing.id_or_name().to_lowercase();
    needles.iter().any(|n| label.contains(n))
}

/// Pick up to [`MAX_GARNISH`] garnish names for a set of tag hints
///
/// | Hint | Source | Matches |
/// |------|--------|---------|
/// | citrus | garnish | lemon, lime, orange |
/// | floral, herbal | herb | mint, basil, rosemary |
/// | bitters | garnish | orange_peel, lemon_peel |
/// | sparkling | garnish | lemon, lime |
///
/// Items the filter rejects are skipped.
pub fn garnish_from_hints(catalog: &CatalogIndex, filter: &ConstraintFilter, hints: &[String]) -> Vec<String> {
    let garnishes: Vec<&Ingredient> = filter.apply(catalog.category(&Category::Garnish));
    let herbs: Vec<&Ingredient> = filter.apply(catalog.category(&Category::Herb));
    let has = |tag: &str| hints.iter().any(|h| h == tag);
    let find = |pool: &[&Ingredient], needles: &[&str]| {
        pool.iter()
            .find(|i| label_matches(i, needles))
            .map(|i| i.name.clone())
    };

    let mut out: Vec<String> = Vec::new();
    if has(CITRUS_TAG) {
        out.extend(find(&garnishes, &["lemon", "lime", "orange"]));
    }
    if has("floral") || has("herbal") {
        out.extend(find(&herbs, &["mint", "basil", "rosemary"]));
    }
    if has("bitters") {
        out.extend(find(&garnishes, &["orange_peel", "lemon_peel"]));
    }
    if has(SPARKLING_TAG) {
        out.extend(find(&garnishes, &["lemon", "lime"]));
    }
    let mut seen = std::collections::HashSet::new();
    out.retain(|g| seen.insert(g.clone()));
    out.truncate(MAX_GARNISH);
    out
}

fn pair_value(table: &std::collections::BTreeMap<String, f64>, a: &str, b: &str) -> f64 {
    table
        .get(&format!("{}+{}", a, b))
        .or_else(|| table.get(&format!("{}+{}", b, a)))
        .copied()
        .unwrap_or(0.0)
}

/// Pairing score of two ingredients over every tag pair
///
/// Negative-table entries are expected to carry negative values.
pub fn pairing_score(tables: &SemanticTags, scores: &PairingScores, a: &Ingredient, b: &Ingredient) -> f64 {
    let tags_a = tags_of(tables, a);
    let tags_b = tags_of(tables, b);
    let mut score = 0.0;
    for ta in &tags_a {
        for tb in &tags_b {
            score += pair_value(&scores.positive, ta, tb);
            score += pair_value(&scores.negative, ta, tb);
        }
    }
    score
}

/// Sum of pairing scores over every unordered pair of a selection
pub fn harmony(tables: &SemanticTags, scores: &PairingScores, selected: &[&Ingredient]) -> f64 {
    let mut total = 0.0;
    for (i, a) in selected.iter().enumerate() {
        for b in &selected[i + 1..] {
            total += pairing_score(tables, scores, a, b);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use moodmix_common::catalog::normalize::normalize_ingredient;
    use serde_json::json;

    fn tables() -> SemanticTags {
        serde_json::from_value(json!({
            "patterns": { "citrus": ["lime", "柠檬"], "sparkling": ["soda", "苏打"] },
            "by_category": { "mixer": ["sparkling"], "base": ["spirit"] }
        }))
        .unwrap()
    }

    fn ing(v: serde_json::Value) -> Ingredient {
        normalize_ingredient(&v)
    }

    #[test]
    fn test_tags_dedup() {
        let soda = ing(json!({ "id": "soda_water", "name": "苏打水", "category": "mixer" }));
        assert_eq!(tags_of(&tables(), &soda), vec!["sparkling".to_string()]);

        let lime = ing(json!({ "id": "lime_juice", "name": "Lime Juice", "category": "juice" }));
        assert_eq!(tags_of(&tables(), &lime), vec!["citrus".to_string()]);
        assert!(has_tag(&tables(), &lime, CITRUS_TAG));
    }

    #[test]
    fn test_match_score_weights() {
        let soda = ing(json!({ "name": "Lime Soda", "category": "mixer" }));
        let desired = vec!["citrus".to_string(), "sparkling".to_string()];
        assert_eq!(tag_match_score(&tables(), &soda, &desired), 4);

        let gin = ing(json!({ "name": "Gin", "category": "base" }));
        assert_eq!(tag_match_score(&tables(), &gin, &["spirit".to_string()]), 1);
        assert_eq!(tag_match_score(&tables(), &gin, &[]), 0);
    }

    #[test]
    fn test_garnish_from_hints() {
        let catalog = CatalogIndex::new(
            vec![
                ing(json!({ "id": "orange_peel", "name": "橙皮", "category": "garnish" })),
                ing(json!({ "id": "lime_wedge", "name": "青柠角", "category": "garnish" })),
                ing(json!({ "id": "mint", "name": "薄荷", "category": "herb", "allergens": ["mint"] })),
            ],
            vec![],
        );
        let hints: Vec<String> = ["citrus", "herbal", "sparkling"].iter().map(|s| s.to_string()).collect();
        let picked = garnish_from_hints(&catalog, &ConstraintFilter::default(), &hints);
        // citrus takes the first match, sparkling repeats a lime item
        assert_eq!(picked, vec!["橙皮".to_string(), "薄荷".to_string()]);

        let no_mint = ConstraintFilter::new(false, vec!["mint".to_string()]);
        let picked = garnish_from_hints(&catalog, &no_mint, &hints);
        assert_eq!(picked, vec!["橙皮".to_string(), "青柠角".to_string()]);
    }

    #[test]
    fn test_pairing_and_harmony() {
        let scores: PairingScores = serde_json::from_value(json!({
            "positive": { "spirit+citrus": 0.5 },
            "negative": { "sparkling+spirit": -0.2 }
        }))
        .unwrap();
        let gin = ing(json!({ "name": "Gin", "category": "base" }));
        let lime = ing(json!({ "name": "Lime", "category": "juice" }));
        let soda = ing(json!({ "name": "Soda", "category": "mixer" }));
        assert_relative_eq!(pairing_score(&tables(), &scores, &lime, &gin), 0.5);
        assert_relative_eq!(harmony(&tables(), &scores, &[&gin, &lime, &soda]), 0.3);
    }
}
