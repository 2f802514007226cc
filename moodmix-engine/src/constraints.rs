//! User constraints: NA mode, allergies, inventory preference
//!
//! Also home to the sparkling-ingredient tests shared by the engines.

use moodmix_common::catalog::normalize::to_id;
use moodmix_common::{CatalogIndex, Ingredient, MoodProfile};
use std::collections::HashSet;

/// Legacy English inventory names and their catalog ids
const INVENTORY_NAME_MAP: [(&str, &str); 9] = [
    ("vodka", "vodka"),
    ("gin", "gin"),
    ("rum", "white_rum"),
    ("tequila", "tequila_blanco"),
    ("whiskey", "bourbon"),
    ("lime juice", "lime_juice"),
    ("lemon juice", "lemon_juice"),
    ("simple syrup", "simple_syrup"),
    ("soda water", "soda_water"),
];

/// Normalize one inventory item to a catalog id
///
/// Tries the raw id, the lower-cased id, the legacy name map, then falls back
/// to [`to_id`].
pub fn normalize_inventory_id(catalog: &CatalogIndex, item: &str) -> String {
    let raw = item.trim();
    if catalog.contains_id(raw) {
        return raw.to_string();
    }
    let lower = raw.to_lowercase();
    if catalog.contains_id(&lower) {
        return lower;
    }
    if let Some((_, id)) = INVENTORY_NAME_MAP.iter().find(|(name, _)| *name == lower) {
        return id.to_string();
    }
    to_id(&lower)
}

/// Normalize a list of inventory items, dropping blanks
pub fn normalize_inventory_ids(catalog: &CatalogIndex, items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|i| !i.trim().is_empty())
        .map(|i| normalize_inventory_id(catalog, i))
        .collect()
}

/// Normalized inventory ids
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    ids: HashSet<String>,
}

impl Inventory {
    pub fn new(catalog: &CatalogIndex, items: &[String]) -> Self {
        Self {
            ids: normalize_inventory_ids(catalog, items).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn holds(&self, ing: &Ingredient) -> bool {
        ing.id.as_ref().is_some_and(|id| self.ids.contains(id))
    }

    /// Stable partition: held ingredients first, each group keeps its order
    pub fn reorder<'a>(&self, pool: Vec<&'a Ingredient>) -> Vec<&'a Ingredient> {
        if self.ids.is_empty() {
            return pool;
        }
        let (held, rest): (Vec<_>, Vec<_>) = pool.into_iter().partition(|i| self.holds(i));
        held.into_iter().chain(rest).collect()
    }
}

/// NA and allergy filter
#[derive(Debug, Clone, Default)]
pub struct ConstraintFilter {
    pub na: bool,
    /// Lower-cased allergen tags
    pub allergies: Vec<String>,
}

impl ConstraintFilter {
    pub fn new(na: bool, allergies: Vec<String>) -> Self {
        Self { na, allergies }
    }

    pub fn allows(&self, ing: &Ingredient) -> bool {
        if self.na && ing.is_alcoholic() {
            return false;
        }
        !ing.has_allergen_in(&self.allergies)
    }

    pub fn apply<'a>(&self, pool: Vec<&'a Ingredient>) -> Vec<&'a Ingredient> {
        pool.into_iter().filter(|i| self.allows(i)).collect()
    }
}

const SPARKLING_NAME_PATTERNS: [&str; 8] =
    ["soda", "tonic", "ginger", "sparkling", "cola", "club", "ale", "beer"];

/// Carbonated by category (soft/mixer) or by name
pub fn is_sparkling(ing: &Ingredient) -> bool {
    if ing.category.is_soft_or_mixer() {
        return true;
    }
    let name = ing.name.to_lowercase();
    SPARKLING_NAME_PATTERNS.iter().any(|p| name.contains(p))
}

const SPARKLING_TEMPLATES: [&str; 3] = ["highball", "collins", "flute"];

/// Whether a sparkling top-up may be added for this mood
///
/// Never for `angry`. Otherwise allowed when the chosen template, or any of
/// the mood's template candidates, is a highball, collins or flute.
pub fn mood_allows_sparkling_fallback(mood: &MoodProfile, template: Option<&str>) -> bool {
    if mood.key == "angry" {
        return false;
    }
    let is_sparkling_template = |t: &str| SPARKLING_TEMPLATES.contains(&to_id(t).as_str());
    template.is_some_and(is_sparkling_template)
        || mood.template_candidates.iter().any(|t| is_sparkling_template(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodmix_common::catalog::normalize::{fallback_moods, normalize_ingredient};
    use serde_json::json;

    fn catalog() -> CatalogIndex {
        let ingredients = vec![
            normalize_ingredient(&json!({ "id": "white_rum", "name": "White Rum", "category": "base", "abv": 40 })),
            normalize_ingredient(&json!({ "id": "Orgeat", "name": "Orgeat", "category": "syrup", "allergens": ["Nuts"] })),
            normalize_ingredient(&json!({ "id": "soda_water", "name": "苏打水", "category": "mixer", "abv": 0 })),
        ];
        CatalogIndex::new(ingredients, vec![])
    }

    #[test]
    fn test_inventory_normalization_rungs() {
        let c = catalog();
        assert_eq!(normalize_inventory_id(&c, "Orgeat"), "Orgeat");
        assert_eq!(normalize_inventory_id(&c, "WHITE_RUM"), "white_rum");
        assert_eq!(normalize_inventory_id(&c, "rum"), "white_rum");
        assert_eq!(normalize_inventory_id(&c, "Lime Juice"), "lime_juice");
        assert_eq!(normalize_inventory_id(&c, "Blood  Orange"), "blood_orange");
    }

    #[test]
    fn test_inventory_reorder_is_stable() {
        let c = catalog();
        let inv = Inventory::new(&c, &["soda water".to_string()]);
        let pool: Vec<&Ingredient> = c.ingredients().iter().collect();
        let ordered = inv.reorder(pool);
        let names: Vec<&str> = ordered.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["苏打水", "White Rum", "Orgeat"]);
    }

    #[test]
    fn test_filter() {
        let c = catalog();
        let filter = ConstraintFilter::new(true, vec!["nuts".to_string()]);
        let kept = filter.apply(c.ingredients().iter().collect());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "苏打水");
    }

    #[test]
    fn test_sparkling_detection() {
        let c = catalog();
        assert!(is_sparkling(&c.ingredients()[2]));
        assert!(!is_sparkling(&c.ingredients()[0]));
    }

    #[test]
    fn test_angry_never_gets_sparkling_fallback() {
        let moods = fallback_moods();
        let angry = moods.iter().find(|m| m.key == "angry").unwrap();
        let excited = moods.iter().find(|m| m.key == "excited").unwrap();
        assert!(!mood_allows_sparkling_fallback(angry, Some("highball")));
        assert!(mood_allows_sparkling_fallback(excited, None));
        assert!(mood_allows_sparkling_fallback(excited, Some("sour")));
    }
}
