//! Catalog lookup indexes

use super::model::{Category, Ingredient, MoodProfile};
use super::normalize::{normalize_ingredients, normalize_moods, parse_document, with_fallback_moods};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Immutable ingredient and mood catalog with lookup indexes
///
/// Built once and shared read-only by every generation call. When two
/// records collide on an id or lower-cased name, the later one wins the
/// index slot; both stay in the ordered list.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    ingredients: Vec<Ingredient>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_category: HashMap<Category, Vec<usize>>,
    moods: Vec<MoodProfile>,
    mood_by_key: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Build indexes over normalized records
    ///
    /// The fallback moods are appended here when their keys are missing.
    pub fn new(ingredients: Vec<Ingredient>, moods: Vec<MoodProfile>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();

        for (i, ing) in ingredients.iter().enumerate() {
            if let Some(id) = &ing.id {
                by_id.insert(id.clone(), i);
            }
            by_name.insert(ing.name.to_lowercase(), i);
            by_category.entry(ing.category.clone()).or_default().push(i);
        }

        let moods = with_fallback_moods(moods);
        let mood_by_key = moods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.key.clone(), i))
            .collect();

        Self {
            ingredients,
            by_id,
            by_name,
            by_category,
            moods,
            mood_by_key,
        }
    }

    /// Build from raw catalog documents
    pub fn from_documents(ingredients: &Value, moods: &Value) -> Self {
        let index = Self::new(normalize_ingredients(ingredients), normalize_moods(moods));
        info!(
            "Catalog loaded: {} ingredients, {} moods",
            index.ingredients.len(),
            index.moods.len()
        );
        index
    }

    /// Build from raw JSON text; malformed text yields an empty catalog
    pub fn from_json_str(ingredients: &str, moods: &str) -> Self {
        Self::from_documents(
            &parse_document("ingredient", ingredients),
            &parse_document("mood", moods),
        )
    }

    /// All ingredients in catalog order
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn ingredient_by_id(&self, id: &str) -> Option<&Ingredient> {
        self.by_id.get(id).map(|&i| &self.ingredients[i])
    }

    /// Case-insensitive lookup by display name
    pub fn ingredient_by_name(&self, name: &str) -> Option<&Ingredient> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.ingredients[i])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ingredients of one category in catalog order
    pub fn category(&self, category: &Category) -> Vec<&Ingredient> {
        self.by_category
            .get(category)
            .map(|idxs| idxs.iter().map(|&i| &self.ingredients[i]).collect())
            .unwrap_or_default()
    }

    /// First non-empty category among `categories`
    pub fn first_category(&self, categories: &[Category]) -> Option<Vec<&Ingredient>> {
        categories
            .iter()
            .map(|c| self.category(c))
            .find(|pool| !pool.is_empty())
    }

    /// Mood list including appended fallback moods, in catalog order
    pub fn moods(&self) -> &[MoodProfile] {
        &self.moods
    }

    pub fn mood(&self, key: &str) -> Option<&MoodProfile> {
        self.mood_by_key.get(key).map(|&i| &self.moods[i])
    }
}
