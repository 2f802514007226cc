//! Recipe value types

use crate::flavor::FlavorVector;
use crate::units::{format_amount, Unit};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Preparation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Shake,
    Stir,
    Build,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Shake, Method::Stir, Method::Build];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "shake" => Some(Method::Shake),
            "stir" => Some(Method::Stir),
            "build" => Some(Method::Build),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Shake => "shake",
            Method::Stir => "stir",
            Method::Build => "build",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub name: String,
    pub amount_ml: f64,
    /// Percent; `None` when unknown (display-only lines)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
}

/// Generated recipe
///
/// Each generation call returns an independently owned value. Only
/// finalization mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub story: String,
    /// Mood key
    pub mood: String,
    /// Template id
    pub template: String,
    pub method: Method,
    pub glass: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice: Option<String>,
    #[serde(default)]
    pub garnish: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Rounded sum of ingredient amounts
    pub total_ml: f64,
    #[serde(default)]
    pub unit: Unit,
    /// Percent, 0–100
    #[serde(rename = "estimatedABV")]
    pub estimated_abv: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_calories: Option<u32>,
    pub flavor: FlavorVector,
}

impl Recipe {
    /// Rounded sum of ingredient amounts, negatives counted as 0
    pub fn sum_amounts(&self) -> f64 {
        self.ingredients
            .iter()
            .map(|i| i.amount_ml.max(0.0))
            .sum::<f64>()
            .round()
    }

    /// Whether the ingredient list already holds `name` (case-insensitive)
    pub fn has_ingredient_named(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.ingredients
            .iter()
            .any(|i| i.name.to_lowercase() == needle)
    }

    /// Same recipe rendered in another display unit
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Plain-text share card
    pub fn share_text(&self) -> String {
        let mut out = format!(
            "{}\n{}\nABV: {}%\n材料：",
            self.name, self.story, self.estimated_abv
        );
        for ing in &self.ingredients {
            out.push_str(&format!(
                "\n- {}：{}",
                ing.name,
                format_amount(self.unit, ing.amount_ml)
            ));
        }
        out
    }
}

/// One line of a corpus recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusIngredient {
    pub name: String,
    #[serde(default)]
    pub amount_ml: f64,
}

/// Read-only reference recipe from the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecipe {
    pub id: String,
    pub name: String,
    /// Free text; parsed into [`Method`] when adapted
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub glass: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<CorpusIngredient>,
    #[serde(default)]
    pub garnish: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusDocument {
    Wrapped { recipes: Vec<Value> },
    Bare(Vec<Value>),
}

/// Parse a recipe corpus document (`{"recipes": [...]}` or a bare list)
///
/// Malformed documents and records are skipped with a warning.
pub fn parse_corpus(text: &str) -> Vec<CorpusRecipe> {
    let records = match serde_json::from_str::<CorpusDocument>(text) {
        Ok(CorpusDocument::Wrapped { recipes }) | Ok(CorpusDocument::Bare(recipes)) => recipes,
        Err(e) => {
            warn!("Malformed recipe corpus ({}), using empty corpus", e);
            return Vec::new();
        }
    };
    records
        .into_iter()
        .filter_map(|r| match serde_json::from_value::<CorpusRecipe>(r) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                warn!("Skipping corpus record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            name: "晨曦·柑橘清新".to_string(),
            story: "灵感来袭。".to_string(),
            mood: "happy".to_string(),
            template: "sour".to_string(),
            method: Method::Shake,
            glass: "coupe".to_string(),
            ice: None,
            garnish: vec![],
            ingredients: vec![
                RecipeIngredient { name: "金酒".to_string(), amount_ml: 45.0, abv: Some(40.0) },
                RecipeIngredient { name: "青柠汁".to_string(), amount_ml: 20.4, abv: Some(0.0) },
            ],
            total_ml: 65.0,
            unit: Unit::Ml,
            estimated_abv: 23,
            estimated_calories: Some(39),
            flavor: FlavorVector::default(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(recipe()).unwrap();
        assert_eq!(json["estimatedABV"], 23);
        assert_eq!(json["totalMl"], 65.0);
        assert_eq!(json["method"], "shake");
        assert_eq!(json["ingredients"][0]["amountMl"], 45.0);
        assert!(json.get("ice").is_none());
    }

    #[test]
    fn test_share_text_uses_unit() {
        let text = recipe().with_unit(Unit::Oz).share_text();
        assert!(text.starts_with("晨曦·柑橘清新\n灵感来袭。\nABV: 23%\n材料："));
        assert!(text.contains("- 金酒：1.52 oz"));
    }

    #[test]
    fn test_sum_and_lookup() {
        let r = recipe();
        assert_eq!(r.sum_amounts(), 65.0);
        assert!(r.has_ingredient_named("金酒"));
        assert!(!r.has_ingredient_named("苏打水"));
    }

    #[test]
    fn test_parse_corpus_shapes() {
        let wrapped = r#"{"recipes":[{"id":"a","name":"A","method":"shake","ingredients":[{"name":"x","amountMl":10}]}, {"name":"no id"}]}"#;
        let parsed = parse_corpus(wrapped);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].ingredients[0].amount_ml, 10.0);

        assert_eq!(parse_corpus(r#"[{"id":"b","name":"B"}]"#).len(), 1);
        assert!(parse_corpus("nope").is_empty());
    }
}
