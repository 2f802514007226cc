//! Canonical catalog records

use crate::flavor::PartialFlavor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ingredient category
///
/// Catalog data is allowed to carry categories outside the known set; those
/// are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Base,
    Spirit,
    Liquor,
    Juice,
    Syrup,
    Mixer,
    Soft,
    Bitters,
    Herb,
    Garnish,
    NaBase,
    Unknown,
    Other(String),
}

impl Category {
    /// Parse a category name (case-insensitive); empty input is `Unknown`
    pub fn parse(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "base" => Category::Base,
            "spirit" => Category::Spirit,
            "liquor" => Category::Liquor,
            "juice" => Category::Juice,
            "syrup" => Category::Syrup,
            "mixer" => Category::Mixer,
            "soft" => Category::Soft,
            "bitters" => Category::Bitters,
            "herb" => Category::Herb,
            "garnish" => Category::Garnish,
            "na_base" => Category::NaBase,
            "" | "unknown" => Category::Unknown,
            _ => Category::Other(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Base => "base",
            Category::Spirit => "spirit",
            Category::Liquor => "liquor",
            Category::Juice => "juice",
            Category::Syrup => "syrup",
            Category::Mixer => "mixer",
            Category::Soft => "soft",
            Category::Bitters => "bitters",
            Category::Herb => "herb",
            Category::Garnish => "garnish",
            Category::NaBase => "na_base",
            Category::Unknown => "unknown",
            Category::Other(s) => s,
        }
    }

    /// Carbonated-drink categories
    pub fn is_soft_or_mixer(&self) -> bool {
        matches!(self, Category::Soft | Category::Mixer)
    }

    /// Category name mentions "base" (covers `base` and `na_base`)
    pub fn is_base_like(&self) -> bool {
        self.as_str().contains("base")
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ingredient reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Stable key (optional in source data)
    pub id: Option<String>,
    /// Display name
    pub name: String,
    pub category: Category,
    /// Alcohol by volume in percent (0–100); `None` when the source omits it
    pub abv: Option<f64>,
    /// Lower-cased allergen tags
    pub allergens: Vec<String>,
    pub flavors: PartialFlavor,
}

impl Ingredient {
    /// ABV with a missing value read as 0
    pub fn abv_or_zero(&self) -> f64 {
        self.abv.unwrap_or(0.0)
    }

    pub fn is_alcoholic(&self) -> bool {
        self.abv_or_zero() > 0.0
    }

    /// Whether any allergen of this ingredient appears in `excluded`
    ///
    /// `excluded` must already be lower-cased.
    pub fn has_allergen_in(&self, excluded: &[String]) -> bool {
        self.allergens
            .iter()
            .any(|a| excluded.iter().any(|e| e == a))
    }

    /// Id when present, else the display name
    pub fn id_or_name(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// ABV target and acceptable range for a mood
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbvPreference {
    pub target: f64,
    pub range: (f64, f64),
}

/// Mood catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodProfile {
    pub key: String,
    pub display_name: String,
    pub target_flavor_bias: PartialFlavor,
    pub method_bias: Vec<String>,
    pub glass_candidates: Vec<String>,
    pub base_candidates: Vec<String>,
    pub template_candidates: Vec<String>,
    pub abv_preference: Option<AbvPreference>,
    /// Words that bias naming-prefix choice
    pub naming_hints: Vec<String>,
}
