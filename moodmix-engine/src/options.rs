//! Generation options
//!
//! One [`GenerateOptions`] value serves every engine. Fields a given engine
//! does not consult are ignored by it (the creative knobs are unused by the
//! Classic and Corpus engines).

use moodmix_common::flavor::{round_half_up, TasteInput};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which generation engine to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Classic,
    Creative,
    Corpus,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Classic => "classic",
            EngineKind::Creative => "creative",
            EngineKind::Corpus => "corpus",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(EngineKind::Classic),
            "creative" => Ok(EngineKind::Creative),
            "corpus" => Ok(EngineKind::Corpus),
            other => Err(format!("unknown engine '{}' (expected classic, creative or corpus)", other)),
        }
    }
}

/// Micro-tuning intensity preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
    /// Free-form level; see [`MicroTuneOptions::resolve`]
    Level(f64),
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Intensity::Level)
                .ok_or_else(|| format!("invalid intensity '{}'", other)),
        }
    }
}

pub const DEFAULT_TUNE_ITERATIONS: u32 = 2;
pub const DEFAULT_TUNE_STEP_ML: f64 = 5.0;

/// Micro-tuning switches for the creative engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroTuneOptions {
    pub enabled: bool,
    pub iterations: Option<u32>,
    pub step_ml: Option<f64>,
    /// Takes precedence over `iterations`/`step_ml` when set
    pub intensity: Option<Intensity>,
}

impl Default for MicroTuneOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            iterations: None,
            step_ml: None,
            intensity: None,
        }
    }
}

impl MicroTuneOptions {
    /// Effective `(iterations, step_ml)`
    ///
    /// Presets: low = (1, 3), medium = (2, 5), high = (3, 8). A numeric level
    /// `n` maps to `iterations = clamp(round(n), 1, 5)` and
    /// `step = clamp(round(2 + 3n), 2, 10)`.
    pub fn resolve(&self) -> (u32, f64) {
        match self.intensity {
            Some(Intensity::Low) => (1, 3.0),
            Some(Intensity::Medium) => (2, 5.0),
            Some(Intensity::High) => (3, 8.0),
            Some(Intensity::Level(n)) => {
                let iterations = round_half_up(n).clamp(1.0, 5.0) as u32;
                let step = round_half_up(2.0 + n * 3.0).clamp(2.0, 10.0);
                (iterations, step)
            }
            None => (
                self.iterations.unwrap_or(DEFAULT_TUNE_ITERATIONS),
                self.step_ml.unwrap_or(DEFAULT_TUNE_STEP_ML),
            ),
        }
    }
}

/// Inputs of a single generation call
///
/// Serializes to camelCase JSON for logging alongside the recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    pub mood_key: String,
    /// Partial taste sliders, 0–100
    pub taste: TasteInput,
    /// Non-alcoholic mode
    pub na: bool,
    pub low_sugar: bool,
    /// Allergen tags to exclude
    pub allergies: Vec<String>,
    /// Ingredient ids or names on hand
    pub inventory_items: Vec<String>,
    pub prefer_inventory: bool,
    /// Naming variability, 0–1 (classic default 0, creative default 0.3)
    pub variability: Option<f64>,
    /// Naming seed salt; today's local date when absent
    pub seed_salt: Option<String>,

    // Creative engine knobs
    pub risk_level: Option<f64>,
    pub modernity: Option<f64>,
    pub contrast_threshold: Option<f64>,
    pub micro_tune: MicroTuneOptions,
}

impl GenerateOptions {
    pub fn new(mood_key: impl Into<String>) -> Self {
        Self {
            mood_key: mood_key.into(),
            ..Default::default()
        }
    }

    pub fn with_taste(mut self, taste: TasteInput) -> Self {
        self.taste = taste;
        self
    }

    pub fn with_na(mut self, na: bool) -> Self {
        self.na = na;
        self
    }

    pub fn with_low_sugar(mut self, low_sugar: bool) -> Self {
        self.low_sugar = low_sugar;
        self
    }

    pub fn with_seed_salt(mut self, salt: impl Into<String>) -> Self {
        self.seed_salt = Some(salt.into());
        self
    }

    pub fn with_inventory(mut self, items: Vec<String>, prefer: bool) -> Self {
        self.inventory_items = items;
        self.prefer_inventory = prefer;
        self
    }

    /// Seed salt, defaulting to the current local date (`YYYY-MM-DD`)
    pub fn effective_seed_salt(&self) -> String {
        self.seed_salt
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string())
    }

    /// Allergy tags trimmed and lower-cased, empties dropped
    pub fn normalized_allergies(&self) -> Vec<String> {
        self.allergies
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect()
    }
}
