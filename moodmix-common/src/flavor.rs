//! Flavor model
//!
//! Every taste/aroma signature in moodmix is a point in a fixed
//! 7-dimensional space: sweet, sour, bitter, aroma, fruit, spicy, body.
//!
//! - [`FlavorVector`] is a complete vector with every component in [0, 1].
//! - [`PartialFlavor`] is what catalog records carry: any subset of the
//!   dimensions, missing ones read as 0.
//! - [`TasteInput`] holds user taste sliders on a 0–100 scale, missing ones
//!   read as the midpoint 50.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Clamp a value into [0, 1]
///
/// Non-finite input collapses to 0 so a bad catalog number can never leak
/// out of a produced vector.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Round half toward positive infinity (2.5 → 3, -2.5 → -2)
///
/// Slider units and amounts are rounded this way everywhere so that
/// symmetric slider offsets (45 vs 55) do not round asymmetrically to ±1.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// One of the seven fixed flavor dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlavorKey {
    Sweet,
    Sour,
    Bitter,
    Aroma,
    Fruit,
    Spicy,
    Body,
}

impl FlavorKey {
    /// All dimensions in canonical order
    pub const ALL: [FlavorKey; 7] = [
        FlavorKey::Sweet,
        FlavorKey::Sour,
        FlavorKey::Bitter,
        FlavorKey::Aroma,
        FlavorKey::Fruit,
        FlavorKey::Spicy,
        FlavorKey::Body,
    ];

    /// Lower-case key as used in catalogs and rule tables
    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorKey::Sweet => "sweet",
            FlavorKey::Sour => "sour",
            FlavorKey::Bitter => "bitter",
            FlavorKey::Aroma => "aroma",
            FlavorKey::Fruit => "fruit",
            FlavorKey::Spicy => "spicy",
            FlavorKey::Body => "body",
        }
    }

    /// Parse a key, accepting the legacy `spice` spelling for `spicy`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sweet" => Some(FlavorKey::Sweet),
            "sour" => Some(FlavorKey::Sour),
            "bitter" => Some(FlavorKey::Bitter),
            "aroma" => Some(FlavorKey::Aroma),
            "fruit" => Some(FlavorKey::Fruit),
            "spicy" | "spice" => Some(FlavorKey::Spicy),
            "body" => Some(FlavorKey::Body),
            _ => None,
        }
    }
}

impl fmt::Display for FlavorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete flavor vector, each component in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlavorVector {
    pub sweet: f64,
    pub sour: f64,
    pub bitter: f64,
    pub aroma: f64,
    pub fruit: f64,
    pub spicy: f64,
    pub body: f64,
}

impl FlavorVector {
    /// Build a vector from a partial one, treating missing dimensions as 0
    pub fn from_partial(partial: &PartialFlavor) -> Self {
        let mut out = FlavorVector::default();
        for key in FlavorKey::ALL {
            out.set(key, partial.get(key));
        }
        out
    }

    pub fn get(&self, key: FlavorKey) -> f64 {
        match key {
            FlavorKey::Sweet => self.sweet,
            FlavorKey::Sour => self.sour,
            FlavorKey::Bitter => self.bitter,
            FlavorKey::Aroma => self.aroma,
            FlavorKey::Fruit => self.fruit,
            FlavorKey::Spicy => self.spicy,
            FlavorKey::Body => self.body,
        }
    }

    /// Set one component, clamped into [0, 1]
    pub fn set(&mut self, key: FlavorKey, value: f64) {
        let value = clamp01(value);
        match key {
            FlavorKey::Sweet => self.sweet = value,
            FlavorKey::Sour => self.sour = value,
            FlavorKey::Bitter => self.bitter = value,
            FlavorKey::Aroma => self.aroma = value,
            FlavorKey::Fruit => self.fruit = value,
            FlavorKey::Spicy => self.spicy = value,
            FlavorKey::Body => self.body = value,
        }
    }

    /// Return a copy with `delta` added per dimension, clamped
    pub fn shifted(&self, delta: &[(FlavorKey, f64)]) -> Self {
        let mut out = *self;
        for &(key, d) in delta {
            out.set(key, self.get(key) + d);
        }
        out
    }

    /// Iterate `(key, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (FlavorKey, f64)> + '_ {
        FlavorKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Whether every component lies in [0, 1]
    pub fn is_normalized(&self) -> bool {
        self.iter().all(|(_, v)| (0.0..=1.0).contains(&v))
    }

    /// Euclidean distance to another vector
    pub fn distance(&self, other: &FlavorVector) -> f64 {
        FlavorKey::ALL
            .iter()
            .map(|&k| (self.get(k) - other.get(k)).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Amount-weighted average of flavor sources, clamped
    ///
    /// Weights are `amount / max(1, Σ amounts)`; negative amounts count as 0.
    pub fn weighted_average<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (&'a PartialFlavor, f64)>,
    {
        let items: Vec<(&PartialFlavor, f64)> = sources
            .into_iter()
            .map(|(f, amount)| (f, amount.max(0.0)))
            .collect();
        let total = items.iter().map(|(_, a)| a).sum::<f64>().max(1.0);

        let mut out = FlavorVector::default();
        for key in FlavorKey::ALL {
            let sum: f64 = items.iter().map(|(f, a)| f.get(key) * a).sum();
            out.set(key, sum / total);
        }
        out
    }
}

/// Partial flavor map as found on catalog records
///
/// Missing dimensions read as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialFlavor(BTreeMap<FlavorKey, f64>);

impl PartialFlavor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a dimension, 0 when absent
    pub fn get(&self, key: FlavorKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: FlavorKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn insert(&mut self, key: FlavorKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlavorKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(FlavorKey, f64)> for PartialFlavor {
    fn from_iter<T: IntoIterator<Item = (FlavorKey, f64)>>(iter: T) -> Self {
        PartialFlavor(iter.into_iter().collect())
    }
}

impl From<&FlavorVector> for PartialFlavor {
    fn from(v: &FlavorVector) -> Self {
        v.iter().collect()
    }
}

/// Midpoint of a taste slider
pub const TASTE_MIDPOINT: f64 = 50.0;

/// User taste sliders on a 0–100 scale
///
/// Missing sliders read as the midpoint (50).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TasteInput(BTreeMap<FlavorKey, f64>);

impl TasteInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style slider assignment
    pub fn with(mut self, key: FlavorKey, slider: f64) -> Self {
        self.0.insert(key, slider);
        self
    }

    pub fn set(&mut self, key: FlavorKey, slider: f64) {
        self.0.insert(key, slider);
    }

    /// Raw slider value if the user supplied one
    pub fn raw(&self, key: FlavorKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// Slider value, defaulting to the midpoint
    pub fn slider(&self, key: FlavorKey) -> f64 {
        self.raw(key).unwrap_or(TASTE_MIDPOINT)
    }

    /// Slider mapped into [0, 1]
    pub fn fraction(&self, key: FlavorKey) -> f64 {
        clamp01(self.slider(key) / 100.0)
    }

    /// Full taste vector, every slider mapped into [0, 1]
    pub fn to_vector(&self) -> FlavorVector {
        let mut out = FlavorVector::default();
        for key in FlavorKey::ALL {
            out.set(key, self.fraction(key));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp01_bounds() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }

    #[test]
    fn test_round_half_up_is_symmetric_for_slider_units() {
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-1.6), -2.0);
    }

    #[test]
    fn test_parse_accepts_spice_alias() {
        assert_eq!(FlavorKey::parse("spice"), Some(FlavorKey::Spicy));
        assert_eq!(FlavorKey::parse("Spicy"), Some(FlavorKey::Spicy));
        assert_eq!(FlavorKey::parse("umami"), None);
    }

    #[test]
    fn test_from_partial_fills_missing_with_zero() {
        let partial: PartialFlavor = [(FlavorKey::Sour, 0.8), (FlavorKey::Body, 1.7)]
            .into_iter()
            .collect();
        let v = FlavorVector::from_partial(&partial);
        assert_eq!(v.sour, 0.8);
        assert_eq!(v.body, 1.0);
        assert_eq!(v.sweet, 0.0);
        assert!(v.is_normalized());
    }

    #[test]
    fn test_weighted_average_uses_amount_share() {
        let a: PartialFlavor = [(FlavorKey::Sweet, 1.0)].into_iter().collect();
        let b: PartialFlavor = [(FlavorKey::Sour, 1.0)].into_iter().collect();
        let v = FlavorVector::weighted_average([(&a, 30.0), (&b, 10.0)]);
        assert_relative_eq!(v.sweet, 0.75);
        assert_relative_eq!(v.sour, 0.25);
    }

    #[test]
    fn test_weighted_average_of_nothing_is_zero() {
        let v = FlavorVector::weighted_average(std::iter::empty());
        assert_eq!(v, FlavorVector::default());
    }

    #[test]
    fn test_taste_defaults_to_midpoint() {
        let taste = TasteInput::new().with(FlavorKey::Sweet, 80.0);
        assert_eq!(taste.slider(FlavorKey::Sweet), 80.0);
        assert_eq!(taste.slider(FlavorKey::Sour), 50.0);
        assert_relative_eq!(taste.fraction(FlavorKey::Sweet), 0.8);
        assert_relative_eq!(taste.to_vector().bitter, 0.5);
    }

    #[test]
    fn test_shifted_clamps() {
        let v = FlavorVector {
            aroma: 0.95,
            sweet: 0.05,
            ..Default::default()
        };
        let s = v.shifted(&[(FlavorKey::Aroma, 0.15), (FlavorKey::Sweet, -0.10)]);
        assert_eq!(s.aroma, 1.0);
        assert_eq!(s.sweet, 0.0);
    }
}
