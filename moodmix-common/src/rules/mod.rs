//! Generation rule set
//!
//! The rule document (`generation_rules.json`) is deserialized into typed
//! sections at start-up and validated eagerly. Every section is optional and
//! falls back to built-in constants; a section that is present but malformed
//! is an [`Error::InvalidRules`].
//!
//! # Sections
//!
//! | Key | Type |
//! |-----|------|
//! | `fusion_weights` | [`FusionWeights`] |
//! | `template_catalog` | [`TemplateDef`] list |
//! | `role_selectors` | role → [`RoleSelector`] |
//! | `ratio_tuning` | [`RatioTuning`] |
//! | `dilution_by_method` | [`DilutionByMethod`] |
//! | `ice_rules` | [`IceRules`] |
//! | `garnish_rules` | [`GarnishRule`] list |
//! | `allergy_and_constraints` | [`AllergyAndConstraints`] |
//! | `effervescence_boost_factor` | number |
//! | `naming_v2` | [`NamingRules`] |
//! | `naming` | [`LegacyNaming`] |
//! | `semantic_tags` | [`SemanticTags`] |
//! | `pairing_scores` | [`PairingScores`] |
//! | `intent_profiles` | mood → [`IntentProfile`] |
//! | `motifs` | [`Motif`] list |
//! | `style_grammar` | [`StyleGrammar`] |

mod validate;

use crate::catalog::normalize::to_id;
use crate::catalog::Category;
use crate::flavor::round_half_up;
use crate::recipe::Method;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Creative-engine strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Follow,
    Contrast,
    Blend,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Follow => "follow",
            Strategy::Contrast => "contrast",
            Strategy::Blend => "blend",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights of mood bias and taste sliders in the fused target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub mood: f64,
    pub taste: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { mood: 0.7, taste: 0.3 }
    }
}

/// Amount specification of a template role
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RoleAmount {
    Ml(f64),
    /// 1 dash ≈ 1 ml
    Dashes(f64),
    /// Derived from the role name
    RoleDefault,
}

#[derive(Deserialize)]
struct RawRoleDef {
    role: String,
    #[serde(default)]
    ml: Option<f64>,
    #[serde(default)]
    dashes: Option<f64>,
}

/// One structural slot of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRoleDef")]
pub struct RoleDef {
    pub role: String,
    pub amount: RoleAmount,
}

impl From<RawRoleDef> for RoleDef {
    fn from(raw: RawRoleDef) -> Self {
        let amount = match (raw.ml, raw.dashes) {
            (Some(ml), _) => RoleAmount::Ml(ml),
            (None, Some(d)) => RoleAmount::Dashes(d),
            (None, None) => RoleAmount::RoleDefault,
        };
        RoleDef { role: raw.role, amount }
    }
}

impl RoleDef {
    pub fn new(role: impl Into<String>, amount: RoleAmount) -> Self {
        Self { role: role.into(), amount }
    }

    /// Default amount for a role given by name only
    pub fn default_ml_for(role: &str) -> f64 {
        match role {
            "base" => 45.0,
            "mixer" => 120.0,
            "citrus" | "sweetener" => 20.0,
            _ => 15.0,
        }
    }

    /// Amount in millilitres
    pub fn ml(&self) -> f64 {
        match self.amount {
            RoleAmount::Ml(ml) => ml,
            RoleAmount::Dashes(d) => round_half_up(d).max(0.0),
            RoleAmount::RoleDefault => Self::default_ml_for(&self.role),
        }
    }

    /// Lower-cased role name
    pub fn role_key(&self) -> String {
        self.role.to_lowercase()
    }
}

/// Recipe skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub id: String,
    #[serde(default)]
    pub method: Option<Method>,
    #[serde(default)]
    pub default_glass: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleDef>,
}

#[derive(Deserialize)]
struct RawRoleSelector {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default, alias = "categories")]
    category_any: Vec<String>,
}

/// Candidate pool for a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRoleSelector")]
pub enum RoleSelector {
    /// Explicit ingredient ids, in preference order
    Ids(Vec<String>),
    /// Every ingredient of these categories
    Categories(Vec<Category>),
}

impl TryFrom<RawRoleSelector> for RoleSelector {
    type Error = String;

    fn try_from(raw: RawRoleSelector) -> std::result::Result<Self, Self::Error> {
        if !raw.ids.is_empty() {
            Ok(RoleSelector::Ids(raw.ids))
        } else if !raw.category_any.is_empty() {
            Ok(RoleSelector::Categories(
                raw.category_any.iter().map(|c| Category::parse(c)).collect(),
            ))
        } else {
            Err("role selector needs non-empty `ids` or `category_any`".to_string())
        }
    }
}

/// Per-unit amount adjustments driven by taste sliders
///
/// One unit is 10 slider points away from the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioTuning {
    pub sweet_adjust_ml_per_unit: f64,
    pub sour_adjust_ml_per_unit: f64,
    pub fruit_adjust_ml_per_unit: f64,
    pub bitter_adjust_dashes_per_unit: f64,
    pub boozy_adjust_base_ml: f64,
}

impl Default for RatioTuning {
    fn default() -> Self {
        Self {
            sweet_adjust_ml_per_unit: 5.0,
            sour_adjust_ml_per_unit: 5.0,
            fruit_adjust_ml_per_unit: 8.0,
            bitter_adjust_dashes_per_unit: 1.0,
            boozy_adjust_base_ml: 5.0,
        }
    }
}

/// Melt-water fraction per method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DilutionByMethod {
    pub shake: f64,
    pub stir: f64,
    pub build: f64,
}

impl Default for DilutionByMethod {
    fn default() -> Self {
        Self { shake: 0.18, stir: 0.12, build: 0.08 }
    }
}

impl DilutionByMethod {
    pub fn factor(&self, method: Method) -> f64 {
        match method {
            Method::Shake => self.shake,
            Method::Stir => self.stir,
            Method::Build => self.build,
        }
    }
}

/// Ice style per method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceRules {
    pub shake: String,
    pub stir: String,
    pub build: String,
}

impl Default for IceRules {
    fn default() -> Self {
        Self {
            shake: "strain_no_ice_or_fresh_ice".to_string(),
            stir: "fresh_ice".to_string(),
            build: "lots_of_ice".to_string(),
        }
    }
}

impl IceRules {
    /// Ice for a method; an empty rule entry reads as `fresh_ice`
    pub fn for_method(&self, method: Method) -> &str {
        let ice = match method {
            Method::Shake => &self.shake,
            Method::Stir => &self.stir,
            Method::Build => &self.build,
        };
        if ice.is_empty() {
            "fresh_ice"
        } else {
            ice
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GarnishRule {
    /// Base ingredient ids this rule applies to
    pub when_base: Vec<String>,
    pub prefer: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowSugarPreference {
    pub reduce_sweetener_ratio: f64,
    pub sweet_target_max: f64,
}

impl Default for LowSugarPreference {
    fn default() -> Self {
        Self {
            reduce_sweetener_ratio: 0.30,
            sweet_target_max: 0.35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllergyAndConstraints {
    pub low_sugar_preference: LowSugarPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingThresholds {
    pub high: f64,
}

impl Default for NamingThresholds {
    fn default() -> Self {
        Self { high: 0.6 }
    }
}

/// Taste-style label tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasteStyles {
    /// `"dimA+dimB"` → labels
    pub combos: BTreeMap<String, Vec<String>>,
    /// dimension → labels
    pub singles: BTreeMap<String, Vec<String>>,
    pub sparkling_style: String,
}

impl Default for TasteStyles {
    fn default() -> Self {
        Self {
            combos: BTreeMap::new(),
            singles: BTreeMap::new(),
            sparkling_style: "清新气泡".to_string(),
        }
    }
}

/// Procedural naming tables (`naming_v2`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRules {
    pub connectors: Vec<String>,
    pub prefix_pool: Vec<String>,
    pub twists: Vec<String>,
    /// Assembly templates with `{prefix}`, `{connector}`, `{style}` and the
    /// optional `{spiritHint}`, `{twist}`, `{techHint}` placeholders
    pub templates: Vec<String>,
    /// Soft cap in characters
    pub max_len: usize,
    pub banned_pairs: Vec<(String, String)>,
    pub na_banned_terms: Vec<String>,
    /// Base-spirit key → hint words
    pub spirit_hints: BTreeMap<String, Vec<String>>,
    /// Method → hint words
    pub technique_hints: BTreeMap<String, Vec<String>>,
    pub taste_styles: TasteStyles,
    pub style_weights: BTreeMap<String, f64>,
    pub style_aliases: BTreeMap<String, Vec<String>>,
    pub thresholds: NamingThresholds,
}

/// Default assembly template
pub const BARE_NAME_TEMPLATE: &str = "{prefix}{connector}{style}";

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            connectors: vec!["·".to_string()],
            prefix_pool: Vec::new(),
            twists: Vec::new(),
            templates: vec![BARE_NAME_TEMPLATE.to_string()],
            max_len: 12,
            banned_pairs: Vec::new(),
            na_banned_terms: Vec::new(),
            spirit_hints: BTreeMap::new(),
            technique_hints: BTreeMap::new(),
            taste_styles: TasteStyles::default(),
            style_weights: BTreeMap::new(),
            style_aliases: BTreeMap::new(),
            thresholds: NamingThresholds::default(),
        }
    }
}

impl NamingRules {
    pub fn spirit_hint(&self, spirit: &str) -> Option<&str> {
        self.spirit_hints
            .get(spirit)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn technique_hint(&self, method: Method) -> Option<&str> {
        self.technique_hints
            .get(method.as_str())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn style_weight(&self, style: &str) -> f64 {
        self.style_weights.get(style).copied().unwrap_or(1.0)
    }
}

/// Word pools for the simplified naming fallback (`naming`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyNaming {
    pub colors: Vec<String>,
    pub nature: Vec<String>,
}

/// Semantic tag tables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticTags {
    /// tag → name substrings (matched case-insensitively)
    pub patterns: BTreeMap<String, Vec<String>>,
    /// category → tags
    pub by_category: BTreeMap<String, Vec<String>>,
}

/// Tag-pair scores keyed `"tagA+tagB"`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingScores {
    pub positive: BTreeMap<String, f64>,
    pub negative: BTreeMap<String, f64>,
}

/// Affective profile of a mood
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentProfile {
    pub valence: f64,
    pub arousal: f64,
    pub warmth: f64,
    pub complexity: f64,
    pub modernity: f64,
    pub adventurous: f64,
    pub nostalgia: f64,
}

impl Default for IntentProfile {
    fn default() -> Self {
        Self {
            valence: 0.6,
            arousal: 0.5,
            warmth: 0.6,
            complexity: 0.5,
            modernity: 0.5,
            adventurous: 0.4,
            nostalgia: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotifApply {
    /// Empty matches every mood
    pub moods: Vec<String>,
    /// Empty matches every strategy
    pub strategies: Vec<Strategy>,
}

/// Thematic overlay for the creative engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motif {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prefer_templates: Vec<String>,
    #[serde(default)]
    pub apply: MotifApply,
}

impl Motif {
    pub fn applies_to(&self, mood_key: &str, strategy: Strategy) -> bool {
        let mood_ok = self.apply.moods.is_empty() || self.apply.moods.iter().any(|m| m == mood_key);
        let strategy_ok =
            self.apply.strategies.is_empty() || self.apply.strategies.contains(&strategy);
        mood_ok && strategy_ok
    }
}

/// Method/glass override for a template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Linkage {
    pub method: Option<Method>,
    pub glass: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGrammar {
    pub prefer_templates_by_strategy: BTreeMap<Strategy, Vec<String>>,
    /// Template id → linkage
    pub linkage: BTreeMap<String, Linkage>,
}

impl StyleGrammar {
    pub fn linkage_for(&self, template_id: &str) -> Option<&Linkage> {
        self.linkage
            .get(template_id)
            .or_else(|| self.linkage.iter().find(|(k, _)| to_id(k) == to_id(template_id)).map(|(_, v)| v))
    }
}

/// Validated generation rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub fusion_weights: FusionWeights,
    pub template_catalog: Vec<TemplateDef>,
    pub role_selectors: BTreeMap<String, RoleSelector>,
    pub ratio_tuning: RatioTuning,
    pub dilution_by_method: DilutionByMethod,
    pub ice_rules: IceRules,
    pub garnish_rules: Vec<GarnishRule>,
    pub allergy_and_constraints: AllergyAndConstraints,
    pub effervescence_boost_factor: f64,
    pub naming_v2: Option<NamingRules>,
    pub naming: LegacyNaming,
    pub semantic_tags: SemanticTags,
    pub pairing_scores: PairingScores,
    pub intent_profiles: BTreeMap<String, IntentProfile>,
    pub motifs: Vec<Motif>,
    pub style_grammar: StyleGrammar,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            fusion_weights: FusionWeights::default(),
            template_catalog: Vec::new(),
            role_selectors: BTreeMap::new(),
            ratio_tuning: RatioTuning::default(),
            dilution_by_method: DilutionByMethod::default(),
            ice_rules: IceRules::default(),
            garnish_rules: Vec::new(),
            allergy_and_constraints: AllergyAndConstraints::default(),
            effervescence_boost_factor: 0.10,
            naming_v2: None,
            naming: LegacyNaming::default(),
            semantic_tags: SemanticTags::default(),
            pairing_scores: PairingScores::default(),
            intent_profiles: BTreeMap::new(),
            motifs: Vec::new(),
            style_grammar: StyleGrammar::default(),
        }
    }
}

impl RuleSet {
    /// Parse and validate a rule document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let rules: RuleSet =
            serde_json::from_str(text).map_err(|e| Error::InvalidRules(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a rule document from disk
    ///
    /// A missing file yields the built-in defaults; an unreadable or invalid
    /// one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Rule document {} not found, using built-in rules", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let rules = Self::from_json_str(&text)?;
        info!(
            "Rules loaded: {} templates, {} role selectors, {} motifs",
            rules.template_catalog.len(),
            rules.role_selectors.len(),
            rules.motifs.len()
        );
        Ok(rules)
    }

    /// Template by id, compared after id normalization
    pub fn template(&self, id: &str) -> Option<&TemplateDef> {
        let key = to_id(id);
        self.template_catalog.iter().find(|t| to_id(&t.id) == key)
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.template(id).is_some()
    }

    pub fn low_sugar(&self) -> &LowSugarPreference {
        &self.allergy_and_constraints.low_sugar_preference
    }

    /// Garnish preferences for a detected base ingredient id
    pub fn garnish_for_base(&self, base_id: Option<&str>) -> Vec<String> {
        let Some(base_id) = base_id else {
            return Vec::new();
        };
        self.garnish_rules
            .iter()
            .find(|g| g.when_base.iter().any(|b| b == base_id))
            .map(|g| g.prefer.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_uses_defaults() {
        let rules = RuleSet::from_json_str("{}").unwrap();
        assert_eq!(rules.fusion_weights, FusionWeights { mood: 0.7, taste: 0.3 });
        assert_eq!(rules.dilution_by_method.factor(Method::Shake), 0.18);
        assert_eq!(rules.ice_rules.for_method(Method::Build), "lots_of_ice");
        assert_eq!(rules.effervescence_boost_factor, 0.10);
        assert_eq!(rules.low_sugar().reduce_sweetener_ratio, 0.30);
        assert!(rules.naming_v2.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let rules = RuleSet::from_json_str(r#"{"dilution_by_method":{"shake":0.2}}"#).unwrap();
        assert_eq!(rules.dilution_by_method.shake, 0.2);
        assert_eq!(rules.dilution_by_method.stir, 0.12);
    }

    #[test]
    fn test_role_amount_variants() {
        let t: TemplateDef = serde_json::from_value(json!({
            "id": "old_fashioned", "method": "stir",
            "roles": [{ "role": "base", "ml": 60 }, { "role": "bitters", "dashes": 2 }, { "role": "citrus" }, { "role": "garnish" }]
        }))
        .unwrap();
        assert_eq!(t.method, Some(Method::Stir));
        let ml: Vec<f64> = t.roles.iter().map(RoleDef::ml).collect();
        assert_eq!(ml, vec![60.0, 2.0, 20.0, 15.0]);
        assert_eq!(t.roles[1].amount, RoleAmount::Dashes(2.0));
    }

    #[test]
    fn test_role_selector_variants() {
        let ids: RoleSelector = serde_json::from_value(json!({ "ids": ["gin", "vodka"] })).unwrap();
        assert_eq!(ids, RoleSelector::Ids(vec!["gin".into(), "vodka".into()]));

        let cats: RoleSelector = serde_json::from_value(json!({ "category_any": ["juice", "na_base"] })).unwrap();
        assert_eq!(cats, RoleSelector::Categories(vec![Category::Juice, Category::NaBase]));

        assert!(serde_json::from_value::<RoleSelector>(json!({ "ids": [] })).is_err());
    }

    #[test]
    fn test_template_lookup_normalizes_id() {
        let rules = RuleSet::from_json_str(r#"{"template_catalog":[{"id":"old_fashioned"}]}"#).unwrap();
        assert!(rules.has_template("Old Fashioned"));
        assert!(!rules.has_template("sour"));
    }

    #[test]
    fn test_banned_pair_must_have_two_terms() {
        let err = RuleSet::from_json_str(r#"{"naming_v2":{"banned_pairs":[["a","b","c"]]}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidRules(_)));
    }

    #[test]
    fn test_motif_applies() {
        let motif: Motif = serde_json::from_value(json!({
            "id": "m", "apply": { "moods": ["calm"], "strategies": ["follow"] }
        }))
        .unwrap();
        assert!(motif.applies_to("calm", Strategy::Follow));
        assert!(!motif.applies_to("calm", Strategy::Blend));
        assert!(!motif.applies_to("happy", Strategy::Follow));
    }

    #[test]
    fn test_strategy_keyed_grammar() {
        let grammar: StyleGrammar = serde_json::from_value(json!({
            "prefer_templates_by_strategy": { "contrast": ["martini"] },
            "linkage": { "martini": { "method": "stir", "glass": "coupe" } }
        }))
        .unwrap();
        assert_eq!(
            grammar.prefer_templates_by_strategy.get(&Strategy::Contrast),
            Some(&vec!["martini".to_string()])
        );
        assert_eq!(grammar.linkage_for("Martini").and_then(|l| l.method), Some(Method::Stir));
    }

    #[test]
    fn test_garnish_for_base() {
        let rules = RuleSet::from_json_str(
            r#"{"garnish_rules":[{"when_base":["gin"],"prefer":["柠檬皮"]}]}"#,
        )
        .unwrap();
        assert_eq!(rules.garnish_for_base(Some("gin")), vec!["柠檬皮".to_string()]);
        assert!(rules.garnish_for_base(Some("vodka")).is_empty());
        assert!(rules.garnish_for_base(None).is_empty());
    }
}
