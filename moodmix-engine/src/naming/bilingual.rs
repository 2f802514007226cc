//! Creative-engine names: Chinese title, English bridge, tasting narrative
//!
//! The English side is a static lookup over the Chinese prefix, style,
//! method and base spirit; unmapped words fall back to "Aura" and
//! "Balanced Blend".

use super::assemble::{assemble_name, char_len, NameParts};
use super::seed::seeded_pick;
use super::style::choose_style_relaxed;
use crate::creative::Envelope;
use moodmix_common::flavor::{clamp01, round_half_up};
use moodmix_common::rules::{NamingRules, BARE_NAME_TEMPLATE};
use moodmix_common::{Method, MoodProfile};

const MODERN_MARKERS: [&str; 4] = ["霓虹", "星河", "流光", "夜行"];
const RETRO_MARKERS: [&str; 6] = ["松影", "雾枝", "晨曦", "花潮", "果岭", "露香"];

const EN_STYLE_MAP: [(&str, &str); 11] = [
    ("清新气泡", "Sparkling Fresh"),
    ("柑橘清新", "Citrus Bright"),
    ("柑橘明快", "Citrus Lively"),
    ("香甜柔和", "Sweet and Smooth"),
    ("芳香层次", "Aromatic Layers"),
    ("醇厚稳重", "Rich and Rounded"),
    ("甜润顺口", "Sweet and Easy"),
    ("酸爽提神", "Zesty Lift"),
    ("果香明亮", "Bright Fruity"),
    ("辛香跃动", "Spiced Lift"),
    ("微苦平衡", "Gentle Bitter Balance"),
];

const EN_PREFIX_MAP: [(&str, &str); 10] = [
    ("霓虹", "Neon"),
    ("海风", "Sea Breeze"),
    ("雾枝", "Mist Twig"),
    ("松影", "Pine Shade"),
    ("晨曦", "Dawnlight"),
    ("流光", "Lumina"),
    ("星河", "Star River"),
    ("花潮", "Floral Tide"),
    ("果岭", "Green"),
    ("露香", "Dew Aroma"),
];

const EN_SPIRIT_MAP: [(&str, &str); 7] = [
    ("gin", "juniper"),
    ("whiskey", "malty"),
    ("rum", "tropical"),
    ("vodka", "crystal"),
    ("tequila", "agave"),
    ("brandy", "fruity"),
    ("scotch", "peaty"),
];

pub const EN_PREFIX_FALLBACK: &str = "Aura";
pub const EN_STYLE_FALLBACK: &str = "Balanced Blend";

fn lookup(map: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    map.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn en_technique(method: Method) -> &'static str {
    match method {
        Method::Shake => "shaken",
        Method::Stir => "stirred",
        Method::Build => "built",
    }
}

fn zh_technique(method: Method) -> &'static str {
    match method {
        Method::Shake => "轻摇",
        Method::Stir => "慢搅",
        Method::Build => "直调",
    }
}

fn pct(v: f64) -> i64 {
    round_half_up(v * 100.0) as i64
}

/// Generation facts the creative name depends on
#[derive(Debug, Clone)]
pub struct CreativeNameInput<'a> {
    pub mood: &'a MoodProfile,
    pub envelope: &'a Envelope,
    pub has_sparkling: bool,
    pub na: bool,
    pub method: Method,
    /// Base-spirit key; empty when none was detected
    pub base_spirit: &'a str,
    pub variability: f64,
    pub seed_salt: &'a str,
    pub modernity: f64,
    pub risk: f64,
}

/// Bilingual title and narrative
#[derive(Debug, Clone, PartialEq)]
pub struct BilingualName {
    pub name_zh: String,
    pub name_en: String,
    pub narrative_zh: String,
    pub narrative_en: String,
}

impl BilingualName {
    /// `ZH (EN)`
    pub fn title(&self) -> String {
        format!("{} ({})", self.name_zh, self.name_en)
    }

    /// `ZH narrative  EN: EN narrative`
    pub fn story(&self) -> String {
        format!("{}  EN: {}", self.narrative_zh, self.narrative_en)
    }
}

/// Prefix candidates filtered by modernity
///
/// Modern (≥ 0.6) prefers modern-marked prefixes, otherwise retro-marked
/// ones; either way neutral prefixes and then the whole pool are fallbacks.
fn prefix_candidates(pool: &[String], modernity: f64) -> Vec<String> {
    let has_marker = |p: &str, markers: &[&str]| markers.iter().any(|m| p.contains(m));
    let modern: Vec<String> = pool.iter().filter(|p| has_marker(p, &MODERN_MARKERS)).cloned().collect();
    let retro: Vec<String> = pool.iter().filter(|p| has_marker(p, &RETRO_MARKERS)).cloned().collect();
    let neutral: Vec<String> = pool
        .iter()
        .filter(|p| !has_marker(p, &MODERN_MARKERS) && !has_marker(p, &RETRO_MARKERS))
        .cloned()
        .collect();

    let preferred = if modernity >= 0.6 { modern } else { retro };
    [preferred, neutral]
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| pool.to_vec())
}

/// Build the bilingual title and narrative
pub fn generate_bilingual(naming: &NamingRules, input: &CreativeNameInput<'_>) -> BilingualName {
    let mood = input.mood;
    let envelope = input.envelope;
    let modernity = clamp01(input.modernity);
    let variability = clamp01(input.variability);

    let style = choose_style_relaxed(naming, &envelope.palate, input.has_sparkling);

    let pool: Vec<String> = if !naming.prefix_pool.is_empty() {
        naming.prefix_pool.clone()
    } else if !mood.naming_hints.is_empty() {
        mood.naming_hints.clone()
    } else {
        vec![mood.display_name.clone()]
    };
    let candidates = prefix_candidates(&pool, modernity);

    let seed = format!(
        "{}|{}|{}|{}|{}|{}",
        mood.key,
        if input.base_spirit.is_empty() { "unknown" } else { input.base_spirit },
        input.method,
        if input.has_sparkling { "s" } else { "ns" },
        if input.na { "na" } else { "alc" },
        input.seed_salt
    );

    let prefix = seeded_pick(&candidates, &format!("{}|prefix", seed))
        .cloned()
        .unwrap_or_else(|| mood.display_name.clone());
    let connector = if modernity >= 0.55 {
        "·".to_string()
    } else {
        seeded_pick(&naming.connectors, &format!("{}|conn", seed))
            .cloned()
            .unwrap_or_else(|| "·".to_string())
    };
    let spirit_hint = naming.spirit_hint(input.base_spirit).unwrap_or_default().to_string();
    let tech_hint = naming.technique_hint(input.method).unwrap_or_default().to_string();
    let want_twist = input.risk > 0.5 || variability > 0.35;
    let twist = if want_twist {
        seeded_pick(&naming.twists, &format!("{}|tw", seed))
            .cloned()
            .unwrap_or_default()
    } else {
        String::new()
    };
    let template = seeded_pick(&naming.templates, &format!("{}|tpl", seed))
        .map(String::as_str)
        .unwrap_or(BARE_NAME_TEMPLATE);

    let parts = NameParts {
        prefix,
        connector,
        style,
        spirit_hint,
        twist,
        tech_hint,
    };
    let mut name_zh = assemble_name(naming, &parts, template, input.na);
    if name_zh.is_empty() {
        name_zh = mood.display_name.clone();
    }

    // English bridge
    let en_prefix = lookup(&EN_PREFIX_MAP, &parts.prefix).unwrap_or(EN_PREFIX_FALLBACK);
    let en_style = lookup(&EN_STYLE_MAP, &parts.style).unwrap_or(EN_STYLE_FALLBACK);
    let en_conn = if modernity >= 0.55 { " · " } else { " of " };
    let mut name_en = format!("{}{}{}", en_prefix, en_conn, en_style);
    if !parts.twist.is_empty() {
        name_en.push_str(if modernity >= 0.55 { " · " } else { " — " });
        name_en.push_str("Twist");
    }
    if let Some(spirit) = lookup(&EN_SPIRIT_MAP, input.base_spirit) {
        if char_len(&name_en) < naming.max_len + 8 {
            name_en.push_str(" with ");
            name_en.push_str(spirit);
        }
    }

    let (nose, palate, finish) = (&envelope.nose, &envelope.palate, &envelope.finish);
    let tech_zh = if parts.tech_hint.is_empty() {
        zh_technique(input.method)
    } else {
        parts.tech_hint.as_str()
    };
    let narrative_zh = format!(
        "{}{}{}，{}呈现；入口{}香/{}果，中段{}酸/{}甜，尾段{}微苦。",
        parts.prefix,
        parts.connector,
        parts.style,
        tech_zh,
        pct(nose.aroma),
        pct(nose.fruit),
        pct(palate.sour),
        pct(palate.sweet),
        pct(finish.bitter)
    );
    let narrative_en = format!(
        "A {} {} serve; nose {} aroma/{} fruit, palate {} sour/{} sweet, finish {} bitter.",
        en_style,
        en_technique(input.method),
        pct(nose.aroma),
        pct(nose.fruit),
        pct(palate.sour),
        pct(palate.sweet),
        pct(finish.bitter)
    );

    BilingualName {
        name_zh,
        name_en,
        narrative_zh,
        narrative_en,
    }
}
