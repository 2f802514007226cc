//! Style resolution: template, method, glass and role layout
//!
//! The template comes from the strategy's preference list in the style
//! grammar (NA mode always prefers highball or collins), else from a fixed
//! per-strategy order. A matching motif can override it with one of its own
//! preferred templates.

use moodmix_common::rules::{Motif, RoleAmount, RoleDef, TemplateDef};
use moodmix_common::{Method, RuleSet, Strategy};

/// Resolved creative style
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub template: String,
    pub method: Method,
    pub glass: String,
    pub roles: Vec<RoleDef>,
}

const NA_PREFERENCES: [&str; 2] = ["highball", "collins"];

/// Roles used when the template is not in the catalog
pub fn builtin_roles() -> Vec<RoleDef> {
    vec![
        RoleDef::new("base", RoleAmount::Ml(50.0)),
        RoleDef::new("citrus", RoleAmount::Ml(25.0)),
        RoleDef::new("sweetener", RoleAmount::Ml(20.0)),
    ]
}

fn default_method(template: &str) -> Method {
    match template {
        "old_fashioned" => Method::Stir,
        "highball" => Method::Build,
        _ => Method::Shake,
    }
}

fn default_glass(template: &str) -> &'static str {
    match template {
        "old_fashioned" => "rocks",
        "highball" => "highball",
        _ => "coupe",
    }
}

/// Fixed template order per strategy, ending in an unconditional default
fn strategy_fallback(rules: &RuleSet, strategy: Strategy) -> &'static str {
    let (candidates, last): (&[&'static str], &'static str) = match strategy {
        Strategy::Contrast => (&["martini", "old_fashioned"], "sour"),
        Strategy::Follow => (&["sour", "collins"], "highball"),
        Strategy::Blend => (&["old_fashioned"], "sour"),
    };
    candidates
        .iter()
        .copied()
        .find(|id| rules.has_template(id))
        .unwrap_or(last)
}

fn resolve(rules: &RuleSet, id: &str, def: Option<&TemplateDef>, fallback: Option<&StyleSpec>) -> (Method, String) {
    let linkage = rules.style_grammar.linkage_for(id);
    let method = linkage
        .and_then(|l| l.method)
        .or_else(|| def.and_then(|t| t.method))
        .or_else(|| fallback.map(|s| s.method))
        .unwrap_or_else(|| default_method(id));
    let glass = linkage
        .and_then(|l| l.glass.clone())
        .or_else(|| def.and_then(|t| t.default_glass.clone()))
        .or_else(|| fallback.map(|s| s.glass.clone()))
        .unwrap_or_else(|| default_glass(id).to_string());
    (method, glass)
}

/// Pick the style for a strategy
pub fn pick_style(rules: &RuleSet, strategy: Strategy, na: bool) -> StyleSpec {
    let preferred: Vec<&str> = if na {
        NA_PREFERENCES.to_vec()
    } else {
        rules
            .style_grammar
            .prefer_templates_by_strategy
            .get(&strategy)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    };
    let id = preferred
        .into_iter()
        .find(|id| rules.has_template(id))
        .unwrap_or_else(|| strategy_fallback(rules, strategy));

    let def = rules.template(id);
    let (method, glass) = resolve(rules, id, def, None);
    let roles = def
        .map(|t| t.roles.clone())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(builtin_roles);
    StyleSpec {
        template: def.map(|t| t.id.clone()).unwrap_or_else(|| id.to_string()),
        method,
        glass,
        roles,
    }
}

/// First motif applying to the mood and strategy
pub fn choose_motif<'a>(rules: &'a RuleSet, mood_key: &str, strategy: Strategy) -> Option<&'a Motif> {
    rules.motifs.iter().find(|m| m.applies_to(mood_key, strategy))
}

/// Let a motif's first catalog template override the style
///
/// Method and glass fall back to the current style's; roles are taken from
/// the motif template when it defines any.
pub fn apply_motif(rules: &RuleSet, style: StyleSpec, motif: &Motif) -> StyleSpec {
    let Some(def) = motif.prefer_templates.iter().find_map(|id| rules.template(id)) else {
        return style;
    };
    let (method, glass) = resolve(rules, &def.id, Some(def), Some(&style));
    let roles = if def.roles.is_empty() {
        style.roles
    } else {
        def.roles.clone()
    };
    StyleSpec {
        template: def.id.clone(),
        method,
        glass,
        roles,
    }
}
