//! Name assembly and sanitizing
//!
//! A name is built from [`NameParts`] through a template, then cleaned up in a
//! fixed order: connector clean-up, prefix/style check, banned pairs, length,
//! NA terms. The NA pass runs last so no fallback can reintroduce a term.

use moodmix_common::rules::NamingRules;

/// Connector-like characters never allowed at either end of a name
pub const CONNECTOR_CHARS: [char; 4] = ['·', '之', '与', '的'];

pub fn is_connector(c: char) -> bool {
    CONNECTOR_CHARS.contains(&c)
}

/// Length in characters (not bytes)
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Collapse runs of the same connector character into one
pub fn collapse_repeated_connectors(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if is_connector(c) && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Strip connector characters and whitespace from both ends
pub fn trim_connectors(s: &str) -> String {
    s.trim_matches(|c: char| is_connector(c) || c.is_whitespace())
        .to_string()
}

fn tidy(s: &str) -> String {
    trim_connectors(&collapse_repeated_connectors(s))
}

/// Pieces a name is assembled from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameParts {
    pub prefix: String,
    pub connector: String,
    pub style: String,
    pub spirit_hint: String,
    pub twist: String,
    pub tech_hint: String,
}

impl NameParts {
    /// `prefix + connector + style`
    pub fn bare(&self) -> String {
        tidy(&format!("{}{}{}", self.prefix, self.connector, self.style))
    }

    /// Substitute every placeholder of `template`
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{prefix}", &self.prefix)
            .replace("{connector}", &self.connector)
            .replace("{style}", &self.style)
            .replace("{spiritHint}", &self.spirit_hint)
            .replace("{twist}", &self.twist)
            .replace("{techHint}", &self.tech_hint)
    }
}

fn remove_part(name: &str, part: &str) -> String {
    if part.is_empty() {
        return name.to_string();
    }
    tidy(&name.replacen(part, "", 1))
}

/// Run the assembly pipeline for `template`
///
/// 1. fill placeholders, collapse repeated connectors, trim ends
/// 2. bare form if the result lost the prefix or the style
/// 3. banned pairs: drop the spirit hint, else use the bare form
/// 4. over `max_len`: drop twist, then spirit hint, then use the bare form
/// 5. NA mode: remove every banned term
pub fn assemble_name(naming: &NamingRules, parts: &NameParts, template: &str, na: bool) -> String {
    let mut name = tidy(&parts.fill(template));
    if !name.starts_with(parts.prefix.as_str()) || !name.contains(parts.style.as_str()) {
        name = parts.bare();
    }

    for (a, b) in &naming.banned_pairs {
        if a.is_empty() || b.is_empty() || !(name.contains(a.as_str()) && name.contains(b.as_str())) {
            continue;
        }
        if !parts.spirit_hint.is_empty() && name.contains(parts.spirit_hint.as_str()) {
            name = remove_part(&name, &parts.spirit_hint);
        }
        if name.contains(a.as_str()) && name.contains(b.as_str()) {
            name = parts.bare();
        }
    }

    let max_len = naming.max_len;
    if char_len(&name) > max_len && !parts.twist.is_empty() {
        name = remove_part(&name, &parts.twist);
    }
    if char_len(&name) > max_len && !parts.spirit_hint.is_empty() {
        name = remove_part(&name, &parts.spirit_hint);
    }
    if char_len(&name) > max_len {
        name = parts.bare();
    }

    if na {
        for term in naming.na_banned_terms.iter().filter(|t| !t.is_empty()) {
            name = name.replace(term.as_str(), "");
        }
        name = tidy(&name);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> NameParts {
        NameParts {
            prefix: "晨曦".to_string(),
            connector: "·".to_string(),
            style: "柑橘清新".to_string(),
            spirit_hint: "杜松".to_string(),
            twist: "微醺".to_string(),
            tech_hint: "轻摇".to_string(),
        }
    }

    #[test]
    fn test_collapse_and_trim() {
        assert_eq!(collapse_repeated_connectors("晨曦··柑橘"), "晨曦·柑橘");
        assert_eq!(trim_connectors("·之晨曦·柑橘的"), "晨曦·柑橘");
        assert_eq!(char_len("晨曦·柑橘"), 5);
    }

    #[test]
    fn test_fill_all_placeholders() {
        let name = parts().fill("{prefix}{connector}{spiritHint}{style}{twist}");
        assert_eq!(name, "晨曦·杜松柑橘清新微醺");
    }

    #[test]
    fn test_missing_style_falls_back_to_bare() {
        let naming = NamingRules::default();
        let mut p = parts();
        p.style = String::new();
        assert_eq!(assemble_name(&naming, &p, "{twist}", false), "晨曦");
    }

    #[test]
    fn test_banned_pair_drops_spirit_hint_first() {
        let naming = NamingRules {
            banned_pairs: vec![("杜松".to_string(), "柑橘".to_string())],
            ..Default::default()
        };
        let name = assemble_name(&naming, &parts(), "{prefix}{connector}{spiritHint}{style}", false);
        assert_eq!(name, "晨曦·柑橘清新");
    }

    #[test]
    fn test_banned_pair_without_hint_uses_bare_form() {
        let naming = NamingRules {
            banned_pairs: vec![("晨曦".to_string(), "微醺".to_string())],
            ..Default::default()
        };
        let mut p = parts();
        p.spirit_hint = String::new();
        let name = assemble_name(&naming, &p, "{prefix}{connector}{style}{twist}", false);
        assert_eq!(name, "晨曦·柑橘清新");
    }

    #[test]
    fn test_na_terms_removed() {
        let naming = NamingRules {
            na_banned_terms: vec!["微醺".to_string()],
            ..Default::default()
        };
        let name = assemble_name(&naming, &parts(), "{prefix}{connector}{style}{twist}", true);
        assert!(!name.contains("微醺"));
    }

    #[test]
    fn test_length_drops_twist_then_hint() {
        let naming = NamingRules {
            max_len: 8,
            ..Default::default()
        };
        let tpl = "{prefix}{connector}{spiritHint}{style}{twist}";
        // 11 chars; without twist 9; without hint 7
        assert_eq!(assemble_name(&naming, &parts(), tpl, false), "晨曦·柑橘清新");

        let naming = NamingRules {
            max_len: 10,
            ..Default::default()
        };
        assert_eq!(assemble_name(&naming, &parts(), tpl, false), "晨曦·杜松柑橘清新");
    }
}
