//! Intent, strategy and flavor envelope

use moodmix_common::flavor::{clamp01, FlavorKey, FlavorVector, TasteInput};
use moodmix_common::rules::IntentProfile;
use moodmix_common::{MoodProfile, RuleSet, Strategy};

/// Tasting arc of a creative recipe
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Envelope {
    pub nose: FlavorVector,
    pub palate: FlavorVector,
    pub finish: FlavorVector,
}

/// Intent profile of a mood
///
/// Looked up in `intent_profiles` by lower-cased key; otherwise estimated
/// from the mood's fruit, aroma and spicy bias.
pub fn derive_intent(rules: &RuleSet, mood: &MoodProfile) -> IntentProfile {
    if let Some(profile) = rules.intent_profiles.get(&mood.key.to_lowercase()) {
        return *profile;
    }
    let bias = &mood.target_flavor_bias;
    let modernity = clamp01(
        bias.get(FlavorKey::Fruit) * 0.3 + bias.get(FlavorKey::Aroma) * 0.3 + bias.get(FlavorKey::Spicy) * 0.2,
    );
    IntentProfile {
        modernity,
        nostalgia: (1.0 - modernity) * 0.6,
        ..IntentProfile::default()
    }
}

/// Choose the creative strategy
///
/// Contrast when risk > 0.7, or when the user asked for bitter plus spicy
/// above 0.6 (as fractions, missing sliders as 0) and the contrast threshold
/// exceeds 0.5. Blend when risk > 0.5. Follow otherwise. Both knobs default
/// to 0.5.
pub fn select_strategy(taste: &TasteInput, risk: Option<f64>, contrast_threshold: Option<f64>) -> Strategy {
    let risk = clamp01(risk.unwrap_or(0.5));
    let threshold = clamp01(contrast_threshold.unwrap_or(0.5));
    let requested = |k: FlavorKey| taste.raw(k).map(|v| v / 100.0).unwrap_or(0.0);
    let want_contrast = requested(FlavorKey::Bitter) + requested(FlavorKey::Spicy) > 0.6;

    if risk > 0.7 || (want_contrast && threshold > 0.5) {
        Strategy::Contrast
    } else if risk > 0.5 {
        Strategy::Blend
    } else {
        Strategy::Follow
    }
}

/// Build the envelope around a palate
pub fn build_envelope(strategy: Strategy, palate: FlavorVector) -> Envelope {
    let (nose, finish) = match strategy {
        Strategy::Contrast => (
            palate.shifted(&[(FlavorKey::Aroma, 0.15), (FlavorKey::Fruit, -0.05)]),
            palate.shifted(&[(FlavorKey::Bitter, 0.15), (FlavorKey::Sweet, -0.10)]),
        ),
        Strategy::Follow | Strategy::Blend => (
            palate.shifted(&[(FlavorKey::Aroma, 0.10)]),
            palate.shifted(&[(FlavorKey::Bitter, 0.08)]),
        ),
    };
    Envelope { nose, palate, finish }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use moodmix_common::catalog::normalize::fallback_moods;

    fn excited() -> MoodProfile {
        fallback_moods().into_iter().find(|m| m.key == "excited").unwrap()
    }

    #[test]
    fn test_intent_lookup_and_heuristic() {
        let mood = excited();
        let heuristic = derive_intent(&RuleSet::default(), &mood);
        // fruit 0.7, aroma 0.5, spicy 0.3
        assert_relative_eq!(heuristic.modernity, 0.21 + 0.15 + 0.06, epsilon = 1e-9);
        assert_relative_eq!(heuristic.nostalgia, (1.0 - 0.42) * 0.6, epsilon = 1e-9);
        assert_relative_eq!(heuristic.valence, 0.6, epsilon = 1e-9);

        let mut rules = RuleSet::default();
        rules.intent_profiles.insert(
            "excited".to_string(),
            IntentProfile { modernity: 0.9, ..Default::default() },
        );
        assert_relative_eq!(derive_intent(&rules, &mood).modernity, 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_strategy_selection() {
        let none = TasteInput::new();
        assert_eq!(select_strategy(&none, None, None), Strategy::Follow);
        assert_eq!(select_strategy(&none, Some(0.6), None), Strategy::Blend);
        assert_eq!(select_strategy(&none, Some(0.8), None), Strategy::Contrast);

        let bold = TasteInput::new().with(FlavorKey::Bitter, 40.0).with(FlavorKey::Spicy, 30.0);
        assert_eq!(select_strategy(&bold, None, Some(0.6)), Strategy::Contrast);
        assert_eq!(select_strategy(&bold, None, None), Strategy::Follow);
    }

    #[test]
    fn test_envelope_offsets() {
        let palate = FlavorVector { aroma: 0.5, fruit: 0.5, bitter: 0.2, sweet: 0.05, ..Default::default() };
        let env = build_envelope(Strategy::Contrast, palate);
        assert_relative_eq!(env.nose.aroma, 0.65, epsilon = 1e-9);
        assert_relative_eq!(env.nose.fruit, 0.45, epsilon = 1e-9);
        assert_relative_eq!(env.finish.bitter, 0.35, epsilon = 1e-9);
        assert_eq!(env.finish.sweet, 0.0);
        assert_eq!(env.palate, palate);

        let env = build_envelope(Strategy::Follow, palate);
        assert_relative_eq!(env.nose.aroma, 0.6, epsilon = 1e-9);
        assert_relative_eq!(env.finish.bitter, 0.28, epsilon = 1e-9);
    }
}
