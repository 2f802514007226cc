// Target Fusion - mood bias blended with user taste
//
// target = clamp01(w_mood * moodBias + w_taste * taste/100), per dimension.

use moodmix_common::flavor::{clamp01, round_half_up, FlavorKey, FlavorVector, TasteInput};
use moodmix_common::rules::{FusionWeights, LowSugarPreference};
use moodmix_common::MoodProfile;

/// Fuse a mood's flavor bias with the taste sliders
///
/// Missing mood bias dimensions read as 0, missing sliders as 50.
pub fn fuse_target(weights: &FusionWeights, mood: &MoodProfile, taste: &TasteInput) -> FlavorVector {
    let bias = FlavorVector::from_partial(&mood.target_flavor_bias);
    let taste = taste.to_vector();

    let mut target = FlavorVector::default();
    for key in FlavorKey::ALL {
        target.set(
            key,
            clamp01(weights.mood * bias.get(key) + weights.taste * taste.get(key)),
        );
    }
    target
}

/// Lower the sweet target for low-sugar mode
///
/// `sweet' = clamp01(min(sweet_target_max, sweet * (1 - reduce_ratio)))`
pub fn apply_low_sugar_target(pref: &LowSugarPreference, target: &FlavorVector) -> FlavorVector {
    let mut out = *target;
    let reduced = (target.sweet * (1.0 - pref.reduce_sweetener_ratio)).min(pref.sweet_target_max);
    out.set(FlavorKey::Sweet, clamp01(reduced));
    out
}

/// Smallest amount low-sugar mode cuts a sweetener down to
pub const LOW_SUGAR_FLOOR_ML: f64 = 5.0;

/// Low-sugar sweetener amount
///
/// Cuts by `reduce_sweetener_ratio` but not below [`LOW_SUGAR_FLOOR_ML`].
/// An amount already at or under the floor is left alone, so the result
/// never exceeds the input.
pub fn reduce_sweetener_ml(pref: &LowSugarPreference, amount_ml: f64) -> f64 {
    if amount_ml <= LOW_SUGAR_FLOOR_ML {
        return amount_ml;
    }
    round_half_up(amount_ml * (1.0 - pref.reduce_sweetener_ratio)).max(LOW_SUGAR_FLOOR_ML)
}

/// Effervescence preference in [0, 1], read from the `spicy` slider
pub fn effervescence_preference(taste: &TasteInput) -> f64 {
    taste.fraction(FlavorKey::Spicy)
}
