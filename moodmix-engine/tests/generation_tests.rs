//! End-to-end generation tests against the sample catalog in `data/`
//!
//! Each engine runs through `moodmix_engine::generate`, so finalization is
//! always applied.

use moodmix_common::flavor::FlavorKey;
use moodmix_common::{Error, Method, TasteInput};
use moodmix_engine::finalize::{finalize, FinalizeOptions};
use moodmix_engine::naming::is_connector;
use moodmix_engine::{generate, EngineContext, EngineKind, GenerateOptions};
use std::path::PathBuf;

const ENGINES: [EngineKind; 3] = [EngineKind::Classic, EngineKind::Creative, EngineKind::Corpus];

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("data")
}

fn ctx() -> EngineContext {
    EngineContext::load(&data_dir()).expect("sample data loads")
}

fn opts(mood: &str) -> GenerateOptions {
    GenerateOptions::new(mood).with_seed_salt("2024-06-01")
}

#[test]
fn test_sample_data_loads() {
    let ctx = ctx();
    assert!(ctx.catalog().ingredients().len() > 20);
    assert!(!ctx.corpus().is_empty());
    assert!(ctx.rules().naming_v2.is_some());
    // four catalog moods plus the two fallbacks
    let keys: Vec<&str> = ctx.moods().iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["happy", "calm", "romantic", "tired", "angry", "excited"]);
}

#[test]
fn test_flavor_always_normalized() {
    let ctx = ctx();
    let tastes = [
        TasteInput::new(),
        TasteInput::new().with(FlavorKey::Sweet, 100.0).with(FlavorKey::Bitter, 0.0),
        TasteInput::new().with(FlavorKey::Spicy, 100.0).with(FlavorKey::Sour, 100.0),
        TasteInput::new().with(FlavorKey::Body, 0.0).with(FlavorKey::Fruit, 100.0),
    ];
    for mood in ctx.moods() {
        for taste in &tastes {
            for engine in ENGINES {
                let o = opts(&mood.key).with_taste(taste.clone());
                let recipe = generate(&ctx, engine, &o).unwrap();
                assert!(recipe.flavor.is_normalized(), "{:?} {} {:?}", engine, mood.key, recipe.flavor);
                assert!(recipe.estimated_abv <= 100);
            }
        }
    }
}

#[test]
fn test_na_mode_is_alcohol_free() {
    let ctx = ctx();
    for mood in ["happy", "calm", "romantic", "tired", "angry"] {
        for engine in ENGINES {
            let recipe = generate(&ctx, engine, &opts(mood).with_na(true)).unwrap();
            assert_eq!(recipe.estimated_abv, 0, "{:?} {}", engine, mood);
            for line in &recipe.ingredients {
                assert_eq!(line.abv.unwrap_or(0.0), 0.0, "{:?} {} {}", engine, mood, line.name);
            }
        }
    }
}

#[test]
fn test_low_sugar_never_sweeter() {
    let ctx = ctx();
    let tastes = [
        TasteInput::new(),
        TasteInput::new().with(FlavorKey::Sweet, 0.0),
        TasteInput::new().with(FlavorKey::Sweet, 10.0),
        TasteInput::new().with(FlavorKey::Sweet, 20.0),
    ];
    for mood in ctx.moods() {
        for taste in &tastes {
            for engine in ENGINES {
                let o = opts(&mood.key).with_taste(taste.clone());
                let normal = generate(&ctx, engine, &o).unwrap();
                let low = generate(&ctx, engine, &o.clone().with_low_sugar(true)).unwrap();
                assert!(
                    low.flavor.sweet <= normal.flavor.sweet,
                    "{:?} {} {:?}: {} > {}",
                    engine,
                    mood.key,
                    taste,
                    low.flavor.sweet,
                    normal.flavor.sweet
                );
            }
        }
    }
}

#[test]
fn test_classic_drops_empty_lines() {
    let ctx = ctx();
    let taste = TasteInput::new().with(FlavorKey::Sweet, 0.0);
    for mood in ctx.moods() {
        let recipe = generate(&ctx, EngineKind::Classic, &opts(&mood.key).with_taste(taste.clone())).unwrap();
        assert!(recipe.ingredients.iter().all(|i| i.amount_ml > 0.0), "{} {:?}", mood.key, recipe.ingredients);
    }
}

#[test]
fn test_unknown_mood_for_every_engine() {
    let ctx = ctx();
    for engine in ENGINES {
        let result = generate(&ctx, engine, &opts("melancholy"));
        assert!(matches!(result, Err(Error::UnknownMood(ref key)) if key == "melancholy"));
    }
}

#[test]
fn test_end_to_end_happy() {
    let ctx = ctx();
    for engine in ENGINES {
        let recipe = generate(&ctx, engine, &opts("happy")).unwrap();
        assert!(!recipe.ingredients.is_empty());
        let sum: f64 = recipe.ingredients.iter().map(|i| i.amount_ml.max(0.0)).sum();
        assert_eq!(recipe.total_ml, sum.round());
        assert!(Method::ALL.contains(&recipe.method));
        assert_eq!(recipe.mood, "happy");
    }
}

#[test]
fn test_classic_happy_is_a_sour() {
    let recipe = generate(&ctx(), EngineKind::Classic, &opts("happy")).unwrap();
    assert_eq!(recipe.template, "sour");
    assert_eq!(recipe.method, Method::Shake);
    assert_eq!(recipe.glass, "coupe");
    assert_eq!(recipe.ice.as_deref(), Some("strain_no_ice_or_fresh_ice"));
    assert_eq!(recipe.total_ml, 95.0);
    assert_eq!(recipe.estimated_calories, Some(57));
    // rum base picks up the rum garnish rule
    assert_eq!(recipe.garnish, vec!["青柠角".to_string()]);
}

#[test]
fn test_creative_naming_shape() {
    let ctx = ctx();
    let naming = ctx.rules().naming_v2.clone().unwrap();
    for mood in ["happy", "calm", "romantic", "tired"] {
        for na in [false, true] {
            let recipe = generate(&ctx, EngineKind::Creative, &opts(mood).with_na(na)).unwrap();
            let (zh, rest) = recipe.name.split_once(" (").unwrap();
            let en = rest.strip_suffix(')').unwrap();
            assert!(!zh.is_empty() && !en.is_empty());
            assert!(!zh.starts_with(is_connector) && !zh.ends_with(is_connector), "{}", zh);
            assert!(zh.chars().count() <= naming.max_len * 2, "{}", zh);
            assert!(recipe.story.contains("EN:"));
            if na {
                for term in &naming.na_banned_terms {
                    assert!(!zh.contains(term.as_str()), "{} contains {}", zh, term);
                }
            }
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    let ctx = ctx();
    for engine in ENGINES {
        let a = generate(&ctx, engine, &opts("romantic")).unwrap();
        let b = generate(&ctx, engine, &opts("romantic")).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_allergy_excludes_ingredient() {
    let ctx = ctx();
    let mut o = opts("happy");
    o.allergies = vec!["Nuts".to_string()];
    for engine in [EngineKind::Classic, EngineKind::Creative] {
        let recipe = generate(&ctx, engine, &o).unwrap();
        assert!(!recipe.has_ingredient_named("杏仁糖浆"), "{:?}", engine);
    }
}

#[test]
fn test_inventory_injection_and_idempotence() {
    let ctx = ctx();
    let o = opts("calm").with_inventory(vec!["soda water".to_string(), "yuzu".to_string()], true);
    let recipe = generate(&ctx, EngineKind::Classic, &o).unwrap();
    assert!(recipe.has_ingredient_named("苏打水"));
    assert!(recipe.has_ingredient_named("yuzu"));

    let again = finalize(
        recipe.clone(),
        ctx.catalog(),
        &ctx.rules().dilution_by_method,
        &FinalizeOptions::from(&o),
    );
    assert_eq!(again.ingredients.len(), recipe.ingredients.len());
    assert_eq!(again.total_ml, recipe.total_ml);
    assert_eq!(again.estimated_abv, recipe.estimated_abv);
}

#[test]
fn test_corpus_na_prefers_alcohol_free_recipe() {
    let recipe = generate(&ctx(), EngineKind::Corpus, &opts("happy").with_na(true)).unwrap();
    assert_eq!(recipe.template, "corpus_adapt");
    assert_eq!(recipe.method, Method::Build);
    assert_eq!(recipe.glass, "highball");
    assert!(recipe.name.ends_with(" · 语料改编"));
}

#[test]
fn test_context_shared_across_threads() {
    let ctx = ctx();
    let recipes: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = ENGINES
            .iter()
            .map(|&engine| {
                let ctx = &ctx;
                s.spawn(move || generate(ctx, engine, &opts("tired")).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (engine, recipe) in ENGINES.iter().zip(&recipes) {
        assert_eq!(recipe, &generate(&ctx, *engine, &opts("tired")).unwrap());
    }
}
