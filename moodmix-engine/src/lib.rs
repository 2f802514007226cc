//! moodmix-engine: mood-driven cocktail recipe generation
//!
//! Three engines build a [`Recipe`] from a mood and taste preferences:
//!
//! - [`classic`]: template + role selectors, rule-driven tuning
//! - [`creative`]: intent/strategy/envelope with motifs and micro-tuning
//! - [`corpus`]: nearest reference recipe, lightly adapted
//!
//! [`generate`] runs one of them and then [`finalize::finalize`].

pub mod abv;
pub mod classic;
pub mod constraints;
pub mod context;
pub mod corpus;
pub mod creative;
pub mod finalize;
pub mod fusion;
pub mod naming;
pub mod options;
pub mod slots;

pub use context::EngineContext;
pub use finalize::{finalize, FinalizeOptions};
pub use options::{EngineKind, GenerateOptions, Intensity, MicroTuneOptions};

use moodmix_common::{Recipe, Result};
use tracing::debug;

/// Run an engine followed by finalization
pub fn generate(ctx: &EngineContext, engine: EngineKind, opts: &GenerateOptions) -> Result<Recipe> {
    let recipe = match engine {
        EngineKind::Classic => classic::generate(ctx, opts)?,
        EngineKind::Creative => creative::generate(ctx, opts)?,
        EngineKind::Corpus => corpus::generate(ctx, opts)?,
    };
    debug!(
        "{} engine produced '{}' ({} ingredients)",
        engine.as_str(),
        recipe.name,
        recipe.ingredients.len()
    );
    Ok(finalize(
        recipe,
        ctx.catalog(),
        &ctx.rules().dilution_by_method,
        &FinalizeOptions::from(opts),
    ))
}
