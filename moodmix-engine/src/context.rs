//! Engine context
//!
//! The catalog, rule set and recipe corpus are loaded once at start-up into
//! an [`EngineContext`] that every engine call borrows. Nothing mutates it
//! after construction, so one context can serve any number of concurrent
//! callers.

use moodmix_common::catalog::normalize::parse_document;
use moodmix_common::config::{read_optional, DataPaths};
use moodmix_common::recipe::parse_corpus;
use moodmix_common::{CatalogIndex, CorpusRecipe, Error, MoodProfile, Result, RuleSet};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Immutable, shared generation inputs
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    catalog: CatalogIndex,
    rules: RuleSet,
    corpus: Vec<CorpusRecipe>,
}

/// Read a catalog document, degrading to an empty array
fn load_document(label: &str, path: &Path) -> Value {
    match read_optional(path) {
        Ok(Some(text)) => parse_document(label, &text),
        Ok(None) => {
            warn!("{} catalog {} not found, using empty catalog", label, path.display());
            Value::Array(Vec::new())
        }
        Err(e) => {
            warn!("Cannot read {} catalog {}: {}", label, path.display(), e);
            Value::Array(Vec::new())
        }
    }
}

impl EngineContext {
    pub fn new(catalog: CatalogIndex, rules: RuleSet, corpus: Vec<CorpusRecipe>) -> Self {
        Self { catalog, rules, corpus }
    }

    /// Load the four catalog documents from a data directory
    ///
    /// Missing or malformed ingredient, mood and corpus documents degrade to
    /// empty data with a warning. A malformed rule document is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let paths = DataPaths::in_dir(data_dir);

        let ingredients = load_document("ingredient", &paths.ingredients);
        let moods = load_document("mood", &paths.moods);
        let catalog = CatalogIndex::from_documents(&ingredients, &moods);

        let rules = RuleSet::load(&paths.rules)?;

        let corpus = match read_optional(&paths.corpus) {
            Ok(Some(text)) => parse_corpus(&text),
            Ok(None) => {
                warn!("Recipe corpus {} not found", paths.corpus.display());
                Vec::new()
            }
            Err(e) => {
                warn!("Cannot read recipe corpus {}: {}", paths.corpus.display(), e);
                Vec::new()
            }
        };
        info!("Corpus loaded: {} recipes", corpus.len());

        Ok(Self::new(catalog, rules, corpus))
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn corpus(&self) -> &[CorpusRecipe] {
        &self.corpus
    }

    /// Mood by key, or [`Error::UnknownMood`]
    pub fn mood(&self, key: &str) -> Result<&MoodProfile> {
        self.catalog
            .mood(key)
            .ok_or_else(|| Error::UnknownMood(key.to_string()))
    }

    /// Mood grid: every mood including the appended fallbacks, in catalog order
    pub fn moods(&self) -> &[MoodProfile] {
        self.catalog.moods()
    }
}
