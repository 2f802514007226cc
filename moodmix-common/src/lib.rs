//! # Moodmix Common Library
//!
//! Shared data layer for the moodmix recipe generator:
//! - Error taxonomy (Error enum)
//! - Bootstrap configuration loading
//! - Flavor model (7-dimension flavor vectors, taste sliders)
//! - Catalog normalization and lookup indexes
//! - Validated generation rule set
//! - Flavor similarity search
//! - Recipe value types and display units

pub mod catalog;
pub mod config;
pub mod error;
pub mod flavor;
pub mod recipe;
pub mod rules;
pub mod similarity;
pub mod units;

pub use catalog::{CatalogIndex, Category, Ingredient, MoodProfile};
pub use error::{Error, Result};
pub use flavor::{FlavorKey, FlavorVector, PartialFlavor, TasteInput};
pub use recipe::{CorpusIngredient, CorpusRecipe, Method, Recipe, RecipeIngredient};
pub use rules::{RuleSet, Strategy};
pub use units::Unit;
