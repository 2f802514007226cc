//! Ingredient and mood catalogs
//!
//! - `model`: canonical record types
//! - `normalize`: tolerant conversion from raw JSON records
//! - `index`: lookup indexes over the normalized catalog

pub mod index;
pub mod model;
pub mod normalize;

pub use index::CatalogIndex;
pub use model::{AbvPreference, Category, Ingredient, MoodProfile};
