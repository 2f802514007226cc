//! Naming subsystem
//!
//! Deterministic: every choice is a seeded pick over rule-table pools (see
//! [`seed`]), so the same generation facts and salt always give the same
//! name.
//!
//! - [`classic`]: weighted `naming_v2` names and the simplified fallback
//! - [`bilingual`]: creative `ZH (EN)` titles with a tasting narrative
//! - [`style`]: taste-style labels
//! - [`assemble`]: template filling and sanitizing

pub mod assemble;
pub mod bilingual;
pub mod classic;
pub mod seed;
pub mod style;

pub use assemble::{is_connector, CONNECTOR_CHARS};
pub use bilingual::{generate_bilingual, BilingualName, CreativeNameInput};
pub use classic::{detect_base_spirit, generate_name, generate_simple_name, ClassicNameInput};
