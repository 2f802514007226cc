//! Common error types for moodmix

use thiserror::Error;

/// Common result type for moodmix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the moodmix crates
///
/// Only `UnknownMood` and `EmptyCorpus` can fail a generation call. Every
/// other anomaly in catalog data degrades to neutral defaults instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Mood key absent from the mood catalog
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Recipe corpus has no entries to adapt
    #[error("Empty corpus recipes")]
    EmptyCorpus,

    /// Rule document failed to parse or validate
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error (wraps toml::de::Error)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
