//! Bootstrap configuration loading and data directory resolution
//!
//! Configuration is minimal and read once at start-up:
//! - **TOML bootstrap**: data directory, logging level, generation defaults
//! - **Data directory**: the four catalog documents the engines consume
//!
//! # Data Directory Priority
//!
//! 1. Command-line argument (`--data-dir`)
//! 2. Environment variable (`MOODMIX_DATA_DIR`)
//! 3. TOML configuration file (`data_dir`)
//! 4. Compiled default (`./data`)

use crate::units::Unit;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MOODMIX_DATA_DIR";

/// Compiled default data directory
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const INGREDIENTS_FILE: &str = "ingredients.json";
pub const MOODS_FILE: &str = "moods.json";
pub const RULES_FILE: &str = "generation_rules.json";
pub const CORPUS_FILE: &str = "recipes_corpus.json";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the catalog documents
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults applied when the command line leaves an option out
    #[serde(default)]
    pub defaults: GenerationDefaults,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Generation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationDefaults {
    /// Engine name (classic, creative, corpus)
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Display unit
    #[serde(default)]
    pub unit: Unit,

    /// Naming seed salt; today's date when absent
    #[serde(default)]
    pub seed_salt: Option<String>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            unit: Unit::default(),
            seed_salt: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_engine() -> String {
    "classic".to_string()
}

impl TomlConfig {
    /// Parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the configuration, falling back to defaults
    ///
    /// `explicit` is the `--config` argument; without it the per-user
    /// location from [`default_config_path`] is tried. A missing or
    /// malformed file is logged and ignored.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file found, using defaults");
                    return Self::default();
                }
            },
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Per-user configuration file location (`<config_dir>/moodmix/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodmix").join("config.toml"))
}

/// Resolve the data directory following the priority order
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.data_dir {
        return path.clone();
    }

    // Priority 4: Compiled default
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Locations of the four catalog documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub ingredients: PathBuf,
    pub moods: PathBuf,
    pub rules: PathBuf,
    pub corpus: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ingredients: dir.join(INGREDIENTS_FILE),
            moods: dir.join(MOODS_FILE),
            rules: dir.join(RULES_FILE),
            corpus: dir.join(CORPUS_FILE),
        }
    }
}

/// Read an optional catalog document
///
/// Returns `Ok(None)` when the file does not exist. Other I/O failures are
/// returned so callers can decide whether to degrade.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}
