//! Configuration resolution tests
//!
//! Tests touching MOODMIX_DATA_DIR are marked #[serial] so they never run
//! in parallel with each other.

use moodmix_common::config::{
    read_optional, resolve_data_dir, TomlConfig, DATA_DIR_ENV, DEFAULT_DATA_DIR,
};
use serial_test::serial;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn toml_with_dir(dir: &str) -> TomlConfig {
    TomlConfig {
        data_dir: Some(PathBuf::from(dir)),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    std::env::set_var(DATA_DIR_ENV, "/env/data");
    let resolved = resolve_data_dir(Some(Path::new("/cli/data")), &toml_with_dir("/toml/data"));
    assert_eq!(resolved, PathBuf::from("/cli/data"));
    std::env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(DATA_DIR_ENV, "/env/data");
    let resolved = resolve_data_dir(None, &toml_with_dir("/toml/data"));
    assert_eq!(resolved, PathBuf::from("/env/data"));
    std::env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_toml_used_without_cli_or_env() {
    std::env::remove_var(DATA_DIR_ENV);
    let resolved = resolve_data_dir(None, &toml_with_dir("/toml/data"));
    assert_eq!(resolved, PathBuf::from("/toml/data"));
}

#[test]
#[serial]
fn test_compiled_default_last() {
    std::env::remove_var(DATA_DIR_ENV);
    let resolved = resolve_data_dir(None, &TomlConfig::default());
    assert_eq!(resolved, PathBuf::from(DEFAULT_DATA_DIR));
}

#[test]
fn test_load_or_default_reads_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_dir = \"/x\"\n[logging]\nlevel = \"warn\"\n").unwrap();

    let config = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.data_dir, Some(PathBuf::from("/x")));
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_load_or_default_tolerates_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = TomlConfig::load_or_default(Some(&temp_dir.path().join("absent.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_load_or_default_tolerates_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_dir = [unclosed").unwrap();

    assert!(TomlConfig::load(&path).is_err());
    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());
}

#[test]
fn test_read_optional() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("moods.json");
    assert_eq!(read_optional(&path).unwrap(), None);

    std::fs::write(&path, "[]").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[]"));
}
