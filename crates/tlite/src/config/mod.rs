//! Configuration module for tlite.
//!
//! Handles loading and managing configuration from:
//! - Default values
//! - Config file (~/.config/tlite/config.toml)
//! - Environment variables

mod keymap;
mod schema;

pub use keymap::{Action, KeyBinding, Keymap};
pub use schema::{Config, DisplayConfig, KeymapConfig, SessionConfig};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the config directory path.
///
/// Checks `TLITE_CONFIG_DIR` environment variable first, then falls back
/// to the system default (~/.config/tlite on Linux/macOS).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TLITE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("tlite"))
}

/// Returns the default config file path (~/.config/tlite/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    if let Some(path) = config_path() {
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }
    }
    Ok(Config::default())
}

/// Load configuration from a specific path
pub fn load_config_from(path: &PathBuf) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_consistent() {
        if let (Some(dir), Some(cfg)) = (config_dir(), config_path()) {
            assert!(cfg.starts_with(&dir));
            assert!(cfg.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nshow_row_numbers = false\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(!config.display.show_row_numbers);
    }

    #[test]
    fn test_load_config_from_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml {{{").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}
