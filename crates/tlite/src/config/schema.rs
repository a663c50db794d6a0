//! Configuration schema definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Display settings
    pub display: DisplayConfig,
    /// Session persistence settings
    pub session: SessionConfig,
    /// Keymap customizations
    pub keymap: KeymapConfig,
}

/// Display-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show row numbers in the grid gutter
    pub show_row_numbers: bool,
    /// Minimum column width
    pub min_column_width: u16,
    /// Maximum column width
    pub max_column_width: u16,
    /// Text shown for NULL values
    pub null_indicator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: true,
            min_column_width: 3,
            max_column_width: 40,
            null_indicator: "NULL".to_string(),
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Restore the last database and table on startup
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

/// Keymap customizations: key string -> action name, e.g.
/// `"ctrl+o" = "open_database"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeymapConfig {
    pub custom: HashMap<String, String>,
}
