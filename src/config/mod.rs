//! Configuration system for btquill.
//!
//! This module provides the configuration structure with sensible defaults and
//! support for serialization/deserialization via serde. Configuration is read
//! from a TOML file; any missing field falls back to its default.
//!
//! # Example
//!
//! ```
//! use btquill::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.undo_limit, 50);
//! assert!(config.enforce_read_only);
//!
//! let custom = Config {
//!     undo_limit: 200,
//!     ..Config::default()
//! };
//! assert_eq!(custom.undo_limit, 200);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the graph editor model.
///
/// # Fields
///
/// * `undo_limit` - Maximum number of undoable steps to keep, 0 for unlimited (default: 50)
/// * `system_clipboard` - Copy and paste through the OS clipboard (default: false)
/// * `enforce_read_only` - Reject edits while the document is read-only (default: true)
/// * `child_spacing` - Vertical offset of a new child below its parent (default: 80.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of undoable steps to keep
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Copy and paste through the OS clipboard instead of an in-process slot
    #[serde(default)]
    pub system_clipboard: bool,

    /// Reject structural edits while the document is read-only
    #[serde(default = "default_enforce_read_only")]
    pub enforce_read_only: bool,

    /// Vertical canvas offset of a newly created child below its parent
    #[serde(default = "default_child_spacing")]
    pub child_spacing: f32,
}

fn default_undo_limit() -> usize {
    50
}

fn default_enforce_read_only() -> bool {
    true
}

fn default_child_spacing() -> f32 {
    80.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_limit: default_undo_limit(),
            system_clipboard: false,
            enforce_read_only: default_enforce_read_only(),
            child_spacing: default_child_spacing(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/btquill/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("btquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(%err, path = %path.display(), "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
