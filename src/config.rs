//! Configuration management for gradchat.
//!
//! Loads configuration from ${GRADCHAT_HOME}/config.toml with sensible
//! defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

pub mod paths {
    //! Path resolution for gradchat configuration.
    //!
    //! GRADCHAT_HOME resolution order:
    //! 1. GRADCHAT_HOME environment variable (if set)
    //! 2. ~/.config/gradchat (default)

    use std::path::PathBuf;

    /// Returns the gradchat home directory.
    ///
    /// Checks GRADCHAT_HOME env var first, falls back to ~/.config/gradchat
    pub fn gradchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("GRADCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("gradchat"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        gradchat_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional Gradio space base URL (for test rigs or self-hosted spaces)
    pub base_url: Option<String>,

    /// Convert `* item` / `1. item` reply lines into list markup
    pub lists: bool,

    /// Show a placeholder bot message while a request is in flight
    pub waiting: bool,
}

impl Config {
    const DEFAULT_LISTS: bool = true;
    const DEFAULT_WAITING: bool = true;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            lists: Self::DEFAULT_LISTS,
            waiting: Self::DEFAULT_WAITING,
        }
    }
}
