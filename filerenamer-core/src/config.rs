use crate::convention::FilesystemConvention;
use crate::rules::DEFAULT_DATE_FORMAT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".filerenamer";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// How the planner decides whether the filesystem folds case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaseSetting {
    /// Probe the filesystem holding the files
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

impl CaseSetting {
    /// Fixed convention, or `None` when it must be detected
    pub fn convention(self) -> Option<FilesystemConvention> {
        match self {
            Self::Auto => None,
            Self::Sensitive => Some(FilesystemConvention::CaseSensitive),
            Self::Insensitive => Some(FilesystemConvention::CaseInsensitive),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default preview format: "table", "summary" or "none"
    #[serde(default = "default_preview")]
    pub preview_format: String,

    /// Default strftime format for creation-date names
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether directories are walked recursively by default
    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub case_sensitivity: CaseSetting,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preview_format: default_preview(),
            date_format: default_date_format(),
            recursive: false,
            case_sensitivity: CaseSetting::Auto,
            use_color: None,
        }
    }
}

fn default_preview() -> String {
    "table".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Config {
    /// Load config from .filerenamer/config.toml, then the user config directory
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        if let Some(config_path) = Self::user_config_path() {
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// `<config dir>/filerenamer/config.toml` for the current user
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("filerenamer").join(CONFIG_FILE))
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
