use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default status-line refresh interval in milliseconds (10 FPS)
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Default bar glyph width
pub const DEFAULT_BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub status: StatusConfig,

    #[serde(default)]
    pub bar: BarConfig,
}

/// Status-line settings shared by all widgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Minimum milliseconds between terminal refreshes
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Progress bar rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarConfig {
    /// Glyph width of the bar body
    #[serde(default = "default_bar_width")]
    pub width: usize,

    /// Fill character for completed steps
    #[serde(default = "default_fill")]
    pub fill: char,

    /// Head character at the fill boundary
    #[serde(default = "default_head")]
    pub head: char,

    /// Character for remaining steps
    #[serde(default = "default_empty")]
    pub empty: char,

    /// Color the fill when the sink is interactive
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_bar_width() -> usize {
    DEFAULT_BAR_WIDTH
}

fn default_fill() -> char {
    '='
}

fn default_head() -> char {
    '>'
}

fn default_empty() -> char {
    '-'
}

fn default_color() -> bool {
    true
}

impl Default for StatusConfig {
    fn default() -> Self {
        StatusConfig {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        BarConfig {
            width: default_bar_width(),
            fill: default_fill(),
            head: default_head(),
            empty: default_empty(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".itermon").join("config.toml"))
    }
}
