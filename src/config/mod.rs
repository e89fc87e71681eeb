//! # Configuration
//!
//! Runtime settings live in a small TOML file:
//!
//! ```toml
//! [game]
//! world_file = "data/manor.json"
//! prompt = "Make your choice"
//! show_help_hint = true
//!
//! [logging]
//! level = "info"
//! file = "manor.log"
//! ```
//!
//! Precedence: CLI args > config file > defaults.
//!
//! ```rust,no_run
//! use manor::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("World: {}", config.game.world_file);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::controller::DEFAULT_PROMPT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Path of the JSON world file to play.
    pub world_file: String,
    /// Text shown before every input read.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Print the `help` hint after the opening text.
    #[serde(default = "default_show_help_hint")]
    pub show_help_hint: bool,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_show_help_hint() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Parse `level`, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    /// Like [`Config::load`], but a missing file yields `Ok(None)` so the
    /// caller can fall back to defaults. Unreadable or malformed files are
    /// still errors.
    pub async fn load_if_present(path: &str) -> Result<Option<Self>> {
        match fs::try_exists(path).await {
            Ok(false) => Ok(None),
            Ok(true) => Self::load(path).await.map(Some),
            Err(e) => Err(anyhow!("Failed to stat config file {}: {}", path, e)),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the default configuration to `path`.
    pub async fn create_default(path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;
        Ok(())
    }

    /// World file to play: the CLI value when given, otherwise the configured one.
    pub fn world_path(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .unwrap_or_else(|| self.game.world_file.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            game: GameConfig {
                world_file: "data/manor.json".to_string(),
                prompt: default_prompt(),
                show_help_hint: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}
