use draftwire_engine::model::{BlockMode, ModelOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Block representation used when building documents from text
    pub block_mode: BlockMode,
    /// Separator placed between blocks when rendering plain text
    pub plain_text_delimiter: String,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_mode: BlockMode::default(),
            plain_text_delimiter: "\n".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Config at `config_path`, or `None` when no file exists there
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Loaded config, or the defaults when no file exists
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from_path(Self::config_path())
    }

    pub fn load_or_default_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/draftwire");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            block_mode: self.block_mode,
        }
    }
}
