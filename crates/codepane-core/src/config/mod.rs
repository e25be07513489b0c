use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::{defaults, endpoints, paths};
use crate::error::CodepaneError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ollama: OllamaSettings,
    pub chat: ChatSettings,
    pub explorer: ExplorerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Sent ahead of every prompt when set.
    pub system_prompt: Option<String>,
    pub max_messages: usize,
    /// Turn fenced code in replies into project files.
    pub apply_code_blocks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    /// Extension given to new files created without one.
    pub default_file_type: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::OLLAMA_BASE_URL.to_string(),
            model: defaults::MODEL.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_messages: defaults::MAX_MESSAGES,
            apply_code_blocks: true,
        }
    }
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            default_file_type: defaults::FILE_TYPE.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load from the user config file, falling back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring {}: {e}", config_path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, CodepaneError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CodepaneError::Config(e.to_string()))
    }

    pub fn save(&self) -> Result<(), CodepaneError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CodepaneError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CodepaneError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Inference base URL: the environment override wins over the file.
    pub fn ollama_base_url(&self) -> String {
        std::env::var(endpoints::OLLAMA_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.ollama.base_url.clone())
    }
}
