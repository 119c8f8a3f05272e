use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::style::StyleMode;

/// Models tried in order when no model is configured.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &["llama3.2", "llama3.1", "qwen2.5", "mistral"];

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ChatConfig {
    pub backend: BackendConfig,
    pub chat: ChatSection,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub model: Option<String>,
    pub preferred_models: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatSection {
    /// `auto`, `casual`, `concise` or `pro`.
    pub style: String,
    /// Number of recent user messages the style classifier looks at.
    pub style_window: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_file: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/api/chat".into(),
            model: None,
            preferred_models: DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            timeout_secs: 120,
        }
    }
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            style: "auto".into(),
            style_window: 3,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_file: ".chat_memory.json".into(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        // Anything chattier than warn interleaves with the conversation.
        Self {
            level: "warn".into(),
        }
    }
}

/// Returns `~/.memchat/`, or `./.memchat/` when no home directory is known.
pub fn default_memchat_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memchat")
}

/// Returns the default config file path: `~/.memchat/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memchat_dir().join("config.toml")
}

impl ChatConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ChatConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (OLLAMA_API_URL, OLLAMA_MODEL, CHAT_STYLE,
    /// CHAT_MEMORY_FILE, MEMCHAT_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OLLAMA_API_URL") {
            self.backend.url = val;
        }
        if let Ok(val) = std::env::var("OLLAMA_MODEL") {
            if !val.trim().is_empty() {
                self.backend.model = Some(val.trim().to_string());
            }
        }
        if let Ok(val) = std::env::var("CHAT_STYLE") {
            self.chat.style = val;
        }
        if let Ok(val) = std::env::var("CHAT_MEMORY_FILE") {
            self.storage.memory_file = val;
        }
        if let Ok(val) = std::env::var("MEMCHAT_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// The style the session starts in. Unknown labels fall back to `auto`.
    pub fn style_seed(&self) -> StyleMode {
        match self.chat.style.parse() {
            Ok(mode) => mode,
            Err(e) => {
                warn!(style = %self.chat.style, "{e}, falling back to auto");
                StyleMode::Auto
            }
        }
    }

    /// Resolve the memory file path, expanding `~` if needed.
    pub fn resolved_memory_path(&self) -> PathBuf {
        expand_tilde(&self.storage.memory_file)
    }

    /// Base URL of the Ollama server, derived from the chat endpoint.
    pub fn backend_base_url(&self) -> String {
        let url = self.backend.url.trim_end_matches('/');
        url.strip_suffix("/api/chat").unwrap_or(url).to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
