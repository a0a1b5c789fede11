//! Per-user settings: API keys and the preferred LLM backend
//!
//! Read from `<config dir>/tripcheck/config.toml`, then overridden by
//! `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` and `OLLAMA_MODEL`. Project
//! settings never hold keys.

use crate::ai::LlmBackend;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

const USER_CONFIG_TEMPLATE: &str = r#"# tripcheck user configuration
# Environment variables take priority over this file.

[ai]
# openai (default), anthropic, or ollama (local, no key)
# backend = "openai"

# https://platform.openai.com/api-keys
# openai_api_key = "sk-..."

# https://console.anthropic.com/settings/keys
# anthropic_api_key = "sk-ant-..."

# ollama_model = "llama3.1:8b"
"#;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: UserAiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserAiConfig {
    /// Preferred backend name, parsed with `LlmBackend::from_str`
    pub backend: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub ollama_model: Option<String>,
}

impl UserConfig {
    /// File settings with environment overrides applied on top
    pub fn load() -> Result<Self> {
        let mut config = Self::user_config_path()
            .filter(|p| p.is_file())
            .map(|p| Self::read(&p))
            .unwrap_or_default();

        let from_env = UserConfig {
            ai: UserAiConfig {
                backend: None,
                openai_api_key: env_value(LlmBackend::OpenAi.env_key()),
                anthropic_api_key: env_value(LlmBackend::Anthropic.env_key()),
                ollama_model: env_value(LlmBackend::Ollama.env_key()),
            },
        };
        config.merge(from_env);
        Ok(config)
    }

    /// Parse one config file. A broken file warns and counts as empty.
    fn read(path: &std::path::Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(toml::from_str::<UserConfig>(&content)?));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring user config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tripcheck").join("config.toml"))
    }

    /// Overlay `other` on this config; fields set in `other` win
    fn merge(&mut self, other: UserConfig) {
        let UserAiConfig {
            backend,
            openai_api_key,
            anthropic_api_key,
            ollama_model,
        } = other.ai;
        let ai = &mut self.ai;
        ai.backend = backend.or(ai.backend.take());
        ai.openai_api_key = openai_api_key.or(ai.openai_api_key.take());
        ai.anthropic_api_key = anthropic_api_key.or(ai.anthropic_api_key.take());
        ai.ollama_model = ollama_model.or(ai.ollama_model.take());
    }

    pub fn backend(&self) -> Option<&str> {
        self.ai.backend.as_deref()
    }

    /// Configured key for a backend, if any
    pub fn api_key(&self, backend: LlmBackend) -> Option<&str> {
        match backend {
            LlmBackend::OpenAi => self.ai.openai_api_key.as_deref(),
            LlmBackend::Anthropic => self.ai.anthropic_api_key.as_deref(),
            LlmBackend::Ollama => None,
        }
        .filter(|k| !k.trim().is_empty())
    }

    /// Hosted backends that have a key
    pub fn keyed_backends(&self) -> Vec<LlmBackend> {
        [LlmBackend::OpenAi, LlmBackend::Anthropic]
            .into_iter()
            .filter(|b| self.api_key(*b).is_some())
            .collect()
    }

    /// Write the commented template unless a config already exists.
    /// Returns the config path either way.
    pub fn init_user_config() -> Result<PathBuf> {
        let path = Self::user_config_path().context("Could not determine config directory")?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, USER_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
