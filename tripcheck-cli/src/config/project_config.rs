//! Project-level configuration support
//!
//! Loads per-directory configuration from `tripcheck.toml` or
//! `.tripcheckrc.json` in the working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # tripcheck.toml
//!
//! [report]
//! company_name = "Camanda"
//! inspector_name = "Prof. E"
//! format = "html"
//! comments = "Fleet vehicle, serviced monthly."
//!
//! [ai]
//! backend = "openai"   # openai, anthropic, ollama
//! model = "gpt-4o"
//! max_tokens = 4096
//! temperature = 0.2
//! ```

use crate::ai::{AiConfig, LlmBackend};
use crate::models::ReportOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const TOML_CONFIG_FILE: &str = "tripcheck.toml";
pub const JSON_CONFIG_FILE: &str = ".tripcheckrc.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Report presentation
    #[serde(default)]
    pub report: ReportConfig,

    /// LLM settings for checklist generation and advice
    #[serde(default)]
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Printed in the report footer
    #[serde(default = "default_inspector_name")]
    pub inspector_name: String,

    /// Default output format (text, json, markdown, html)
    #[serde(default)]
    pub format: Option<String>,

    /// Text for the comments section
    #[serde(default)]
    pub comments: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            inspector_name: default_inspector_name(),
            format: None,
            comments: None,
        }
    }
}

fn default_company_name() -> String {
    "Camanda".to_string()
}

fn default_inspector_name() -> String {
    "Prof. E".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiSettings {
    #[serde(default)]
    pub backend: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            backend: None,
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

impl ProjectConfig {
    /// Report options with an optional mileage reading
    pub fn report_options(&self, mileage: Option<String>) -> ReportOptions {
        ReportOptions {
            company_name: self.report.company_name.clone(),
            inspector_name: self.report.inspector_name.clone(),
            mileage,
            comments: self.report.comments.clone(),
        }
    }

    /// Client settings. `backend_override` (e.g. from the user config)
    /// wins over the project file; unknown backend names fall back to the
    /// default backend with a warning.
    pub fn ai_config(&self, backend_override: Option<&str>) -> AiConfig {
        let backend = backend_override
            .or(self.ai.backend.as_deref())
            .map(|name| {
                name.parse::<LlmBackend>().unwrap_or_else(|e| {
                    warn!("{}; using {}", e, LlmBackend::default());
                    LlmBackend::default()
                })
            })
            .unwrap_or_default();

        AiConfig {
            backend,
            model: self.ai.model.clone(),
            max_tokens: self.ai.max_tokens,
            temperature: self.ai.temperature,
            json_output: false,
        }
    }
}

/// Load project configuration from `dir`.
///
/// Searches for configuration files in this order:
/// 1. `tripcheck.toml`
/// 2. `.tripcheckrc.json`
///
/// Returns default configuration if no config file is found or a file
/// fails to parse.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(TOML_CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.report.company_name, "Camanda");
        assert_eq!(config.report.inspector_name, "Prof. E");
        assert!(config.report.format.is_none());
        assert_eq!(config.ai.max_tokens, 4096);
        assert_eq!(config.ai_config(None).backend, LlmBackend::OpenAi);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[report]
company_name = "Acme Fleet"
format = "html"

[ai]
backend = "anthropic"
temperature = 0.0
"#;
        let config: ProjectConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.report.company_name, "Acme Fleet");
        // unset fields keep their defaults
        assert_eq!(config.report.inspector_name, "Prof. E");
        assert_eq!(config.report.format.as_deref(), Some("html"));

        let ai = config.ai_config(None);
        assert_eq!(ai.backend, LlmBackend::Anthropic);
        assert_eq!(ai.temperature, 0.0);
        assert_eq!(ai.max_tokens, 4096);

        assert_eq!(config.ai_config(Some("ollama")).backend, LlmBackend::Ollama);
    }

    #[test]
    fn test_unknown_backend_falls_back() {
        let config: ProjectConfig = toml::from_str("[ai]\nbackend = \"gemini\"").unwrap();
        assert_eq!(config.ai_config(None).backend, LlmBackend::OpenAi);
    }

    #[test]
    fn test_report_options() {
        let mut config = ProjectConfig::default();
        config.report.comments = Some("Checked at depot".to_string());
        let options = config.report_options(Some("42,000 km".to_string()));
        assert_eq!(options.company_name, "Camanda");
        assert_eq!(options.mileage.as_deref(), Some("42,000 km"));
        assert_eq!(options.comments.as_deref(), Some("Checked at depot"));
    }

    #[test]
    fn test_load_prefers_toml_over_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TOML_CONFIG_FILE),
            "[report]\ncompany_name = \"From TOML\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"report": {"company_name": "From JSON"}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.report.company_name, "From TOML");
    }

    #[test]
    fn test_load_falls_back_to_json_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOML_CONFIG_FILE), "not [[ valid toml").unwrap();
        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"report": {"inspector_name": "J. Doe"}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.report.inspector_name, "J. Doe");

        let empty = tempfile::tempdir().unwrap();
        let config = load_project_config(empty.path());
        assert_eq!(config.report.company_name, "Camanda");
    }
}
