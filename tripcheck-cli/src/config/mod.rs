//! Configuration module for tripcheck
//!
//! This module handles:
//! - Project-level configuration (tripcheck.toml)
//! - User-level configuration (API keys, preferred backend)

mod project_config;
mod user_config;

pub use project_config::{
    load_project_config, AiSettings, ProjectConfig, ReportConfig, JSON_CONFIG_FILE,
    TOML_CONFIG_FILE,
};
pub use user_config::UserConfig;
