//! Init command - create a project config file

use crate::config::TOML_CONFIG_FILE;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# tripcheck configuration

[report]
# Printed in the report header
company_name = "Camanda"

# Printed in the report footer
inspector_name = "Prof. E"

# Default output format (text, json, html, markdown)
# format = "html"

# Text for the "Comments & Analysis" section
# comments = "No additional comments or analysis provided for this inspection."

[ai]
# LLM backend (openai, anthropic, ollama)
# backend = "openai"

# Model used for checklist generation and advice
# model = "gpt-4o"

# max_tokens = 4096
# temperature = 0.2
"#;

/// Run the init command
pub fn run(dir: &Path) -> Result<()> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", dir.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(TOML_CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Generate a checklist", style("tripcheck generate \"<your trip>\" -o checklist.json").cyan());
    println!("  {} Score your answers", style("tripcheck score --checklist checklist.json --answers answers.json").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_project_config, ProjectConfig};

    #[test]
    fn test_default_config_parses() {
        let config: ProjectConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.report.company_name, "Camanda");
        assert!(config.ai.backend.is_none());
    }

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        let path = dir.path().join(TOML_CONFIG_FILE);
        assert!(path.exists());

        std::fs::write(&path, "[report]\ncompany_name = \"Kept\"\n").unwrap();
        run(dir.path()).unwrap();
        assert_eq!(load_project_config(dir.path()).report.company_name, "Kept");
    }
}
