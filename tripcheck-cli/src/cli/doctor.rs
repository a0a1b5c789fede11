//! Doctor command - check environment

use crate::ai::{AiClient, LlmBackend};
use crate::config::{load_project_config, UserConfig, JSON_CONFIG_FILE, TOML_CONFIG_FILE};
use crate::reporters::OutputFormat;
use anyhow::Result;
use std::path::Path;
use std::str::FromStr;

pub fn run(dir: &Path) -> Result<()> {
    println!("🩺 tripcheck Doctor\n");

    let mut problems = 0;

    // Project config
    let toml_path = dir.join(TOML_CONFIG_FILE);
    let json_path = dir.join(JSON_CONFIG_FILE);
    if toml_path.exists() || json_path.exists() {
        let project = load_project_config(dir);
        println!("✓ Project config: found");
        if let Some(format) = project.report.format.as_deref() {
            if OutputFormat::from_str(format).is_err() {
                println!("✗ Default report format '{}' is not valid", format);
                problems += 1;
            }
        }
    } else {
        println!("○ Project config: none (run `tripcheck init` to create one)");
    }

    // AI providers (optional - scoring and rule-based reports work offline)
    let user = UserConfig::load()?;
    let hosted: Vec<&str> = user
        .keyed_backends()
        .into_iter()
        .map(|b| b.display_name())
        .collect();
    let ollama = AiClient::ollama_available();

    if hosted.is_empty() && !ollama {
        println!("○ AI providers: none configured");
        println!("  Set OPENAI_API_KEY or ANTHROPIC_API_KEY, or run Ollama locally,");
        println!("  to generate checklists and AI advice");
    } else {
        let mut providers = hosted;
        if ollama {
            providers.push(LlmBackend::Ollama.display_name());
        }
        println!(
            "✓ AI providers: {} (checklist generation enabled)",
            providers.join(", ")
        );
    }

    if problems == 0 {
        println!("\n✅ All checks passed!");
    } else {
        println!("\n⚠️  {} problem(s) found", problems);
    }
    Ok(())
}
