//! Generate command - trip description to checklist JSON

use super::{ai_client, spinner};
use crate::ai::prompts;
use crate::config::load_project_config;
use crate::session::{InspectionSession, SessionEvent};
use crate::sources::{AiChecklistSource, ChecklistSource};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(
    dir: &Path,
    description: Option<String>,
    output: Option<&Path>,
    backend: Option<&str>,
) -> Result<()> {
    let description = match description.filter(|d| !d.trim().is_empty()) {
        Some(d) => d,
        None => {
            let example = prompts::random_trip_prompt();
            eprintln!("{} {}", style("Using example trip:").dim(), example);
            example.to_string()
        }
    };

    let project = load_project_config(dir);
    let client = ai_client(&project, backend, true)?;
    let source = AiChecklistSource::new(client);

    let pb = spinner("Generating checklist...");
    let result = source.generate(&description);
    pb.finish_and_clear();
    let checklist = result.context("Checklist generation failed")?;

    // An empty checklist means the request was not about vehicles
    InspectionSession::new().apply(SessionEvent::ChecklistGenerated(checklist.clone()))?;

    let json = serde_json::to_string_pretty(&checklist)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Checklist with {} groups, {} items written to {}",
                style("✓").green(),
                style(checklist.groups.len()).cyan(),
                style(checklist.total_items()).cyan(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
