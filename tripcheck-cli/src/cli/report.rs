//! Report and advise commands

use super::{ai_client, load_inputs, spinner, InspectionInputs};
use crate::config::{load_project_config, ProjectConfig};
use crate::models::{FullChecklist, InspectionReport, SubmittedAnswers};
use crate::reporters::{self, OutputFormat};
use crate::session::{InspectionSession, InspectorDetails, SessionEvent, SessionState};
use crate::sources::{AiAdvisor, NarrativeSource, RuleBasedAdvisor};
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Driver details as typed on the command line
pub struct Driver<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub plate: &'a str,
}

pub fn run(
    dir: &Path,
    inputs: &InspectionInputs,
    driver: Driver<'_>,
    mileage: Option<String>,
    comments: Option<String>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let project = load_project_config(dir);
    let format = OutputFormat::from_str(
        format
            .or(project.report.format.as_deref())
            .unwrap_or("text"),
    )?;

    let details = InspectorDetails::new(driver.name, driver.email, driver.plate)?;
    let (checklist, answers) = load_inputs(&inputs.checklist, &inputs.answers)?;

    let mut session = InspectionSession::new();
    let inspection_id = session.id();
    session.apply(SessionEvent::ChecklistGenerated(checklist))?;
    session.apply(SessionEvent::DetailsSubmitted(details))?;
    session.apply(SessionEvent::BeginInspection)?;
    let SessionState::ReportReady {
        checklist,
        details,
        answers,
        ..
    } = session.apply(SessionEvent::AnswersSubmitted(answers))?
    else {
        anyhow::bail!("Inspection did not reach the report stage");
    };

    let advisory = advisory_text(&project, &inputs.advisor, checklist, answers);

    let mut options = project.report_options(mileage);
    if comments.is_some() {
        options.comments = comments;
    }
    let mut report = InspectionReport::build(checklist, answers, details, &advisory, &options);
    report.inspection_id = inspection_id;
    let rendered = reporters::report_with_format(&report, format)?;

    let out_path: Option<PathBuf> = match (output, format) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, OutputFormat::Html | OutputFormat::Markdown) => {
            Some(dir.join(reporters::default_file_name(&report, format)))
        }
        (None, _) => None,
    };

    match out_path {
        Some(path) => {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} report written to {}",
                style("✓").green(),
                format,
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub fn advise(dir: &Path, inputs: &InspectionInputs) -> Result<()> {
    let project = load_project_config(dir);
    let (checklist, answers) = load_inputs(&inputs.checklist, &inputs.answers)?;
    println!(
        "{}",
        advisory_text(&project, &inputs.advisor, &checklist, &answers)
    );
    Ok(())
}

/// Advisory text from the chosen advisor. AI failures fall back to the
/// rule-based advice.
fn advisory_text(
    project: &ProjectConfig,
    advisor: &str,
    checklist: &FullChecklist,
    answers: &SubmittedAnswers,
) -> String {
    let rules = RuleBasedAdvisor::new();
    if advisor != "ai" {
        return rules.advice(checklist, answers);
    }

    let result = ai_client(project, None, false).and_then(|client| {
        let pb = spinner("Requesting trip advice...");
        let text = AiAdvisor::new(client).advise(checklist, answers);
        pb.finish_and_clear();
        Ok(text?)
    });

    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("AI advisor returned no text, using rule-based advice");
            rules.advice(checklist, answers)
        }
        Err(e) => {
            warn!("AI advisor unavailable ({:#}), using rule-based advice", e);
            eprintln!(
                "{} AI advice unavailable, using rule-based advice",
                style("!").yellow()
            );
            rules.advice(checklist, answers)
        }
    }
}
