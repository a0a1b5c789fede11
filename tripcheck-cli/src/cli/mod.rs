//! CLI command definitions and handlers

mod doctor;
mod generate;
mod init;
mod report;
mod score;

use crate::ai::{AiClient, AiConfig, LlmBackend};
use crate::config::{ProjectConfig, UserConfig, TOML_CONFIG_FILE};
use crate::models::{FullChecklist, SubmittedAnswers};
use crate::sources::{self, ChecklistSource, FileChecklistSource};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// tripcheck - Vehicle pre-trip inspection checklists and reports
#[derive(Parser, Debug)]
#[command(name = "tripcheck")]
#[command(
    version,
    about = "Generate vehicle inspection checklists, score the answers, and produce trip-readiness reports",
    long_about = "tripcheck turns a trip description into a structured vehicle inspection \
checklist, scores the answers recorded against it, and writes an inspection report \
with group pass rates, resolution advice and a trip-readiness summary.\n\n\
Checklist generation and AI advice need an LLM backend (OpenAI, Anthropic or a local \
Ollama). Scoring and rule-based reports work fully offline.",
    after_help = "\
Examples:
  tripcheck generate \"Lagos to Abuja in a sedan\" -o checklist.json
  tripcheck score --checklist checklist.json --answers answers.json
  tripcheck report --checklist checklist.json --answers answers.json \\
      --name \"Ada Obi\" --email ada@example.com --plate ABC-123DE -f html
  tripcheck doctor                      Check backends and configuration"
)]
pub struct Cli {
    /// Directory holding tripcheck.toml (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a tripcheck.toml config file with example settings
    Init,

    /// Generate an inspection checklist from a trip description
    #[command(after_help = "\
Examples:
  tripcheck generate \"Pre-winter check for an SUV\"
  tripcheck generate -o checklist.json          Use a random example trip
  tripcheck generate \"Boat trailer\" --backend ollama")]
    Generate {
        /// Trip description (a random example trip is used when omitted)
        description: Option<String>,

        /// Write the checklist JSON to this file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// LLM backend: openai, anthropic, ollama
        #[arg(long, env = "TRIPCHECK_BACKEND", value_parser = ["openai", "anthropic", "ollama"])]
        backend: Option<String>,
    },

    /// Score recorded answers against a checklist
    #[command(after_help = "\
Examples:
  tripcheck score --checklist checklist.json --answers answers.json
  tripcheck score --checklist checklist.json --answers answers.json --format json
  tripcheck score --checklist checklist.json --answers answers.json --explain")]
    Score {
        /// Checklist JSON file
        #[arg(long)]
        checklist: PathBuf,

        /// Answers JSON file (flat `{"group_item_serial": "Pass"}` or record list)
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Show the full scoring breakdown
        #[arg(long)]
        explain: bool,
    },

    /// Build a full inspection report
    #[command(after_help = "\
Examples:
  tripcheck report --checklist c.json --answers a.json --name \"Ada Obi\" \\
      --email ada@example.com --plate ABC-123DE
  tripcheck report ... -f html -o report.html       Print-ready HTML
  tripcheck report ... --advisor ai                 LLM-written trip advice")]
    Report {
        #[command(flatten)]
        inputs: InspectionInputs,

        /// Driver's full name
        #[arg(long)]
        name: String,

        /// Driver's email address
        #[arg(long)]
        email: String,

        /// Vehicle plate number (AAA-123AA)
        #[arg(long)]
        plate: String,

        /// Odometer reading
        #[arg(long)]
        mileage: Option<String>,

        /// Text for the comments section (overrides tripcheck.toml)
        #[arg(long)]
        comments: Option<String>,

        /// Output format: text, json, html, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "html", "markdown", "md"])]
        format: Option<String>,

        /// Output file path (default: stdout, or auto-named for html/markdown)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print trip-preparedness advice for recorded answers
    Advise {
        #[command(flatten)]
        inputs: InspectionInputs,
    },

    /// Check backends and configuration
    Doctor,

    /// Manage user configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

/// Checklist and answers shared by `report` and `advise`
#[derive(clap::Args, Debug)]
pub struct InspectionInputs {
    /// Checklist JSON file
    #[arg(long)]
    pub checklist: PathBuf,

    /// Answers JSON file
    #[arg(long)]
    pub answers: PathBuf,

    /// Where trip advice comes from: rules (offline) or ai
    #[arg(long, default_value = "rules", value_parser = ["rules", "ai"])]
    pub advisor: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize user config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(&cli.dir),

        Commands::Generate {
            description,
            output,
            backend,
        } => generate::run(&cli.dir, description, output.as_deref(), backend.as_deref()),

        Commands::Score {
            checklist,
            answers,
            format,
            explain,
        } => score::run(&checklist, &answers, &format, explain),

        Commands::Report {
            inputs,
            name,
            email,
            plate,
            mileage,
            comments,
            format,
            output,
        } => report::run(
            &cli.dir,
            &inputs,
            report::Driver {
                name: &name,
                email: &email,
                plate: &plate,
            },
            mileage,
            comments,
            format.as_deref(),
            output.as_deref(),
        ),

        Commands::Advise { inputs } => report::advise(&cli.dir, &inputs),

        Commands::Doctor => doctor::run(&cli.dir),

        Commands::Config { action } => run_config_action(&cli.dir, action),

        Commands::Version => {
            println!("tripcheck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load a checklist file and the answers recorded against it
pub(crate) fn load_inputs(
    checklist: &Path,
    answers: &Path,
) -> Result<(FullChecklist, SubmittedAnswers)> {
    let source = FileChecklistSource::new(checklist);
    let checklist = source
        .generate("")
        .with_context(|| format!("Could not load checklist {}", source.path().display()))?;
    let answers =
        sources::load_answers(answers, &checklist).context("Could not load answers")?;
    Ok((checklist, answers))
}

/// Build an LLM client from project config, user config and environment.
///
/// Backend priority: explicit override, user config, project config.
pub(crate) fn ai_client(
    project: &ProjectConfig,
    backend_override: Option<&str>,
    json_output: bool,
) -> Result<AiClient> {
    let user = UserConfig::load()?;
    let mut config: AiConfig = project.ai_config(backend_override.or(user.backend()));
    config.json_output = json_output;
    if config.backend == LlmBackend::Ollama && config.model.is_none() {
        config.model = user.ai.ollama_model.clone();
    }
    let fallback_key = user.api_key(config.backend);
    Ok(AiClient::from_env_or_key(config, fallback_key)?)
}

/// Spinner on stderr for slow LLM calls
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn run_config_action(dir: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("{} Config initialized at: {}", style("✓").green(), path.display());
            println!("\nEdit to add your API key:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export OPENAI_API_KEY=\"sk-...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(dir),
    }
}

fn show_config(dir: &Path) -> Result<()> {
    let user = UserConfig::load()?;
    let project = crate::config::load_project_config(dir);

    println!("📁 Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  User:    {} {}", user_path.display(), status);
    }
    let project_path = dir.join(TOML_CONFIG_FILE);
    let proj_status = if project_path.exists() { "✓" } else { "(not found)" };
    println!("  Project: {} {}", project_path.display(), proj_status);
    println!();

    println!("📝 Report:");
    println!("  Company:   {}", project.report.company_name);
    println!("  Inspector: {}", project.report.inspector_name);
    println!(
        "  Format:    {}",
        project.report.format.as_deref().unwrap_or("text")
    );
    println!();

    let ai = project.ai_config(user.backend());
    println!("🤖 AI Backend: {} ({})", ai.backend.display_name(), ai.model());
    if ai.backend.requires_api_key() {
        let key_status = if user.api_key(ai.backend).is_some() {
            "✓ configured"
        } else {
            "✗ not set"
        };
        println!("  {}: {}", ai.backend.env_key(), key_status);
    }
    Ok(())
}
