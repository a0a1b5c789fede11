//! Output reporters for inspection reports
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `html` - Standalone, print-ready HTML report
//! - `markdown` - GitHub-flavored Markdown

mod html;
mod json;
mod markdown;
mod text;

pub use crate::models::InspectionReport;

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, html, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render an inspection report in the specified format
pub fn report(report: &InspectionReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render an inspection report using an OutputFormat enum
pub fn report_with_format(report: &InspectionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => html::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
        OutputFormat::Markdown => "md",
    }
}

/// Default output file name, e.g. `inspection_report_ABC-123DE.html`
pub fn default_file_name(report: &InspectionReport, format: OutputFormat) -> String {
    format!(
        "inspection_report_{}.{}",
        report.vehicle_plate,
        file_extension(format)
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        AnswerKey, ChecklistGroup, ChecklistItem, ChecklistType, FullChecklist, ReportOptions,
        SubmittedAnswers,
    };
    use crate::session::InspectorDetails;
    use crate::sources::RuleBasedAdvisor;

    /// Two groups: one item failed, one skipped, two passed
    pub(crate) fn test_report() -> InspectionReport {
        let item = |id: &str, serial_no, name: &str, item_type| ChecklistItem {
            name: name.into(),
            serial_no,
            id: id.into(),
            item_type,
        };
        let checklist = FullChecklist::new(vec![
            ChecklistGroup {
                name: "Tires & Brakes".into(),
                id: "g1".into(),
                serial_no: 1,
                items: vec![
                    item("i1", 1, "Are the tires inflated?", ChecklistType::PassFail),
                    item("i2", 2, "Do the brakes respond <firmly>?", ChecklistType::PassFail),
                ],
            },
            ChecklistGroup {
                name: "Lights".into(),
                id: "g2".into(),
                serial_no: 2,
                items: vec![
                    item("i3", 1, "Do the headlights work?", ChecklistType::YesNo),
                    item("i4", 2, "Is the horn okay?", ChecklistType::OkayNotOkay),
                ],
            },
        ]);
        let answers = SubmittedAnswers::new()
            .with(AnswerKey::new("g1", "i1", 1), Some("Pass"))
            .with(AnswerKey::new("g1", "i2", 2), Some("Fail"))
            .with(AnswerKey::new("g2", "i3", 1), Some("Yes"))
            .with(AnswerKey::new("g2", "i4", 2), None);
        let details = InspectorDetails::new("Ada Obi", "ada@example.com", "ABC-123DE")
            .expect("valid details");
        let advisory = RuleBasedAdvisor.advice(&checklist, &answers);

        InspectionReport::build(
            &checklist,
            &answers,
            &details,
            &advisory,
            &ReportOptions::default(),
        )
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("html").unwrap(), OutputFormat::Html);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        let err = OutputFormat::from_str("pdf").unwrap_err();
        assert!(err.to_string().contains("Valid formats"));
    }

    #[test]
    fn test_every_format_renders() {
        let report = test_report();
        for format in ["text", "json", "html", "markdown"] {
            let out = super::report(&report, format).unwrap();
            assert!(out.contains("ABC-123DE"), "{format}");
        }
    }

    #[test]
    fn test_default_file_name() {
        let report = test_report();
        assert_eq!(
            default_file_name(&report, OutputFormat::Html),
            "inspection_report_ABC-123DE.html"
        );
    }
}
