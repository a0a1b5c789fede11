//! Narrative summary composer
//!
//! Produces the ordered paragraphs of the report's advice section:
//! advisory passthrough, overall assessment, numbered resolution advice
//! and the disclaimer.

use super::checklist_scorer::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Header emitted by the advisors when something needs fixing
pub const CAUTION_MARKER: &str = "## ⚠️ Trip Preparedness: Caution Needed";
/// Header emitted by the advisors when every item passed
pub const ALL_CLEAR_MARKER: &str = "## ✅ Trip Preparedness: All Clear!";

const CAUTION_TITLE: &str = "Trip Preparedness: Caution Needed";
const ALL_CLEAR_TITLE: &str = "Trip Preparedness: All Clear!";

pub const DISCLAIMER: &str = "Disclaimer: This report is based on the responses recorded during a \
self-administered inspection and on automatically generated advice. It is not a substitute for an \
inspection by a qualified mechanic. Have safety-critical components such as brakes, tires and \
steering checked professionally before any long journey.";

const NO_ADVICE_NEEDED: &str =
    "No resolution advice needed: every checklist item passed inspection.";

/// How a paragraph should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    /// Red advisory header
    CautionHeader,
    /// Green advisory header
    AllClearHeader,
    SectionHeader,
    Body,
    Disclaimer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub text: String,
}

impl Paragraph {
    pub fn new(style: ParagraphStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(ParagraphStyle::Body, text)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(ParagraphStyle::SectionHeader, text)
    }
}

/// Compose the report narrative from the statistics and advisory text
pub fn compose_narrative(stats: &SummaryStatistics, advisory: &str) -> Vec<Paragraph> {
    let mut paragraphs = advisory_paragraphs(advisory);

    paragraphs.push(Paragraph::heading("Overall Assessment"));
    paragraphs.push(Paragraph::body(overall_assessment(stats)));

    paragraphs.push(Paragraph::heading("Resolution Advice"));
    if stats.items_requiring_attention.is_empty() {
        paragraphs.push(Paragraph::body(NO_ADVICE_NEEDED));
    } else {
        for (i, item) in stats.items_requiring_attention.iter().enumerate() {
            paragraphs.push(Paragraph::body(format!("{}. {}", i + 1, item.advice())));
        }
    }

    paragraphs.push(Paragraph::new(ParagraphStyle::Disclaimer, DISCLAIMER));
    paragraphs
}

/// One paragraph per non-blank line; `## ` lines become styled headers
fn advisory_paragraphs(advisory: &str) -> Vec<Paragraph> {
    advisory
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if line == CAUTION_MARKER {
                Paragraph::new(ParagraphStyle::CautionHeader, CAUTION_TITLE)
            } else if line == ALL_CLEAR_MARKER {
                Paragraph::new(ParagraphStyle::AllClearHeader, ALL_CLEAR_TITLE)
            } else if let Some(title) = line.strip_prefix("## ") {
                let style = if title.contains("All Clear") {
                    ParagraphStyle::AllClearHeader
                } else {
                    ParagraphStyle::CautionHeader
                };
                Paragraph::new(style, strip_leading_symbols(title))
            } else {
                Paragraph::body(line.trim_start())
            }
        })
        .collect()
}

/// Drop a leading emoji or other symbol (plus variation selectors and
/// spaces) from an advisory header
fn strip_leading_symbols(title: &str) -> &str {
    title
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end()
}

fn overall_assessment(stats: &SummaryStatistics) -> String {
    let passed_pct = stats.passed_percentage.round();
    let failed_pct = stats.failed_percentage.round();
    let skipped_pct = stats.skipped_percentage.round();

    if stats.passed_percentage >= 90.0 {
        format!(
            "The vehicle is in excellent condition: {} of {} items passed ({:.0}%), with {} \
             failed ({:.0}%) and {} skipped ({:.0}%). It appears to be in optimal condition \
             for the trip.",
            stats.passed_count,
            stats.total_items,
            passed_pct,
            stats.failed_count,
            failed_pct,
            stats.skipped_count,
            skipped_pct
        )
    } else if stats.passed_percentage >= 50.0 {
        format!(
            "The vehicle is in mixed condition: {} of {} items passed ({:.0}%), {} failed \
             ({:.0}%) and {} were skipped ({:.0}%). Attention is needed on the items listed \
             below before the trip.",
            stats.passed_count,
            stats.total_items,
            passed_pct,
            stats.failed_count,
            failed_pct,
            stats.skipped_count,
            skipped_pct
        )
    } else if stats.all_skipped() {
        format!(
            "The inspection is incomplete: all {} items were skipped ({:.0}%), so the \
             vehicle's condition could not be assessed. Complete the inspection before \
             the trip.",
            stats.total_items, skipped_pct
        )
    } else {
        format!(
            "The vehicle shows significant non-compliance: only {} of {} items passed \
             ({:.0}%), {} failed ({:.0}%) and {} were skipped ({:.0}%). The vehicle should \
             not be used for the trip until the issues below are resolved.",
            stats.passed_count,
            stats.total_items,
            passed_pct,
            stats.failed_count,
            failed_pct,
            stats.skipped_count,
            skipped_pct
        )
    }
}
