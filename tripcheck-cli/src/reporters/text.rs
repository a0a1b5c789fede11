//! Text (terminal) reporter with colors and formatting

use crate::models::{InspectionReport, NOT_INSPECTED};
use crate::scoring::{normalize_status, ItemStatus, ParagraphStyle};
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Render report as formatted terminal output
pub fn render(report: &InspectionReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{BOLD}{} - VEHICLE INSPECTION REPORT{RESET}\n",
        report.company_name
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Vehicle No.: {BOLD}{}{RESET}  Driver: {}  Mileage: {}  Date: {}\n\n",
        report.vehicle_plate, report.driver_name, report.mileage, report.report_date
    ));

    let s = &report.summary;
    out.push_str(&format!("{BOLD}SUMMARY{RESET} ({} items)\n", s.total_items));
    out.push_str(&format!(
        "  {GREEN}{} passed ({:.0}%){RESET} | {RED}{} failed ({:.0}%){RESET} | {YELLOW}{} skipped ({:.0}%){RESET}\n\n",
        s.passed_count,
        s.passed_percentage.round(),
        s.failed_count,
        s.failed_percentage.round(),
        s.skipped_count,
        s.skipped_percentage.round()
    ));

    out.push_str(&format!("{BOLD}INSPECTION DETAILS{RESET}\n"));
    for (table, rate) in report.groups.iter().zip(&report.group_pass_rates) {
        out.push_str(&format!(
            "\n  {BOLD}{}{RESET} {DIM}({} passed){RESET}\n",
            table.group_name, rate.pass_rate
        ));
        for row in &table.rows {
            out.push_str(&format!(
                "    {:<50} {}{}{RESET}\n",
                truncate(&row.item, 50),
                status_color(&row.status),
                row.status
            ));
        }
    }
    out.push('\n');

    out.push_str(&format!("{BOLD}TRIP ADVICE{RESET}\n"));
    for p in &report.narrative {
        match p.style {
            ParagraphStyle::CautionHeader => {
                out.push_str(&format!("\n  {RED}{BOLD}{}{RESET}\n", p.text))
            }
            ParagraphStyle::AllClearHeader => {
                out.push_str(&format!("\n  {GREEN}{BOLD}{}{RESET}\n", p.text))
            }
            ParagraphStyle::SectionHeader => {
                out.push_str(&format!("\n  {BOLD}{}{RESET}\n", p.text))
            }
            ParagraphStyle::Body => out.push_str(&format!("  {}\n", p.text)),
            ParagraphStyle::Disclaimer => {
                out.push_str(&format!("\n  {DIM}{}{RESET}\n", p.text))
            }
        }
    }
    out.push('\n');

    out.push_str(&format!("{BOLD}COMMENTS & ANALYSIS{RESET}\n"));
    for line in &report.comments {
        out.push_str(&format!("  {}\n", line));
    }
    out.push('\n');

    out.push_str(&format!(
        "{DIM}Inspection ID: {}  Inspector Name: {}{RESET}\n",
        report.inspection_id, report.inspector_name
    ));

    Ok(out)
}

fn status_color(status: &str) -> &'static str {
    if status == NOT_INSPECTED {
        return DIM;
    }
    match normalize_status(Some(status)) {
        ItemStatus::Passed => GREEN,
        ItemStatus::Failed => RED,
        ItemStatus::Skipped => YELLOW,
    }
}

// chars() keeps multi-byte names intact
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
