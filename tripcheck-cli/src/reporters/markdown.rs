//! Markdown reporter for GitHub-flavored Markdown output

use crate::models::{GroupTable, InspectionReport};
use crate::scoring::{GroupPassRate, ParagraphStyle};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &InspectionReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str("## Inspection Details\n\n");
    for (table, rate) in report.groups.iter().zip(&report.group_pass_rates) {
        md.push_str(&render_group(table, rate));
        md.push('\n');
    }

    md.push_str(&render_advice(report));
    md.push('\n');

    md.push_str("## Comments & Analysis\n\n");
    for line in &report.comments {
        md.push_str(&format!("{}\n\n", line));
    }

    md.push_str(&render_footer(report));

    Ok(md)
}

fn render_header(report: &InspectionReport) -> String {
    format!(
        r#"# {}: Vehicle Inspection Report

| | | | |
|---|---|---|---|
| **Vehicle No.** | {} | **Driver's Name** | {} |
| **Mileage** | {} | **Inspection Date** | {} |
"#,
        escape_cell(&report.company_name),
        escape_cell(&report.vehicle_plate),
        escape_cell(&report.driver_name),
        escape_cell(&report.mileage),
        report.report_date
    )
}

fn render_summary(report: &InspectionReport) -> String {
    let s = &report.summary;
    format!(
        r#"## Summary

| Outcome | Count | Share |
|---------|-------|-------|
| ✅ Passed | {} | {:.0}% |
| ❌ Failed | {} | {:.0}% |
| ⏭️ Skipped | {} | {:.0}% |
| **Total** | **{}** | |
"#,
        s.passed_count,
        s.passed_percentage.round(),
        s.failed_count,
        s.failed_percentage.round(),
        s.skipped_count,
        s.skipped_percentage.round(),
        s.total_items
    )
}

fn render_group(table: &GroupTable, rate: &GroupPassRate) -> String {
    let mut md = format!(
        "### {} ({} passed)\n\n| Item | Status |\n|------|--------|\n",
        table.group_name, rate.pass_rate
    );
    for row in &table.rows {
        md.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&row.item),
            escape_cell(&row.status)
        ));
    }
    md
}

fn render_advice(report: &InspectionReport) -> String {
    let mut md = String::from("## Trip Advice Summary\n\n");
    for p in &report.narrative {
        let line = match p.style {
            ParagraphStyle::CautionHeader => format!("### ⚠️ {}\n\n", p.text),
            ParagraphStyle::AllClearHeader => format!("### ✅ {}\n\n", p.text),
            ParagraphStyle::SectionHeader => format!("### {}\n\n", p.text),
            ParagraphStyle::Body => format!("{}\n\n", p.text),
            ParagraphStyle::Disclaimer => format!("> *{}*\n\n", p.text),
        };
        md.push_str(&line);
    }
    md
}

fn render_footer(report: &InspectionReport) -> String {
    format!(
        "---\n\n*Inspection ID: {} | Inspector Name: {}*\n",
        report.inspection_id, report.inspector_name
    )
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
