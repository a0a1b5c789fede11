//! HTML reporter with embedded styles
//!
//! Generates a standalone HTML report that can be viewed in any browser
//! and printed to PDF. Layout follows the paper inspection form:
//! - Company name and title
//! - Vehicle / driver information table
//! - One status table per checklist group
//! - Trip advice summary (starts on a new printed page)
//! - Comments & analysis
//! - Running footer with inspection id and inspector name

use crate::models::{GroupTable, InspectionReport, NOT_INSPECTED};
use crate::scoring::{normalize_status, GroupPassRate, ItemStatus, Paragraph, ParagraphStyle};
use anyhow::Result;

/// Render report as standalone HTML
pub fn render(report: &InspectionReport) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head(report));

    html.push_str("<body>\n<div class=\"container\">\n");

    html.push_str(&render_header(report));
    html.push_str(&render_info_table(report));
    html.push_str(&render_summary(report));

    html.push_str("<div class=\"section\">\n    <h2 class=\"section-title\">Inspection Details</h2>\n");
    for (table, rate) in report.groups.iter().zip(&report.group_pass_rates) {
        html.push_str(&render_group(table, rate));
    }
    html.push_str("</div>\n");

    html.push_str(&render_advice(&report.narrative));
    html.push_str(&render_comments(&report.comments));

    html.push_str("</div>\n"); // container

    html.push_str(&render_footer(report));

    html.push_str("</body>\n</html>");

    Ok(html)
}

fn render_head(report: &InspectionReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Vehicle Inspection Report - {}</title>
    <style>
{CSS}
    </style>
</head>
"#,
        html_escape(&report.vehicle_plate)
    )
}

fn render_header(report: &InspectionReport) -> String {
    format!(
        r#"<div class="header">
    <div class="company-name">{}</div>
    <h1>VEHICLE INSPECTION REPORT</h1>
</div>
"#,
        html_escape(&report.company_name)
    )
}

fn render_info_table(report: &InspectionReport) -> String {
    format!(
        r#"<table class="info-table">
    <tr><th>Vehicle No.</th><td>{}</td><th>Driver's Name</th><td>{}</td></tr>
    <tr><th>Mileage</th><td>{}</td><th>Inspection Date</th><td>{}</td></tr>
</table>
"#,
        html_escape(&report.vehicle_plate),
        html_escape(&report.driver_name),
        html_escape(&report.mileage),
        report.report_date
    )
}

fn render_summary(report: &InspectionReport) -> String {
    let s = &report.summary;
    format!(
        r#"<div class="stats-grid">
    <div class="stat-item stat-passed"><div class="stat-value">{}</div><div class="stat-label">Passed ({:.0}%)</div></div>
    <div class="stat-item stat-failed"><div class="stat-value">{}</div><div class="stat-label">Failed ({:.0}%)</div></div>
    <div class="stat-item stat-skipped"><div class="stat-value">{}</div><div class="stat-label">Skipped ({:.0}%)</div></div>
</div>
"#,
        s.passed_count,
        s.passed_percentage.round(),
        s.failed_count,
        s.failed_percentage.round(),
        s.skipped_count,
        s.skipped_percentage.round()
    )
}

fn render_group(table: &GroupTable, rate: &GroupPassRate) -> String {
    let mut html = format!(
        r#"    <h3 class="group-title">Group: {} <span class="pass-rate">{} passed</span></h3>
    <table class="status-table">
        <tr><th>Item</th><th>Status</th></tr>
"#,
        html_escape(&table.group_name),
        rate.pass_rate
    );
    for row in &table.rows {
        html.push_str(&format!(
            "        <tr><td>{}</td><td class=\"status {}\">{}</td></tr>\n",
            html_escape(&row.item),
            status_class(&row.status),
            html_escape(&row.status)
        ));
    }
    html.push_str("    </table>\n");
    html
}

fn render_advice(narrative: &[Paragraph]) -> String {
    let mut html = String::from(
        "<div class=\"section advice\">\n    <h2 class=\"section-title\">Trip Advice Summary</h2>\n",
    );
    for p in narrative {
        let text = html_escape(&p.text);
        let line = match p.style {
            ParagraphStyle::CautionHeader => format!("    <h3 class=\"advice-caution\">{}</h3>\n", text),
            ParagraphStyle::AllClearHeader => format!("    <h3 class=\"advice-clear\">{}</h3>\n", text),
            ParagraphStyle::SectionHeader => format!("    <h3>{}</h3>\n", text),
            ParagraphStyle::Body => format!("    <p class=\"advice-body\">{}</p>\n", text),
            ParagraphStyle::Disclaimer => format!("    <p class=\"disclaimer\">{}</p>\n", text),
        };
        html.push_str(&line);
    }
    html.push_str("</div>\n");
    html
}

fn render_comments(comments: &[String]) -> String {
    let mut html = String::from(
        "<div class=\"section\">\n    <h2 class=\"section-title\">Comments &amp; Analysis</h2>\n",
    );
    for line in comments {
        html.push_str(&format!("    <p>{}</p>\n", html_escape(line)));
    }
    html.push_str("</div>\n");
    html
}

fn render_footer(report: &InspectionReport) -> String {
    format!(
        r#"<div class="footer">
    <span>Inspection ID: {}</span>
    <span>Inspector Name: {}</span>
</div>
"#,
        report.inspection_id,
        html_escape(&report.inspector_name)
    )
}

fn status_class(status: &str) -> &'static str {
    if status == NOT_INSPECTED {
        return "status-not-inspected";
    }
    match normalize_status(Some(status)) {
        ItemStatus::Passed => "status-passed",
        ItemStatus::Failed => "status-failed",
        ItemStatus::Skipped => "status-skipped",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: Helvetica, Arial, sans-serif;
    font-size: 10pt;
    line-height: 1.4;
    color: #000;
    background: #f8fafc;
    padding: 2rem;
}

.container {
    max-width: 800px;
    margin: 0 auto 3rem;
    background: white;
    padding: 2rem;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
}

.header { text-align: center; margin-bottom: 1.5rem; }
.company-name { font-size: 20pt; font-weight: bold; margin-bottom: 0.25rem; }
.header h1 { font-size: 16pt; letter-spacing: 0.05em; }

table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
th, td { border: 0.5pt solid #ccc; padding: 3px 6px; text-align: left; vertical-align: middle; }
.info-table th { width: 18%; }
.status-table th { background: #e0e0e0; }
.status-table td.status { width: 25%; text-align: center; }

.status-passed { color: #047857; }
.status-failed { color: #b91c1c; font-weight: bold; }
.status-skipped { color: #b45309; }
.status-not-inspected { color: #64748b; font-style: italic; }

.stats-grid {
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: 0.75rem;
    margin-bottom: 1.5rem;
}
.stat-item { border: 1px solid #e2e8f0; border-radius: 6px; padding: 0.75rem; text-align: center; }
.stat-value { font-size: 18pt; font-weight: bold; }
.stat-label { color: #64748b; }
.stat-passed .stat-value { color: #047857; }
.stat-failed .stat-value { color: #b91c1c; }
.stat-skipped .stat-value { color: #b45309; }

.section { margin-bottom: 1.5rem; }
.section-title { font-size: 13pt; margin: 1rem 0 0.5rem; }
.group-title { font-size: 11pt; margin: 0.75rem 0 0.25rem; }
.pass-rate { font-weight: normal; color: #64748b; font-size: 9pt; }

.advice h3 { font-size: 12pt; margin: 0.75rem 0 0.4rem; }
.advice-caution { color: #ff0000; font-size: 16pt !important; }
.advice-clear { color: #008000; font-size: 16pt !important; }
.advice-body { margin-bottom: 0.4rem; }
.disclaimer { margin-top: 1rem; font-size: 8pt; color: #64748b; font-style: italic; }

.footer {
    position: fixed;
    bottom: 0;
    left: 0;
    right: 0;
    display: flex;
    justify-content: space-between;
    padding: 0.5rem 2rem;
    font-size: 9pt;
    background: white;
    border-top: 1px solid #e2e8f0;
}

@media print {
    @page { margin: 1in 1in 0.9in 1in; }
    body { padding: 0; background: white; }
    .container { box-shadow: none; padding: 0; margin: 0; }
    .status-table { page-break-inside: avoid; }
    .advice { page-break-before: always; }
    .footer { border-top: none; padding: 0; }
}
"#;
