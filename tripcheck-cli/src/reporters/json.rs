//! JSON reporter
//!
//! Outputs the full InspectionReport as pretty-printed JSON.

use crate::models::InspectionReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &InspectionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
