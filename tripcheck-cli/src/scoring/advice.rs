//! Resolution advice for items requiring attention

use crate::models::ChecklistType;

/// Guidance text for one item. Total over its inputs: unknown types and
/// statuses fall back to generic wording.
pub fn resolution_advice(item_name: &str, item_type: &str, item_status: &str) -> String {
    match item_status.trim().to_lowercase().as_str() {
        "failed" => failed_advice(item_name, item_type),
        "skipped" => format!(
            "'{}' was not inspected. Please inspect this item manually before your trip \
             and address any problem you find.",
            item_name
        ),
        _ => format!(
            "The status of '{}' is unknown. Re-check this item and record a clear result \
             before relying on this report.",
            item_name
        ),
    }
}

fn failed_advice(item_name: &str, item_type: &str) -> String {
    match item_type.parse::<ChecklistType>() {
        Ok(ChecklistType::PassFail) => format!(
            "'{}' failed inspection. Repair or replace the affected component and \
             re-inspect it before setting out.",
            item_name
        ),
        Ok(ChecklistType::YesNo) => format!(
            "'{}' was answered 'No'. Make sure the required item or condition is in place \
             before departure.",
            item_name
        ),
        Ok(ChecklistType::OkayNotOkay) => format!(
            "'{}' was marked 'Not Okay'. Have it checked and serviced so it is in good \
             working order for the journey.",
            item_name
        ),
        Err(_) => format!(
            "'{}' did not meet the expected standard. Consult a qualified mechanic or \
             other professional before the trip.",
            item_name
        ),
    }
}
