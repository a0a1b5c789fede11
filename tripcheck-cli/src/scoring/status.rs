//! Status normalization

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Answer text the form submits when nothing was picked
pub const NO_SELECTION: &str = "no selection made";

/// Canonical outcome of a single checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Passed,
    Failed,
    Skipped,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Passed => "passed",
            ItemStatus::Failed => "failed",
            ItemStatus::Skipped => "skipped",
        }
    }

    /// Failed and skipped items both need follow-up
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ItemStatus::Passed)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw answer. Total over all inputs: unrecognized text is
/// treated as skipped.
pub fn normalize_status(raw: Option<&str>) -> ItemStatus {
    let Some(raw) = raw else {
        return ItemStatus::Skipped;
    };

    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "pass" | "yes" | "okay" => ItemStatus::Passed,
        "fail" | "no" | "not okay" => ItemStatus::Failed,
        "" | NO_SELECTION => ItemStatus::Skipped,
        other => {
            debug!("Unrecognized answer {:?}, counting as skipped", other);
            ItemStatus::Skipped
        }
    }
}
