//! Inspection Scoring Engine
//!
//! Turns a checklist plus submitted answers into pass/fail/skipped
//! statistics, per-group pass rates and the narrative paragraphs of the
//! report. Everything here is pure: no I/O, no hidden state, and no
//! input (however malformed) produces an error.
//!
//! # Classification
//!
//! ```text
//! absent | "" | "no selection made"  -> skipped
//! "pass" | "yes" | "okay"            -> passed
//! "fail" | "no"  | "not okay"        -> failed
//! anything else                      -> skipped
//! ```
//!
//! Matching is case-insensitive on the trimmed answer.
//!
//! # Percentages
//!
//! ```text
//! bucket% = bucket_count / total_items × 100   (0 when total_items == 0)
//! group rate = round(group_passed / group_items × 100) + "%"
//! ```
//!
//! # Overall assessment
//!
//! - passed ≥ 90%: excellent condition
//! - passed ≥ 50%: mixed condition
//! - every item skipped: inspection incomplete
//! - otherwise: significant non-compliance

mod advice;
mod checklist_scorer;
mod narrative;
mod status;

pub use advice::resolution_advice;
pub use checklist_scorer::{
    group_pass_rates, score, AttentionItem, ChecklistScorer, GroupPassRate, SummaryStatistics,
};
pub use narrative::{
    compose_narrative, Paragraph, ParagraphStyle, ALL_CLEAR_MARKER, CAUTION_MARKER, DISCLAIMER,
};
pub use status::{normalize_status, ItemStatus, NO_SELECTION};
