//! Where checklists and advisory text come from
//!
//! The scoring engine never talks to an LLM. Checklist generation and the
//! free-text advisory are pluggable capabilities:
//!
//! - [`ChecklistSource`]: trip description in, validated checklist out
//! - [`NarrativeSource`]: checklist + answers in, advisory markdown out

mod advisory;
mod checklist;

pub use advisory::{AiAdvisor, RuleBasedAdvisor};
pub use checklist::{
    load_answers, parse_checklist_response, AiChecklistSource, FileChecklistSource,
};

use crate::ai::AiError;
use crate::models::{ChecklistError, FullChecklist, SubmittedAnswers};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid answers file {path}: {source}")]
    Answers {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Produces a checklist for a trip description
pub trait ChecklistSource {
    fn generate(&self, trip_details: &str) -> Result<FullChecklist, SourceError>;
}

/// Produces the advisory text that opens a report's narrative
pub trait NarrativeSource {
    fn advise(
        &self,
        checklist: &FullChecklist,
        answers: &SubmittedAnswers,
    ) -> Result<String, SourceError>;
}
