//! Advisory text sources

use super::{NarrativeSource, SourceError};
use crate::ai::{prompts, AiClient, Message};
use crate::models::{AnswerKey, FullChecklist, SubmittedAnswers};
use crate::scoring::{normalize_status, ItemStatus, ALL_CLEAR_MARKER, CAUTION_MARKER};
use tracing::{debug, info};

const CAUTION_INTRO: &str =
    "Based on your inspection, there are items that require attention before your trip:";
const CAUTION_OUTRO: &str =
    "It is highly recommended to address these issues to ensure a safe journey.";
const ALL_CLEAR_TEXT: &str = "Your vehicle inspection indicates that you are well-prepared for \
your trip. Have a safe journey!";
const NO_SELECTION_NOTE: &str = "No selection made (please check)";

/// Deterministic trip-preparedness advice built from the answers alone
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAdvisor;

impl RuleBasedAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`NarrativeSource::advise`], without the `Result`
    pub fn advice(&self, checklist: &FullChecklist, answers: &SubmittedAnswers) -> String {
        let issues: Vec<String> = checklist
            .iter_items()
            .filter_map(|(group, item)| {
                match normalize_status(answers.get(&AnswerKey::for_item(group, item))) {
                    ItemStatus::Passed => None,
                    ItemStatus::Failed => {
                        Some(format!("- {}: {}", item.name, item.item_type.negative_label()))
                    }
                    ItemStatus::Skipped => Some(format!("- {}: {}", item.name, NO_SELECTION_NOTE)),
                }
            })
            .collect();

        debug!("Rule-based advisor found {} issue(s)", issues.len());

        if issues.is_empty() {
            format!("{}\n\n{}", ALL_CLEAR_MARKER, ALL_CLEAR_TEXT)
        } else {
            format!(
                "{}\n\n{}\n{}\n\n{}",
                CAUTION_MARKER,
                CAUTION_INTRO,
                issues.join("\n"),
                CAUTION_OUTRO
            )
        }
    }
}

impl NarrativeSource for RuleBasedAdvisor {
    fn advise(
        &self,
        checklist: &FullChecklist,
        answers: &SubmittedAnswers,
    ) -> Result<String, SourceError> {
        Ok(self.advice(checklist, answers))
    }
}

/// Advisory text written by an LLM
pub struct AiAdvisor {
    client: AiClient,
}

impl AiAdvisor {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

impl NarrativeSource for AiAdvisor {
    fn advise(
        &self,
        checklist: &FullChecklist,
        answers: &SubmittedAnswers,
    ) -> Result<String, SourceError> {
        info!("Requesting trip advice from {}", self.client.backend());
        let text = self.client.generate(
            vec![Message::user(prompts::advisory_user_prompt(checklist, answers))],
            Some(prompts::ADVISORY_SYSTEM_PROMPT),
        )?;
        Ok(text.trim().to_string())
    }
}
