//! Checklist sources and answer-file loading

use super::{ChecklistSource, SourceError};
use crate::ai::{prompts, AiClient, Message};
use crate::models::{AnswerFile, ChecklistError, FullChecklist, SubmittedAnswers};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parse a generator response into a validated checklist.
///
/// Accepts a bare array of groups or an object with a `checklist` array,
/// optionally wrapped in a markdown code fence. Empty and `null` responses
/// yield an empty checklist, as does any other top-level shape.
pub fn parse_checklist_response(raw: &str) -> Result<FullChecklist, ChecklistError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() || body.eq_ignore_ascii_case("null") {
        debug!("Empty or null checklist response, treating as empty checklist");
        return Ok(FullChecklist::default());
    }

    let value: Value = serde_json::from_str(body)?;
    let list = match value {
        Value::Object(mut map) if map.contains_key("checklist") => {
            map.remove("checklist").unwrap_or(Value::Null)
        }
        other => other,
    };

    let list = match list {
        Value::Array(items) => Value::Array(items),
        Value::Null => return Ok(FullChecklist::default()),
        other => {
            warn!(
                "Checklist response is not a list (got {}), using an empty checklist",
                json_kind(&other)
            );
            return Ok(FullChecklist::default());
        }
    };

    let checklist: FullChecklist = serde_json::from_value(list)?;
    checklist.validate()?;
    Ok(checklist)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Info string ("json"), possibly on the same line as the body
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Generates checklists with an LLM
pub struct AiChecklistSource {
    client: AiClient,
}

impl AiChecklistSource {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

impl ChecklistSource for AiChecklistSource {
    fn generate(&self, trip_details: &str) -> Result<FullChecklist, SourceError> {
        info!(
            "Generating checklist with {} ({})",
            self.client.backend(),
            self.client.model()
        );
        let request = format!(
            "{}\n\n{}",
            prompts::sanitize_text(trip_details),
            prompts::checklist_type_hint()
        );
        let response = self.client.generate(
            vec![Message::user(request)],
            Some(prompts::CHECKLIST_SYSTEM_PROMPT),
        )?;
        let checklist = parse_checklist_response(&response)?;
        info!(
            "Generated {} groups, {} items",
            checklist.groups.len(),
            checklist.total_items()
        );
        Ok(checklist)
    }
}

/// Reads a previously generated checklist from disk. The trip description
/// is ignored.
pub struct FileChecklistSource {
    path: PathBuf,
}

impl FileChecklistSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChecklistSource for FileChecklistSource {
    fn generate(&self, _trip_details: &str) -> Result<FullChecklist, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded checklist from {}", self.path.display());
        Ok(parse_checklist_response(&content)?)
    }
}

/// Load an answers file (flat or record form) for `checklist`
pub fn load_answers(path: &Path, checklist: &FullChecklist) -> Result<SubmittedAnswers, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: AnswerFile =
        serde_json::from_str(&content).map_err(|source| SourceError::Answers {
            path: path.to_path_buf(),
            source,
        })?;
    let answers = file.into_answers(checklist);
    debug!("Loaded {} answers from {}", answers.len(), path.display());
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerKey;

    const GROUPS: &str = r#"[{"GroupName": "Tires", "GroupId": "g1", "SerialNo": 1,
        "Checklist": [{"ChecklistName": "Is the spare tire inflated?", "ChecklistSerialNo": 1,
                       "ChecklistId": "i1", "ChecklistType": "Yes/No"}]}]"#;

    #[test]
    fn test_parse_bare_array() {
        let checklist = parse_checklist_response(GROUPS).unwrap();
        assert_eq!(checklist.total_items(), 1);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let raw = format!(r#"{{"checklist": {}}}"#, GROUPS);
        let checklist = parse_checklist_response(&raw).unwrap();
        assert_eq!(checklist.groups[0].name, "Tires");
    }

    #[test]
    fn test_parse_code_fence() {
        let raw = format!("```json\n{}\n```", GROUPS);
        let checklist = parse_checklist_response(&raw).unwrap();
        assert_eq!(checklist.total_items(), 1);

        for raw in [
            format!("```{}```", GROUPS),
            format!("```json{}```", GROUPS),
            format!("```JSON {}\n```", GROUPS),
            format!("```\n{}", GROUPS),
        ] {
            let checklist = parse_checklist_response(&raw).unwrap();
            assert_eq!(checklist.total_items(), 1, "{raw:?}");
        }
    }

    #[test]
    fn test_empty_and_null_are_empty_checklists() {
        for raw in ["", "   ", "null", "NULL", r#"{"checklist": []}"#, "[]", r#"{"checklist": null}"#] {
            let checklist = parse_checklist_response(raw).unwrap();
            assert!(checklist.is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn test_non_list_is_empty_checklist() {
        assert!(parse_checklist_response(r#"{"answer": 42}"#).unwrap().is_empty());
        assert!(parse_checklist_response(r#""hello""#).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            parse_checklist_response("Sure! Here is your checklist"),
            Err(ChecklistError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"[{"GroupName": "A", "GroupId": "g", "SerialNo": 1, "Checklist": [
            {"ChecklistName": "Q1", "ChecklistSerialNo": 1, "ChecklistId": "i", "ChecklistType": "Yes/No"},
            {"ChecklistName": "Q2", "ChecklistSerialNo": 1, "ChecklistId": "i", "ChecklistType": "Pass/Fail"}]}]"#;
        assert!(matches!(
            parse_checklist_response(raw),
            Err(ChecklistError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_file_source_and_answers() {
        let dir = tempfile::tempdir().unwrap();
        let checklist_path = dir.path().join("checklist.json");
        let answers_path = dir.path().join("answers.json");
        std::fs::write(&checklist_path, GROUPS).unwrap();
        std::fs::write(&answers_path, r#"{"g1_i1_1": "No"}"#).unwrap();

        let source = FileChecklistSource::new(&checklist_path);
        let checklist = source.generate("ignored").unwrap();
        let answers = load_answers(&answers_path, &checklist).unwrap();

        assert_eq!(answers.get(&AnswerKey::new("g1", "i1", 1)), Some("No"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let source = FileChecklistSource::new("/nonexistent/checklist.json");
        let err = source.generate("").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/checklist.json"));
    }
}
