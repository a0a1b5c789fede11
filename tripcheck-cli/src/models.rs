//! Core data models for tripcheck
//!
//! Checklists are produced by a generator (LLM or file) and consumed
//! read-only by the scoring engine and the reporters. Answers are keyed
//! by a typed composite key so that form rendering and scoring always
//! agree on how an item is addressed.

use crate::scoring::{self, GroupPassRate, Paragraph, SummaryStatistics};
use crate::session::InspectorDetails;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Separator used in the string form of an [`AnswerKey`]
pub const KEY_SEPARATOR: char = '_';

/// Status shown in report tables for items answered with an explicit null
pub const NOT_INSPECTED: &str = "Not Inspected";

/// Status shown in report tables for items missing from the answers
pub const NO_SELECTION: &str = "No selection made";

/// Errors raised while loading or validating a checklist
#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("Duplicate checklist key '{key}': group/item ids must be unique within a checklist")]
    DuplicateKey { key: String },

    #[error("Unknown checklist type '{0}'. Valid types: Pass/Fail, Yes/No, Okay/Not Okay")]
    UnknownType(String),

    #[error("Failed to parse checklist: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Answer type declared for a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistType {
    #[serde(rename = "Pass/Fail")]
    PassFail,
    #[serde(rename = "Yes/No")]
    YesNo,
    #[serde(rename = "Okay/Not Okay")]
    OkayNotOkay,
}

impl ChecklistType {
    pub fn all() -> &'static [ChecklistType] {
        &[
            ChecklistType::PassFail,
            ChecklistType::YesNo,
            ChecklistType::OkayNotOkay,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistType::PassFail => "Pass/Fail",
            ChecklistType::YesNo => "Yes/No",
            ChecklistType::OkayNotOkay => "Okay/Not Okay",
        }
    }

    /// Selectable answers, positive option first
    pub fn options(&self) -> [&'static str; 2] {
        match self {
            ChecklistType::PassFail => ["Pass", "Fail"],
            ChecklistType::YesNo => ["Yes", "No"],
            ChecklistType::OkayNotOkay => ["Okay", "Not Okay"],
        }
    }

    /// Label used in advisory text when the negative option was chosen
    pub fn negative_label(&self) -> &'static str {
        match self {
            ChecklistType::PassFail => "Failed",
            ChecklistType::YesNo => "No",
            ChecklistType::OkayNotOkay => "Not Okay",
        }
    }
}

impl fmt::Display for ChecklistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistType {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChecklistType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChecklistError::UnknownType(s.to_string()))
    }
}

/// A single inspection question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(rename = "ChecklistName")]
    pub name: String,
    #[serde(rename = "ChecklistSerialNo")]
    pub serial_no: u32,
    #[serde(rename = "ChecklistId")]
    pub id: String,
    #[serde(rename = "ChecklistType")]
    pub item_type: ChecklistType,
}

/// A named report section of related items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistGroup {
    #[serde(rename = "GroupName")]
    pub name: String,
    #[serde(rename = "GroupId")]
    pub id: String,
    #[serde(rename = "SerialNo")]
    pub serial_no: u32,
    #[serde(rename = "Checklist", default)]
    pub items: Vec<ChecklistItem>,
}

/// Ordered list of groups. An empty checklist signals that the trip
/// description had nothing to do with vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullChecklist {
    pub groups: Vec<ChecklistGroup>,
}

impl FullChecklist {
    pub fn new(groups: Vec<ChecklistGroup>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Every item paired with its group, group order then item order
    pub fn iter_items(&self) -> impl Iterator<Item = (&ChecklistGroup, &ChecklistItem)> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(move |item| (g, item)))
    }

    /// Parse checklist JSON (a bare array of groups) and validate it
    pub fn from_json(json: &str) -> Result<Self, ChecklistError> {
        let checklist: FullChecklist = serde_json::from_str(json)?;
        checklist.validate()?;
        Ok(checklist)
    }

    /// Reject checklists where two items share a composite key.
    ///
    /// The check runs on the string form of the key, which also catches
    /// ids that only collide once joined with the separator.
    pub fn validate(&self) -> Result<(), ChecklistError> {
        let mut seen = HashSet::new();
        for (group, item) in self.iter_items() {
            let key = AnswerKey::for_item(group, item).to_string();
            if !seen.insert(key.clone()) {
                return Err(ChecklistError::DuplicateKey { key });
            }
        }
        Ok(())
    }
}

/// Composite identifier addressing one answer: group id, item id and
/// item serial number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerKey {
    pub group_id: String,
    pub item_id: String,
    pub serial_no: u32,
}

impl AnswerKey {
    pub fn new(group_id: impl Into<String>, item_id: impl Into<String>, serial_no: u32) -> Self {
        Self {
            group_id: group_id.into(),
            item_id: item_id.into(),
            serial_no,
        }
    }

    pub fn for_item(group: &ChecklistGroup, item: &ChecklistItem) -> Self {
        Self::new(group.id.clone(), item.id.clone(), item.serial_no)
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.group_id, self.item_id, self.serial_no
        )
    }
}

/// Responses collected for one submission. `None` means the item was
/// left unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedAnswers {
    answers: HashMap<AnswerKey, Option<String>>,
}

impl SubmittedAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: AnswerKey, status: Option<String>) {
        self.answers.insert(key, status);
    }

    /// Builder-style variant of [`record`](Self::record)
    pub fn with(mut self, key: AnswerKey, status: Option<&str>) -> Self {
        self.record(key, status.map(str::to_string));
        self
    }

    /// Raw answer for a key; `None` when absent or unanswered
    pub fn get(&self, key: &AnswerKey) -> Option<&str> {
        self.answers.get(key).and_then(|s| s.as_deref())
    }

    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.answers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, Option<&str>)> {
        self.answers.iter().map(|(k, v)| (k, v.as_deref()))
    }

    /// Resolve a flat, string-keyed answer map against a checklist.
    ///
    /// Only keys that belong to an item of `checklist` are kept.
    pub fn from_flat(checklist: &FullChecklist, flat: &HashMap<String, Option<String>>) -> Self {
        let mut answers = Self::new();
        for (group, item) in checklist.iter_items() {
            let key = AnswerKey::for_item(group, item);
            if let Some(status) = flat.get(&key.to_string()) {
                answers.record(key, status.clone());
            }
        }
        if answers.len() < flat.len() {
            debug!(
                "Ignored {} answer keys not present in the checklist",
                flat.len() - answers.len()
            );
        }
        answers
    }
}

/// One answer in the record form of an answers file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub group_id: String,
    pub item_id: String,
    pub serial_no: u32,
    #[serde(default)]
    pub status: Option<String>,
}

/// On-disk answers: either `{"g1_i1_1": "Pass"}` or a list of records
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerFile {
    Flat(HashMap<String, Option<String>>),
    Records(Vec<AnswerRecord>),
}

impl AnswerFile {
    pub fn into_answers(self, checklist: &FullChecklist) -> SubmittedAnswers {
        match self {
            AnswerFile::Flat(flat) => SubmittedAnswers::from_flat(checklist, &flat),
            AnswerFile::Records(records) => {
                let mut answers = SubmittedAnswers::new();
                for r in records {
                    answers.record(AnswerKey::new(r.group_id, r.item_id, r.serial_no), r.status);
                }
                answers
            }
        }
    }
}

/// One row of a group's status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub item: String,
    pub status: String,
}

/// Status table for one checklist group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTable {
    pub group_name: String,
    pub rows: Vec<StatusRow>,
}

/// Presentation settings for a report that do not come from the inspection
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub company_name: String,
    pub inspector_name: String,
    pub mileage: Option<String>,
    pub comments: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            company_name: "Camanda".to_string(),
            inspector_name: "Prof. E".to_string(),
            mileage: None,
            comments: None,
        }
    }
}

/// Fully assembled inspection report, ready for any reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionReport {
    pub inspection_id: Uuid,
    pub report_date: NaiveDate,
    pub company_name: String,
    pub inspector_name: String,
    pub driver_name: String,
    pub driver_email: String,
    pub vehicle_plate: String,
    pub mileage: String,
    pub groups: Vec<GroupTable>,
    pub summary: SummaryStatistics,
    pub group_pass_rates: Vec<GroupPassRate>,
    pub narrative: Vec<Paragraph>,
    pub comments: Vec<String>,
}

impl InspectionReport {
    pub const DEFAULT_COMMENTS: &'static str =
        "No additional comments or analysis provided for this inspection.";

    /// Score the answers and assemble every report section
    pub fn build(
        checklist: &FullChecklist,
        answers: &SubmittedAnswers,
        details: &InspectorDetails,
        advisory: &str,
        options: &ReportOptions,
    ) -> Self {
        let summary = scoring::score(checklist, answers);
        let group_pass_rates = scoring::group_pass_rates(checklist, answers);
        let narrative = scoring::compose_narrative(&summary, advisory);

        let groups = checklist
            .groups
            .iter()
            .map(|group| GroupTable {
                group_name: group.name.clone(),
                rows: group
                    .items
                    .iter()
                    .map(|item| {
                        let key = AnswerKey::for_item(group, item);
                        let status = match answers.get(&key) {
                            Some(value) => value,
                            None if answers.contains(&key) => NOT_INSPECTED,
                            None => NO_SELECTION,
                        };
                        StatusRow {
                            item: item.name.clone(),
                            status: status.to_string(),
                        }
                    })
                    .collect(),
            })
            .collect();

        let comments = options
            .comments
            .as_deref()
            .unwrap_or(Self::DEFAULT_COMMENTS)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        Self {
            inspection_id: Uuid::new_v4(),
            report_date: chrono::Local::now().date_naive(),
            company_name: options.company_name.clone(),
            inspector_name: options.inspector_name.clone(),
            driver_name: details.name().to_string(),
            driver_email: details.email().to_string(),
            vehicle_plate: details.plate().to_string(),
            mileage: options.mileage.clone().unwrap_or_else(|| "N/A".to_string()),
            groups,
            summary,
            group_pass_rates,
            narrative,
            comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, serial_no: u32, item_type: ChecklistType) -> ChecklistItem {
        ChecklistItem {
            name: format!("Is {} ok?", id),
            serial_no,
            id: id.to_string(),
            item_type,
        }
    }

    fn group(id: &str, items: Vec<ChecklistItem>) -> ChecklistGroup {
        ChecklistGroup {
            name: format!("Group {}", id),
            id: id.to_string(),
            serial_no: 1,
            items,
        }
    }

    #[test]
    fn test_checklist_parses_generator_field_names() {
        let json = r#"[{"GroupName": "Tires & Brakes", "GroupId": "group-1", "SerialNo": 1,
            "Checklist": [{"ChecklistName": "Are the tires inflated?", "ChecklistSerialNo": 1,
                           "ChecklistId": "item-1", "ChecklistType": "Pass/Fail"}]}]"#;
        let checklist = FullChecklist::from_json(json).unwrap();
        assert_eq!(checklist.groups.len(), 1);
        assert_eq!(checklist.groups[0].name, "Tires & Brakes");
        assert_eq!(checklist.groups[0].items[0].item_type, ChecklistType::PassFail);
        assert_eq!(checklist.total_items(), 1);
    }

    #[test]
    fn test_unknown_checklist_type_is_rejected() {
        let json = r#"[{"GroupName": "G", "GroupId": "g", "SerialNo": 1,
            "Checklist": [{"ChecklistName": "Q", "ChecklistSerialNo": 1,
                           "ChecklistId": "i", "ChecklistType": "Maybe"}]}]"#;
        assert!(matches!(
            FullChecklist::from_json(json),
            Err(ChecklistError::Parse(_))
        ));
    }

    #[test]
    fn test_answer_key_string_form() {
        let key = AnswerKey::new("group-1", "item-3", 3);
        assert_eq!(key.to_string(), "group-1_item-3_3");
    }

    #[test]
    fn test_validate_rejects_duplicate_keys() {
        let checklist = FullChecklist::new(vec![
            group("g1", vec![item("i1", 1, ChecklistType::PassFail)]),
            group("g2", vec![item("i1", 1, ChecklistType::PassFail)]),
            group("g1", vec![item("i1", 1, ChecklistType::YesNo)]),
        ]);
        match checklist.validate() {
            Err(ChecklistError::DuplicateKey { key }) => assert_eq!(key, "g1_i1_1"),
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_catches_separator_collisions() {
        // "a_b" + "c" and "a" + "b_c" join to the same string
        let checklist = FullChecklist::new(vec![
            group("a_b", vec![item("c", 1, ChecklistType::PassFail)]),
            group("a", vec![item("b_c", 1, ChecklistType::PassFail)]),
        ]);
        assert!(checklist.validate().is_err());
    }

    #[test]
    fn test_checklist_type_from_str() {
        assert_eq!(
            "okay/not okay".parse::<ChecklistType>().unwrap(),
            ChecklistType::OkayNotOkay
        );
        assert!("Good/Bad".parse::<ChecklistType>().is_err());
    }

    #[test]
    fn test_flat_answers_resolved_against_checklist() {
        let checklist = FullChecklist::new(vec![group(
            "g1",
            vec![
                item("i1", 1, ChecklistType::PassFail),
                item("i2", 2, ChecklistType::YesNo),
            ],
        )]);
        let flat: HashMap<String, Option<String>> = [
            ("g1_i1_1".to_string(), Some("Pass".to_string())),
            ("g1_i2_2".to_string(), None),
            ("g9_i9_9".to_string(), Some("Fail".to_string())),
        ]
        .into_iter()
        .collect();

        let answers = SubmittedAnswers::from_flat(&checklist, &flat);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(&AnswerKey::new("g1", "i1", 1)), Some("Pass"));
        assert!(answers.contains(&AnswerKey::new("g1", "i2", 2)));
        assert_eq!(answers.get(&AnswerKey::new("g1", "i2", 2)), None);
    }

    #[test]
    fn test_answer_file_record_form() {
        let json = r#"[{"group_id": "g1", "item_id": "i1", "serial_no": 1, "status": "Fail"},
                       {"group_id": "g1", "item_id": "i2", "serial_no": 2}]"#;
        let file: AnswerFile = serde_json::from_str(json).unwrap();
        let answers = file.into_answers(&FullChecklist::default());
        assert_eq!(answers.get(&AnswerKey::new("g1", "i1", 1)), Some("Fail"));
        assert_eq!(answers.get(&AnswerKey::new("g1", "i2", 2)), None);
    }

    #[test]
    fn test_report_tables_mark_unanswered_items() {
        let checklist = FullChecklist::new(vec![group(
            "g1",
            vec![
                item("i1", 1, ChecklistType::PassFail),
                item("i2", 2, ChecklistType::YesNo),
            ],
        )]);
        let answers = SubmittedAnswers::new().with(AnswerKey::new("g1", "i1", 1), Some("Pass"));
        let details =
            InspectorDetails::new("Ada Obi", "ada@example.com", "abc-123de").unwrap();

        let report = InspectionReport::build(
            &checklist,
            &answers,
            &details,
            "",
            &ReportOptions::default(),
        );

        assert_eq!(report.groups[0].rows[0].status, "Pass");
        assert_eq!(report.groups[0].rows[1].status, NO_SELECTION);
        assert_eq!(report.vehicle_plate, "ABC-123DE");
        assert_eq!(report.mileage, "N/A");
        assert_eq!(report.comments, vec![InspectionReport::DEFAULT_COMMENTS]);
        assert_eq!(report.summary.total_items, 2);
    }

    #[test]
    fn test_report_tables_tell_null_from_missing() {
        let checklist = FullChecklist::new(vec![group(
            "g1",
            vec![
                item("i1", 1, ChecklistType::PassFail),
                item("i2", 2, ChecklistType::YesNo),
            ],
        )]);
        let answers = SubmittedAnswers::new().with(AnswerKey::new("g1", "i1", 1), None);
        let details =
            InspectorDetails::new("Ada Obi", "ada@example.com", "abc-123de").unwrap();

        let report = InspectionReport::build(
            &checklist,
            &answers,
            &details,
            "",
            &ReportOptions::default(),
        );

        assert_eq!(report.groups[0].rows[0].status, NOT_INSPECTED);
        assert_eq!(report.groups[0].rows[1].status, NO_SELECTION);
        assert_eq!(report.summary.skipped_count, 2);
    }
}
