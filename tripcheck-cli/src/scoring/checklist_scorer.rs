//! Checklist scorer
//!
//! Single pass over the checklist in group-then-item order, looking each
//! item's answer up by its composite key.

use super::status::{normalize_status, ItemStatus};
use crate::models::{AnswerKey, ChecklistGroup, ChecklistItem, ChecklistType, FullChecklist, SubmittedAnswers};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An item that failed or was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionItem {
    pub name: String,
    pub item_type: ChecklistType,
    pub status: ItemStatus,
}

impl AttentionItem {
    /// Resolution guidance for this item
    pub fn advice(&self) -> String {
        super::resolution_advice(&self.name, self.item_type.as_str(), self.status.as_str())
    }
}

/// Aggregate counts and percentages for a whole checklist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_items: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    /// 0-100, 0 when the checklist is empty
    pub passed_percentage: f64,
    pub failed_percentage: f64,
    pub skipped_percentage: f64,
    /// Failed and skipped items, in checklist order
    pub items_requiring_attention: Vec<AttentionItem>,
}

impl SummaryStatistics {
    pub fn all_skipped(&self) -> bool {
        self.total_items > 0 && self.skipped_count == self.total_items
    }
}

/// Pass rate of one group, formatted as a whole percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPassRate {
    pub group_name: String,
    /// e.g. "83%"
    pub pass_rate: String,
    pub passed: usize,
    pub total: usize,
}

/// Scores one submission against the checklist it was made for
pub struct ChecklistScorer<'a> {
    checklist: &'a FullChecklist,
    answers: &'a SubmittedAnswers,
}

impl<'a> ChecklistScorer<'a> {
    pub fn new(checklist: &'a FullChecklist, answers: &'a SubmittedAnswers) -> Self {
        Self { checklist, answers }
    }

    /// Normalized outcome of one item
    pub fn status_of(&self, group: &ChecklistGroup, item: &ChecklistItem) -> ItemStatus {
        normalize_status(self.answers.get(&AnswerKey::for_item(group, item)))
    }

    /// Calculate summary statistics
    pub fn calculate(&self) -> SummaryStatistics {
        let mut stats = SummaryStatistics::default();

        for (group, item) in self.checklist.iter_items() {
            stats.total_items += 1;
            let status = self.status_of(group, item);
            match status {
                ItemStatus::Passed => stats.passed_count += 1,
                ItemStatus::Failed => stats.failed_count += 1,
                ItemStatus::Skipped => stats.skipped_count += 1,
            }
            if status.needs_attention() {
                stats.items_requiring_attention.push(AttentionItem {
                    name: item.name.clone(),
                    item_type: item.item_type,
                    status,
                });
            }
        }

        stats.passed_percentage = percentage(stats.passed_count, stats.total_items);
        stats.failed_percentage = percentage(stats.failed_count, stats.total_items);
        stats.skipped_percentage = percentage(stats.skipped_count, stats.total_items);

        info!(
            "Inspection score: {}/{} passed ({:.1}%), {} failed, {} skipped",
            stats.passed_count,
            stats.total_items,
            stats.passed_percentage,
            stats.failed_count,
            stats.skipped_count
        );

        stats
    }

    /// Pass rate per group, parallel to group order
    pub fn group_pass_rates(&self) -> Vec<GroupPassRate> {
        self.checklist
            .groups
            .iter()
            .map(|group| {
                let passed = group
                    .items
                    .iter()
                    .filter(|item| self.status_of(group, item) == ItemStatus::Passed)
                    .count();
                let total = group.items.len();
                debug!("Group '{}': {}/{} passed", group.name, passed, total);
                GroupPassRate {
                    group_name: group.name.clone(),
                    pass_rate: format_rate(passed, total),
                    passed,
                    total,
                }
            })
            .collect()
    }

    /// Generate human-readable explanation of the score
    pub fn explain(&self, stats: &SummaryStatistics) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "# Inspection Score: {}/{} passed ({})\n",
            stats.passed_count,
            stats.total_items,
            format_rate(stats.passed_count, stats.total_items)
        ));

        lines.push("## Scoring Formula\n".to_string());
        lines.push("```".to_string());
        lines.push("bucket %   = bucket count / total items × 100".to_string());
        lines.push("group rate = round(group passed / group items × 100)".to_string());
        lines.push("```\n".to_string());

        lines.push("## Outcomes\n".to_string());
        lines.push(format!(
            "- **Passed**: {} ({:.1}%)",
            stats.passed_count, stats.passed_percentage
        ));
        lines.push(format!(
            "- **Failed**: {} ({:.1}%)",
            stats.failed_count, stats.failed_percentage
        ));
        lines.push(format!(
            "- **Skipped**: {} ({:.1}%)\n",
            stats.skipped_count, stats.skipped_percentage
        ));

        lines.push("## Groups\n".to_string());
        for rate in self.group_pass_rates() {
            lines.push(format!(
                "- {}: {} ({}/{})",
                rate.group_name, rate.pass_rate, rate.passed, rate.total
            ));
        }
        lines.push(String::new());

        if !stats.items_requiring_attention.is_empty() {
            lines.push("## Needs Attention\n".to_string());
            for item in &stats.items_requiring_attention {
                lines.push(format!("- {} [{}]: {}", item.name, item.item_type, item.status));
            }
        }

        lines.join("\n")
    }
}

/// Score a submission (see [`ChecklistScorer::calculate`])
pub fn score(checklist: &FullChecklist, answers: &SubmittedAnswers) -> SummaryStatistics {
    ChecklistScorer::new(checklist, answers).calculate()
}

/// Per-group pass rates (see [`ChecklistScorer::group_pass_rates`])
pub fn group_pass_rates(checklist: &FullChecklist, answers: &SubmittedAnswers) -> Vec<GroupPassRate> {
    ChecklistScorer::new(checklist, answers).group_pass_rates()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn format_rate(passed: usize, total: usize) -> String {
    format!("{}%", percentage(passed, total).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, item_type: ChecklistType) -> ChecklistItem {
        ChecklistItem {
            name: format!("Check {}", id),
            serial_no: 1,
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

    fn key(group: &str, item: &str) -> AnswerKey {
        AnswerKey::new(group, item, 1)
    }

    #[test]
    fn test_empty_checklist() {
        let checklist = FullChecklist::default();
        let answers = SubmittedAnswers::new();

        let stats = score(&checklist, &answers);

        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.passed_percentage, 0.0);
        assert_eq!(stats.failed_percentage, 0.0);
        assert_eq!(stats.skipped_percentage, 0.0);
        assert!(stats.items_requiring_attention.is_empty());
        assert!(!stats.all_skipped());
    }

    #[test]
    fn test_mixed_answers_keep_checklist_order() {
        let checklist = FullChecklist::new(vec![group(
            "g",
            vec![
                item("i1", ChecklistType::PassFail),
                item("i2", ChecklistType::YesNo),
                item("i3", ChecklistType::OkayNotOkay),
            ],
        )]);
        let answers = SubmittedAnswers::new()
            .with(key("g", "i1"), Some("Fail"))
            .with(key("g", "i2"), None)
            .with(key("g", "i3"), Some("Okay"));

        let stats = score(&checklist, &answers);

        assert_eq!(stats.passed_count, 1);
        assert_eq!(stats.failed_count, 1);
        assert_eq!(stats.skipped_count, 1);
        let names: Vec<_> = stats
            .items_requiring_attention
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Check i1", "Check i2"]);
        assert_eq!(stats.items_requiring_attention[0].status, ItemStatus::Failed);
        assert_eq!(stats.items_requiring_attention[1].status, ItemStatus::Skipped);
    }

    #[test]
    fn test_unanswered_items_count_as_skipped() {
        let checklist = FullChecklist::new(vec![group(
            "g",
            vec![item("i1", ChecklistType::PassFail), item("i2", ChecklistType::PassFail)],
        )]);
        let answers = SubmittedAnswers::new().with(key("g", "i1"), Some("Pass"));

        let stats = score(&checklist, &answers);

        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.skipped_count, 1);
        assert_eq!(stats.passed_percentage, 50.0);
    }

    #[test]
    fn test_group_pass_rates() {
        let checklist = FullChecklist::new(vec![
            group(
                "a",
                vec![
                    item("1", ChecklistType::PassFail),
                    item("2", ChecklistType::PassFail),
                    item("3", ChecklistType::PassFail),
                    item("4", ChecklistType::PassFail),
                ],
            ),
            group("b", vec![]),
            group(
                "c",
                vec![
                    item("1", ChecklistType::YesNo),
                    item("2", ChecklistType::YesNo),
                    item("3", ChecklistType::YesNo),
                ],
            ),
        ]);
        let answers = SubmittedAnswers::new()
            .with(key("a", "1"), Some("Pass"))
            .with(key("a", "2"), Some("Pass"))
            .with(key("a", "3"), Some("Pass"))
            .with(key("a", "4"), Some("Fail"))
            .with(key("c", "1"), Some("Yes"))
            .with(key("c", "2"), Some("Yes"));

        let rates = group_pass_rates(&checklist, &answers);

        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].pass_rate, "75%");
        assert_eq!(rates[1].pass_rate, "0%");
        assert_eq!(rates[2].pass_rate, "67%");
        assert_eq!(rates[2].group_name, "Group c");
    }

    #[test]
    fn test_explain_lists_groups_and_attention() {
        let checklist = FullChecklist::new(vec![group(
            "g",
            vec![item("i1", ChecklistType::PassFail), item("i2", ChecklistType::YesNo)],
        )]);
        let answers = SubmittedAnswers::new()
            .with(key("g", "i1"), Some("Pass"))
            .with(key("g", "i2"), Some("No"));
        let scorer = ChecklistScorer::new(&checklist, &answers);

        let text = scorer.explain(&scorer.calculate());

        assert!(text.contains("# Inspection Score: 1/2 passed (50%)"));
        assert!(text.contains("- Group g: 50% (1/2)"));
        assert!(text.contains("- Check i2 [Yes/No]: failed"));
    }
}
