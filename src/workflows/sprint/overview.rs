use super::domain::{IssueRole, IssueRow};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Quick shape of an export, shown before the report is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOverview {
    pub total_rows: usize,
    pub epics: usize,
    pub stories: usize,
    pub subtasks: usize,
    /// Non-epic statuses, most frequent first; ties keep first appearance.
    pub status_breakdown: Vec<StatusCount>,
}

impl ExportOverview {
    pub fn from_rows(rows: &[IssueRow]) -> Self {
        let count_role = |role| rows.iter().filter(|row| row.role() == Some(role)).count();

        let mut status_breakdown: Vec<StatusCount> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for row in rows.iter().filter(|row| !row.is_epic()) {
            match slots.get(row.status.as_str()) {
                Some(&slot) => status_breakdown[slot].count += 1,
                None => {
                    slots.insert(row.status.as_str(), status_breakdown.len());
                    status_breakdown.push(StatusCount {
                        status: row.status.clone(),
                        count: 1,
                    });
                }
            }
        }
        // Stable sort keeps first-appearance order among equal counts.
        status_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total_rows: rows.len(),
            epics: count_role(IssueRole::Epic),
            stories: count_role(IssueRole::Story),
            subtasks: count_role(IssueRole::SubTask),
            status_breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sprint::domain::IssueType;

    #[test]
    fn counts_roles_and_ranks_statuses() {
        let rows = vec![
            IssueRow::new("E1", IssueType::Epic).with_status("Done"),
            IssueRow::new("S1", IssueType::Story).with_status("In Progress"),
            IssueRow::new("B1", IssueType::Bug).with_status("To Do"),
            IssueRow::new("T1", IssueType::SubTask).with_status("To Do"),
            IssueRow::new("X1", IssueType::Other("Spike".into())).with_status("Done"),
        ];

        let overview = ExportOverview::from_rows(&rows);

        assert_eq!(overview.total_rows, 5);
        assert_eq!(overview.epics, 1);
        assert_eq!(overview.stories, 2);
        assert_eq!(overview.subtasks, 1);
        let ranked: Vec<(&str, usize)> = overview
            .status_breakdown
            .iter()
            .map(|entry| (entry.status.as_str(), entry.count))
            .collect();
        assert_eq!(ranked, [("To Do", 2), ("In Progress", 1), ("Done", 1)]);
    }
}
