use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

pub const UNASSIGNED: &str = "Unassigned";
pub const DATE_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueType {
    Epic,
    Story,
    Task,
    Bug,
    Improvement,
    NewFeature,
    SubTask,
    Other(String),
}

impl IssueType {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Epic" => Self::Epic,
            "Story" => Self::Story,
            "Task" => Self::Task,
            "Bug" => Self::Bug,
            "Improvement" => Self::Improvement,
            "New Feature" => Self::NewFeature,
            "Sub-task" => Self::SubTask,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Epic => "Epic",
            Self::Story => "Story",
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Improvement => "Improvement",
            Self::NewFeature => "New Feature",
            Self::SubTask => "Sub-task",
            Self::Other(label) => label,
        }
    }

    pub fn role(&self) -> Option<IssueRole> {
        match self {
            Self::Epic => Some(IssueRole::Epic),
            Self::Story | Self::Task | Self::Bug | Self::Improvement | Self::NewFeature => {
                Some(IssueRole::Story)
            }
            Self::SubTask => Some(IssueRole::SubTask),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for IssueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Placement class derived from the issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueRole {
    Epic,
    Story,
    SubTask,
}

/// One record of a Jira export, already cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    pub key: String,
    pub issue_type: IssueType,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub parent_key: Option<String>,
    pub target_start: Option<NaiveDate>,
    pub target_end: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub latest_comment: String,
}

impl IssueRow {
    /// Bare row with the given identity; remaining fields take their "absent" values.
    pub fn new(key: impl Into<String>, issue_type: IssueType) -> Self {
        Self {
            key: key.into(),
            issue_type,
            summary: String::new(),
            status: String::new(),
            priority: String::new(),
            assignee: UNASSIGNED.to_string(),
            parent_key: None,
            target_start: None,
            target_end: None,
            due_date: None,
            latest_comment: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_parent(mut self, parent_key: impl Into<String>) -> Self {
        let parent_key = parent_key.into();
        self.parent_key = (!parent_key.is_empty()).then_some(parent_key);
        self
    }

    pub fn role(&self) -> Option<IssueRole> {
        self.issue_type.role()
    }

    pub fn is_epic(&self) -> bool {
        self.role() == Some(IssueRole::Epic)
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }
}

/// Renders an optional date the way the report shows it (`24 Sep 2025` or `-`).
pub fn date_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

pub(crate) fn serialize_date_label<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date_label(*date))
}
