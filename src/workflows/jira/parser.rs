use super::normalizer::{comment_text, is_comment_header, normalize_header};
use super::JiraImportError;
use crate::workflows::sprint::domain::{IssueRow, IssueType, UNASSIGNED};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::io::Read;
use tracing::debug;

pub const REQUIRED_COLUMNS: [&str; 4] = ["Issue key", "Issue Type", "Summary", "Status"];

const PRIORITY: &str = "Priority";
const ASSIGNEE: &str = "Assignee";
const PARENT_KEY: &str = "Parent key";
const TARGET_START: &str = "Custom field (Target start)";
const TARGET_END: &str = "Custom field (Target end)";
const DUE_DATE: &str = "Due date";

const DATETIME_FORMATS: &[&str] = &[
    "%d/%b/%y %I:%M %p",
    "%d/%b/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%d/%b/%y", "%d/%b/%Y", "%Y-%m-%d", "%d %b %Y"];

/// Column positions resolved once from the header row.
#[derive(Debug)]
struct ColumnLayout {
    key: usize,
    issue_type: usize,
    summary: usize,
    status: usize,
    priority: Option<usize>,
    assignee: Option<usize>,
    parent_key: Option<usize>,
    target_start: Option<usize>,
    target_end: Option<usize>,
    due_date: Option<usize>,
    comments: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self, JiraImportError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let position = |wanted: &str| names.iter().position(|name| name == wanted);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&column| position(column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(JiraImportError::MissingColumns(missing));
        }

        let required = |wanted: &str| {
            position(wanted).ok_or_else(|| JiraImportError::MissingColumns(vec![wanted.to_string()]))
        };

        Ok(Self {
            key: required(REQUIRED_COLUMNS[0])?,
            issue_type: required(REQUIRED_COLUMNS[1])?,
            summary: required(REQUIRED_COLUMNS[2])?,
            status: required(REQUIRED_COLUMNS[3])?,
            priority: position(PRIORITY),
            assignee: position(ASSIGNEE),
            parent_key: position(PARENT_KEY),
            target_start: position(TARGET_START),
            target_end: position(TARGET_END),
            due_date: position(DUE_DATE),
            comments: names
                .iter()
                .enumerate()
                .filter(|(_, name)| is_comment_header(name))
                .map(|(index, _)| index)
                .collect(),
        })
    }

    fn row(&self, record: &StringRecord) -> IssueRow {
        let cell = |index: usize| record.get(index).unwrap_or("").trim();
        let optional = |index: Option<usize>| index.map(cell).unwrap_or("");
        let date = |index: Option<usize>| parse_date(optional(index));

        let assignee = optional(self.assignee);
        let parent_key = optional(self.parent_key);
        let latest_comment = self
            .comments
            .iter()
            .map(|&index| cell(index))
            .filter(|value| !value.is_empty())
            .last()
            .map(comment_text)
            .unwrap_or_default();

        IssueRow {
            key: cell(self.key).to_string(),
            issue_type: IssueType::from_label(cell(self.issue_type)),
            summary: cell(self.summary).to_string(),
            status: cell(self.status).to_string(),
            priority: optional(self.priority).to_string(),
            assignee: if assignee.is_empty() {
                UNASSIGNED.to_string()
            } else {
                assignee.to_string()
            },
            parent_key: (!parent_key.is_empty()).then(|| parent_key.to_string()),
            target_start: date(self.target_start),
            target_end: date(self.target_end),
            due_date: date(self.due_date),
            latest_comment,
        }
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<IssueRow>, JiraImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::resolve(csv_reader.headers()?)?;
    let mut rows = Vec::new();

    for (line, record) in csv_reader.records().enumerate() {
        let row = layout.row(&record?);
        if row.key.is_empty() {
            debug!(line = line + 2, "skipping export row without an issue key");
            continue;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), comment_columns = layout.comments.len(), "parsed jira export");
    Ok(rows)
}

/// Parses the date formats Jira and spreadsheet tools write; anything else is `None`.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        })
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
