use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_MAJOR_ITEMS: usize = 3;
pub const SPRINT_NUMBER_RANGE: std::ops::RangeInclusive<u32> = 1..=999;

/// Details about the sprint itself, supplied alongside the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintMetadata {
    pub sprint_number: u32,
    pub sprint_start: NaiveDate,
    pub dev_release: NaiveDate,
    pub qa_release: NaiveDate,
    pub prod_release: NaiveDate,
    pub sprint_end: NaiveDate,
    pub scrum_master: String,
    #[serde(default)]
    pub sprint_goal: String,
    #[serde(default)]
    pub major_items: Vec<String>,
}

impl SprintMetadata {
    /// Inclusive length of the sprint in days.
    pub fn total_days(&self) -> i64 {
        (self.sprint_end - self.sprint_start).num_days() + 1
    }

    /// Days remaining including `today`, never negative.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        ((self.sprint_end - today).num_days() + 1).max(0)
    }

    /// Major item label by slot; blank when the slot is unused.
    pub fn major_item(&self, slot: usize) -> &str {
        self.major_items.get(slot).map(String::as_str).unwrap_or("")
    }

    /// Trims free-text fields. Major items keep their slot; only trailing blanks are dropped.
    pub fn normalized(mut self) -> Self {
        self.scrum_master = self.scrum_master.trim().to_string();
        self.sprint_goal = self.sprint_goal.trim().to_string();
        let mut items: Vec<String> = self
            .major_items
            .into_iter()
            .map(|item| item.trim().to_string())
            .collect();
        while items.last().is_some_and(|item| item.is_empty()) {
            items.pop();
        }
        self.major_items = items;
        self
    }

    /// Reports every problem at once rather than stopping at the first.
    pub fn validate(&self) -> Result<(), SprintMetadataError> {
        let mut problems = Vec::new();

        if !SPRINT_NUMBER_RANGE.contains(&self.sprint_number) {
            problems.push(MetadataProblem::SprintNumberOutOfRange(self.sprint_number));
        }
        if self.scrum_master.trim().is_empty() {
            problems.push(MetadataProblem::MissingScrumMaster);
        }
        if self.dev_release < self.sprint_start {
            problems.push(MetadataProblem::DevReleaseBeforeStart);
        }
        if self.qa_release < self.dev_release {
            problems.push(MetadataProblem::QaReleaseBeforeDevRelease);
        }
        if self.prod_release < self.qa_release {
            problems.push(MetadataProblem::ProdReleaseBeforeQaRelease);
        }
        if self.sprint_end < self.sprint_start {
            problems.push(MetadataProblem::EndBeforeStart);
        }
        if self.major_items.len() > MAX_MAJOR_ITEMS {
            problems.push(MetadataProblem::TooManyMajorItems(self.major_items.len()));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SprintMetadataError { problems })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataProblem {
    #[error("Sprint number {0} must be between 1 and 999.")]
    SprintNumberOutOfRange(u32),
    #[error("Scrum Master name is required.")]
    MissingScrumMaster,
    #[error("Dev Release cannot be before Sprint Start.")]
    DevReleaseBeforeStart,
    #[error("QA Release cannot be before Dev Release.")]
    QaReleaseBeforeDevRelease,
    #[error("Production Release cannot be before QA Release.")]
    ProdReleaseBeforeQaRelease,
    #[error("Sprint End Date cannot be before Sprint Start.")]
    EndBeforeStart,
    #[error("At most {} major sprint items are allowed, got {0}.", MAX_MAJOR_ITEMS)]
    TooManyMajorItems(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sprint details: {}", joined(.problems))]
pub struct SprintMetadataError {
    pub problems: Vec<MetadataProblem>,
}

fn joined(problems: &[MetadataProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).expect("valid date")
    }

    fn metadata() -> SprintMetadata {
        SprintMetadata {
            sprint_number: 27,
            sprint_start: date(2),
            dev_release: date(18),
            qa_release: date(20),
            prod_release: date(22),
            sprint_end: date(22),
            scrum_master: "Avery Quinn".to_string(),
            sprint_goal: "Rule engine enhancements".to_string(),
            major_items: vec!["Rule builder".to_string()],
        }
    }

    #[test]
    fn day_counts_are_inclusive() {
        let metadata = metadata();
        assert_eq!(metadata.total_days(), 21);
        assert_eq!(metadata.days_left(date(22)), 1);
        assert_eq!(metadata.days_left(date(10)), 13);
        assert_eq!(
            metadata.days_left(NaiveDate::from_ymd_opt(2026, 3, 5).expect("valid date")),
            0
        );
    }

    #[test]
    fn valid_metadata_passes() {
        assert!(metadata().validate().is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut metadata = metadata();
        metadata.scrum_master = "   ".to_string();
        metadata.dev_release = date(1);
        metadata.sprint_end = date(1);
        metadata.sprint_number = 0;

        let err = metadata.validate().expect_err("invalid metadata");

        assert_eq!(
            err.problems,
            vec![
                MetadataProblem::SprintNumberOutOfRange(0),
                MetadataProblem::MissingScrumMaster,
                MetadataProblem::DevReleaseBeforeStart,
                MetadataProblem::EndBeforeStart,
            ]
        );
        assert!(err.to_string().contains("Scrum Master name is required."));
    }

    #[test]
    fn normalized_trims_and_drops_trailing_blank_items() {
        let mut metadata = metadata();
        metadata.major_items = vec![" A ".into(), "".into(), "B".into(), " ".into()];
        metadata.scrum_master = "  Avery  ".into();

        let metadata = metadata.normalized();

        assert_eq!(metadata.major_items, vec!["A", "", "B"]);
        assert_eq!(metadata.scrum_master, "Avery");
        assert_eq!(metadata.major_item(1), "");
        assert_eq!(metadata.major_item(2), "B");
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn problems_render_form_messages() {
        let err = SprintMetadataError {
            problems: vec![
                MetadataProblem::SprintNumberOutOfRange(0),
                MetadataProblem::TooManyMajorItems(4),
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid sprint details: Sprint number 0 must be between 1 and 999. \
At most 3 major sprint items are allowed, got 4."
        );
    }

    #[test]
    fn major_items_keep_their_slot() {
        let mut metadata = metadata();
        metadata.major_items = vec!["".into(), " ".into(), "Search".into()];

        let metadata = metadata.normalized();

        assert_eq!(metadata.major_item(0), "");
        assert_eq!(metadata.major_item(1), "");
        assert_eq!(metadata.major_item(2), "Search");
    }
}
