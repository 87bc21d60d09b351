use super::domain::IssueRow;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Status groupings reported on the sprint summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    NotInitiated,
    InProgress,
    Staging,
    QaReview,
    QaDeployed,
    QaApproved,
    Production,
    OnHold,
    AnotherSprint,
}

impl StatusBucket {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::NotInitiated,
            Self::InProgress,
            Self::Staging,
            Self::QaReview,
            Self::QaDeployed,
            Self::QaApproved,
            Self::Production,
            Self::OnHold,
            Self::AnotherSprint,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotInitiated => "Not Initiated",
            Self::InProgress => "In Progress",
            Self::Staging => "Staging",
            Self::QaReview => "QA Review",
            Self::QaDeployed => "QA Deployed",
            Self::QaApproved => "QA Approved",
            Self::Production => "Production",
            Self::OnHold => "On Hold",
            Self::AnotherSprint => "To Be Picked In Another Sprint",
        }
    }

    /// Jira status labels that count toward this bucket.
    pub const fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Self::NotInitiated => &["To Do", "Not Initiated", "Open"],
            Self::InProgress => &["In Progress"],
            Self::Staging => &["Staging Deployed", "Staging"],
            Self::QaReview => &["QA Review", "In Review"],
            Self::QaDeployed => &["QA Deployed"],
            Self::QaApproved => &["QA Approved"],
            Self::Production => &["Done", "Production", "Released", "Closed"],
            Self::OnHold => &["On Hold", "Blocked"],
            Self::AnotherSprint => &["To Be Picked In Another Sprint", "Deferred"],
        }
    }

    /// Case-insensitive substring match; a status may match several buckets.
    pub fn matches(self, status: &str) -> bool {
        let status = status.to_lowercase();
        self.vocabulary()
            .iter()
            .any(|label| status.contains(&label.to_lowercase()))
    }
}

/// A share of the action items, rounded to two decimals.
///
/// `None` means there was nothing to divide by; it reads as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(Option<f64>);

impl Percentage {
    pub fn of(part: usize, total: usize) -> Self {
        if total == 0 {
            return Self(None);
        }
        Self(Some(round2(part as f64 / total as f64 * 100.0)))
    }

    pub fn value(self) -> f64 {
        self.0.unwrap_or(0.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("0%"),
            Some(value) if value.fract() == 0.0 => write!(f, "{value:.1}%"),
            Some(value) => write!(f, "{value}%"),
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Two-decimal rounding of the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpiValue {
    Count(usize),
    Percent(Percentage),
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Count(count) => write!(f, "{count}"),
            KpiValue::Percent(pct) => write!(f, "{pct}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub value: KpiValue,
}

/// Sprint-wide counters. Epics never count; everything else does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SprintKpis {
    pub action_items: usize,
    pub pending_pct: Percentage,
    pub not_initiated_pct: Percentage,
    pub production_release_pct: Percentage,
    pub pending_action_items: usize,
    pub not_initiated: usize,
    pub in_progress: usize,
    pub staging: usize,
    pub qa_review: usize,
    pub qa_deployed: usize,
    pub qa_approved: usize,
    pub production: usize,
    pub on_hold: usize,
    pub to_be_picked: usize,
}

impl SprintKpis {
    pub fn bucket_count(&self, bucket: StatusBucket) -> usize {
        match bucket {
            StatusBucket::NotInitiated => self.not_initiated,
            StatusBucket::InProgress => self.in_progress,
            StatusBucket::Staging => self.staging,
            StatusBucket::QaReview => self.qa_review,
            StatusBucket::QaDeployed => self.qa_deployed,
            StatusBucket::QaApproved => self.qa_approved,
            StatusBucket::Production => self.production,
            StatusBucket::OnHold => self.on_hold,
            StatusBucket::AnotherSprint => self.to_be_picked,
        }
    }

    /// Named values in reporting order.
    pub fn entries(&self) -> Vec<KpiEntry> {
        let count = |name, label, value| KpiEntry {
            name,
            label,
            value: KpiValue::Count(value),
        };
        let percent = |name, label, value| KpiEntry {
            name,
            label,
            value: KpiValue::Percent(value),
        };

        vec![
            count("action_items", "Action Items", self.action_items),
            percent("pending_pct", "Pending %", self.pending_pct),
            percent("not_initiated_pct", "Not Initiated %", self.not_initiated_pct),
            percent(
                "production_release_pct",
                "Production Release %",
                self.production_release_pct,
            ),
            count(
                "pending_action_items",
                "Pending Action Items",
                self.pending_action_items,
            ),
            count("not_initiated", "Not Initiated", self.not_initiated),
            count("in_progress", "In Progress", self.in_progress),
            count("staging", "Staging", self.staging),
            count("qa_review", "QA Review", self.qa_review),
            count("qa_deployed", "QA Deployed", self.qa_deployed),
            count("qa_approved", "QA Approved", self.qa_approved),
            count("production", "Production", self.production),
            count("on_hold", "On Hold", self.on_hold),
            count(
                "to_be_picked",
                "To Be Picked In Another Sprint",
                self.to_be_picked,
            ),
        ]
    }
}

/// Counts status buckets over all non-epic rows.
pub fn aggregate(rows: &[IssueRow]) -> SprintKpis {
    let action_rows: Vec<&IssueRow> = rows.iter().filter(|row| !row.is_epic()).collect();
    let total = action_rows.len();

    let count = |bucket: StatusBucket| {
        action_rows
            .iter()
            .filter(|row| bucket.matches(&row.status))
            .count()
    };

    let not_initiated = count(StatusBucket::NotInitiated);
    let production = count(StatusBucket::Production);

    let kpis = SprintKpis {
        action_items: total,
        // Pending currently mirrors not-initiated.
        pending_pct: Percentage::of(not_initiated, total),
        not_initiated_pct: Percentage::of(not_initiated, total),
        production_release_pct: Percentage::of(production, total),
        pending_action_items: not_initiated,
        not_initiated,
        in_progress: count(StatusBucket::InProgress),
        staging: count(StatusBucket::Staging),
        qa_review: count(StatusBucket::QaReview),
        qa_deployed: count(StatusBucket::QaDeployed),
        qa_approved: count(StatusBucket::QaApproved),
        production,
        on_hold: count(StatusBucket::OnHold),
        to_be_picked: count(StatusBucket::AnotherSprint),
    };

    debug!(
        action_items = kpis.action_items,
        not_initiated = kpis.not_initiated,
        production = kpis.production,
        "aggregated sprint kpis"
    );

    kpis
}

/// Action items per sprint day, rounded to two decimals; zero for an empty sprint.
pub fn daily_task_count(action_items: usize, total_days: i64) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    round2(action_items as f64 / total_days as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sprint::domain::IssueType;

    fn task(key: &str, status: &str) -> IssueRow {
        IssueRow::new(key, IssueType::Task).with_status(status)
    }

    #[test]
    fn rounding_uses_the_stored_value_with_ties_to_even() {
        assert_eq!(Percentage::of(1, 32).to_string(), "3.12%");
        assert_eq!(Percentage::of(3, 32).to_string(), "9.38%");
        assert_eq!(daily_task_count(1, 8), 0.12);
        assert_eq!(daily_task_count(3, 8), 0.38);
        assert_eq!(daily_task_count(3, 21), 0.14);
    }

    #[test]
    fn thirty_percent_not_initiated() {
        let mut rows: Vec<IssueRow> = (0..3).map(|i| task(&format!("T{i}"), "To Do")).collect();
        rows.extend((3..10).map(|i| task(&format!("T{i}"), "Done")));

        let kpis = aggregate(&rows);

        assert_eq!(kpis.action_items, 10);
        assert_eq!(kpis.not_initiated, 3);
        assert_eq!(kpis.pending_pct.to_string(), "30.0%");
        assert_eq!(kpis.not_initiated_pct.to_string(), "30.0%");
        assert_eq!(kpis.production_release_pct.to_string(), "70.0%");
    }

    #[test]
    fn epics_are_excluded_but_unknown_types_count() {
        let rows = vec![
            IssueRow::new("E1", IssueType::Epic).with_status("To Do"),
            IssueRow::new("X1", IssueType::Other("Spike".into())).with_status("Open"),
            task("T1", "In Progress"),
        ];

        let kpis = aggregate(&rows);

        assert_eq!(kpis.action_items, 2);
        assert_eq!(kpis.not_initiated, 1);
        assert_eq!(kpis.in_progress, 1);
    }

    #[test]
    fn matching_ignores_case_and_uses_substrings() {
        assert!(StatusBucket::NotInitiated.matches("TO DO"));
        assert!(StatusBucket::Staging.matches("Staging Deployed"));
        assert!(StatusBucket::QaReview.matches("in review"));
        assert!(StatusBucket::Production.matches("Closed - Won't Fix"));
        assert!(!StatusBucket::OnHold.matches("Done"));
    }

    #[test]
    fn unmatched_statuses_only_count_toward_total() {
        let rows = vec![task("T1", "Triage"), task("T2", "Done")];

        let kpis = aggregate(&rows);
        let bucketed: usize = StatusBucket::ordered()
            .into_iter()
            .map(|bucket| kpis.bucket_count(bucket))
            .sum();

        assert_eq!(kpis.action_items, 2);
        assert_eq!(bucketed, 1);
    }

    #[test]
    fn empty_export_has_zero_percentages() {
        let kpis = aggregate(&[IssueRow::new("E1", IssueType::Epic)]);

        assert_eq!(kpis.action_items, 0);
        assert_eq!(kpis.pending_pct.value(), 0.0);
        assert_eq!(kpis.pending_pct.to_string(), "0%");
        assert_eq!(kpis.production_release_pct.value(), 0.0);
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(Percentage::of(1, 3).to_string(), "33.33%");
        assert_eq!(Percentage::of(2, 3).to_string(), "66.67%");
        assert_eq!(Percentage::of(3, 3).to_string(), "100.0%");
    }

    #[test]
    fn daily_task_count_guards_empty_sprints() {
        assert_eq!(daily_task_count(10, 3), 3.33);
        assert_eq!(daily_task_count(10, 0), 0.0);
        assert_eq!(daily_task_count(10, -2), 0.0);
    }

    #[test]
    fn entries_serialize_counts_and_percent_strings() {
        let kpis = aggregate(&[task("T1", "Done")]);
        let entries = kpis.entries();

        assert_eq!(entries.len(), 14);
        assert_eq!(entries[0].name, "action_items");
        let json = serde_json::to_value(&kpis).expect("serializes");
        assert_eq!(json["action_items"], 1);
        assert_eq!(json["production_release_pct"], "100.0%");
    }
}
