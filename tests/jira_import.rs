use chrono::NaiveDate;
use sprint_report::workflows::jira::{JiraExportImporter, JiraImportError};
use sprint_report::workflows::sprint::{
    ExportOverview, GroupKind, IssueType, SprintAnalysis, StatusCount,
};
use std::io::Cursor;

/// Trimmed-down "all fields" export: extra columns, quoted commas, a
/// multi-line description and three repeated Comment columns.
const EXPORT: &str = "\u{feff}Summary,Issue key,Issue id,Issue Type,Status,Priority,Assignee,Parent key,Description,Custom field (Target start),Custom field (Target end),Comment,Comment,Comment
Payments revamp,PAY-1,10001,Epic,In Progress,High,Riley Chen,,\"Epic for the new, faster checkout\",02/Feb/26 9:00 AM,20/Feb/26 6:00 PM,,,
Card form,PAY-2,10002,Story,Done,Medium,Dana Ortiz,PAY-1,\"Line one
line two\",02/Feb/26,06/Feb/26,03/Feb/26 10:00 AM;5a1f;Ready for QA,05/Feb/26 4:15 PM;5a1f;Shipped to production,
Validate CVV,PAY-3,10003,Sub-task,QA Review,Low,,PAY-2,,,,,,
Wallet support,PAY-4,10004,Story,To Do,Medium,Riley Chen,CORE-7,,,,,,
Fix typo on receipt,PAY-5,10005,Bug,Staging Deployed,Low,Dana Ortiz,,,,,,,
Old spike,PAY-6,10006,Spike,Done,Low,,,,,,,,
";

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, day).expect("valid date")
}

#[test]
fn imports_realistic_export() {
    let rows = JiraExportImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].issue_type, IssueType::Epic);
    assert_eq!(rows[0].target_start, Some(date(2)));
    assert_eq!(rows[0].target_end, Some(date(20)));
    assert_eq!(rows[1].latest_comment, "Shipped to production");
    assert_eq!(rows[2].assignee, "Unassigned");
    assert_eq!(rows[3].parent_key.as_deref(), Some("CORE-7"));
    assert_eq!(rows[5].issue_type, IssueType::Other("Spike".to_string()));
}

#[test]
fn analysis_of_imported_rows_covers_every_group_kind() {
    let rows = JiraExportImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    let analysis = SprintAnalysis::from_rows(&rows);

    let kinds: Vec<GroupKind> = analysis
        .hierarchy
        .groups()
        .iter()
        .map(|group| group.kind)
        .collect();
    assert_eq!(
        kinds,
        [GroupKind::Epic, GroupKind::ExternalEpic, GroupKind::Unlinked]
    );

    let keys: Vec<&str> = analysis
        .hierarchy
        .nodes()
        .map(|node| node.issue_key.as_str())
        .collect();
    assert_eq!(
        keys,
        ["PAY-1", "PAY-2", "PAY-3", "CORE-7", "PAY-4", "\u{2014}", "PAY-5"]
    );

    // The spike has no hierarchy role but still counts as an action item.
    assert_eq!(analysis.kpis.action_items, 5);
    assert_eq!(analysis.kpis.production, 2);
    assert_eq!(analysis.kpis.production_release_pct.to_string(), "40.0%");
    assert_eq!(analysis.kpis.not_initiated, 1);
    assert_eq!(analysis.kpis.qa_review, 1);
    assert_eq!(analysis.kpis.staging, 1);
}

#[test]
fn overview_matches_upload_preview() {
    let rows = JiraExportImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    let overview = ExportOverview::from_rows(&rows);

    assert_eq!(overview.total_rows, 6);
    assert_eq!(overview.epics, 1);
    assert_eq!(overview.stories, 3);
    assert_eq!(overview.subtasks, 1);
    assert_eq!(
        overview.status_breakdown[0],
        StatusCount {
            status: "Done".to_string(),
            count: 2,
        }
    );
    assert_eq!(overview.status_breakdown.len(), 4);
}

#[test]
fn header_only_export_yields_empty_analysis() {
    let rows = JiraExportImporter::from_reader(Cursor::new(
        "Issue key,Issue Type,Summary,Status\n",
    ))
    .expect("import succeeds");
    let analysis = SprintAnalysis::from_rows(&rows);

    assert!(rows.is_empty());
    assert!(analysis.hierarchy.is_empty());
    assert_eq!(analysis.kpis.action_items, 0);
    assert_eq!(analysis.kpis.pending_pct.to_string(), "0%");
}

#[test]
fn missing_required_columns_are_listed_in_message() {
    let err = JiraExportImporter::from_reader(Cursor::new("Summary,Status\nThing,Done\n"))
        .expect_err("columns missing");

    assert!(matches!(err, JiraImportError::MissingColumns(_)));
    assert_eq!(err.to_string(), "missing columns: Issue key, Issue Type");
}
