use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use sprint_report::config::AppConfig;
use sprint_report::error::AppError;
use sprint_report::workflows::jira::JiraExportImporter;
use sprint_report::workflows::sprint::{
    ExportOverview, HierarchyEntry, HierarchyLevel, ReportBuilder, SprintAnalysis, SprintMetadata,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Jira "Export Issues → CSV (all fields)" file
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Skip the indented hierarchy listing
    #[arg(long)]
    pub(crate) summary_only: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Jira "Export Issues → CSV (all fields)" file
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long)]
    pub(crate) sprint_number: u32,
    /// Sprint start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) sprint_start: NaiveDate,
    /// Development release date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) dev_release: NaiveDate,
    /// QA release date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) qa_release: NaiveDate,
    /// Production release date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) prod_release: NaiveDate,
    /// Sprint end date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) sprint_end: NaiveDate,
    #[arg(long)]
    pub(crate) scrum_master: String,
    #[arg(long, default_value = "")]
    pub(crate) sprint_goal: String,
    /// Major sprint item; repeat up to three times
    #[arg(long)]
    pub(crate) major_item: Vec<String>,
    /// Reporting date used for "days left" (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Output path (defaults to Sprint_<n>_Report.xlsx in the working directory)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

impl ReportArgs {
    fn metadata(&self) -> SprintMetadata {
        SprintMetadata {
            sprint_number: self.sprint_number,
            sprint_start: self.sprint_start,
            dev_release: self.dev_release,
            qa_release: self.qa_release,
            prod_release: self.prod_release,
            sprint_end: self.sprint_end,
            scrum_master: self.scrum_master.clone(),
            sprint_goal: self.sprint_goal.clone(),
            major_items: self.major_item.clone(),
        }
        .normalized()
    }
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let rows = JiraExportImporter::from_path(&args.csv)?;
    let overview = ExportOverview::from_rows(&rows);
    let analysis = SprintAnalysis::from_rows(&rows);

    println!("Jira export: {}", args.csv.display());
    render_overview(&overview);
    render_analysis(&analysis, args.summary_only);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let metadata = args.metadata();
    metadata.validate()?;

    let config = AppConfig::load()?;
    let rows = JiraExportImporter::from_path(&args.csv)?;
    let analysis = SprintAnalysis::from_rows(&rows);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let report = ReportBuilder::new(config.report.report_options()).build(
        &metadata,
        &analysis,
        today,
    )?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&report.file_name));
    std::fs::write(&out, &report.bytes)?;

    println!(
        "Sprint {} report written to {} ({} action items, {} production release)",
        metadata.sprint_number,
        out.display(),
        analysis.kpis.action_items,
        analysis.kpis.production_release_pct
    );
    Ok(())
}

fn render_overview(overview: &ExportOverview) {
    println!(
        "- {} rows | {} epics | {} stories | {} sub-tasks",
        overview.total_rows, overview.epics, overview.stories, overview.subtasks
    );
    if overview.status_breakdown.is_empty() {
        return;
    }
    println!("Status breakdown:");
    for entry in &overview.status_breakdown {
        let label = if entry.status.is_empty() {
            "(no status)"
        } else {
            entry.status.as_str()
        };
        println!("  - {}: {}", label, entry.count);
    }
}

fn render_analysis(analysis: &SprintAnalysis, summary_only: bool) {
    println!("\nKPIs:");
    for entry in analysis.kpis.entries() {
        println!("  - {}: {}", entry.label, entry.value);
    }

    if summary_only {
        return;
    }
    if analysis.hierarchy.is_empty() {
        println!("\nNo epics, stories or sub-tasks found.");
        return;
    }

    println!("\nHierarchy:");
    for entry in analysis.hierarchy.entries() {
        match entry {
            HierarchyEntry::Spacer => println!(),
            HierarchyEntry::Node(node) => {
                let indent = match node.level {
                    HierarchyLevel::Group => "",
                    HierarchyLevel::Item => "  ",
                    HierarchyLevel::SubTask => "    ",
                };
                let status = if node.status.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", node.status)
                };
                println!(
                    "{indent}{} {} | {}{status}",
                    node.issue_key, node.issue_type, node.summary
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ReportArgs {
        let date = |day| NaiveDate::from_ymd_opt(2026, 2, day).expect("valid date");
        ReportArgs {
            csv: PathBuf::from("export.csv"),
            sprint_number: 27,
            sprint_start: date(2),
            dev_release: date(18),
            qa_release: date(20),
            prod_release: date(22),
            sprint_end: date(22),
            scrum_master: "  Avery Quinn ".to_string(),
            sprint_goal: String::new(),
            major_item: vec!["Checkout".to_string(), "  ".to_string()],
            today: None,
            out: None,
        }
    }

    #[test]
    fn metadata_is_normalized_from_flags() {
        let metadata = args().metadata();
        assert_eq!(metadata.scrum_master, "Avery Quinn");
        assert_eq!(metadata.major_items, ["Checkout"]);
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn report_stops_on_invalid_metadata_before_reading_the_export() {
        let mut args = args();
        args.sprint_number = 0;
        args.csv = PathBuf::from("does/not/exist.csv");

        let err = run_report(args).expect_err("metadata rejected");
        assert!(matches!(err, AppError::Metadata(_)));
    }

    #[test]
    fn analyze_surfaces_missing_files_as_import_errors() {
        let err = run_analyze(AnalyzeArgs {
            csv: PathBuf::from("does/not/exist.csv"),
            summary_only: true,
        })
        .expect_err("missing file");
        assert!(matches!(err, AppError::Import(_)));
    }
}
