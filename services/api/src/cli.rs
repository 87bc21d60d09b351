use crate::commands::{run_analyze, run_report, AnalyzeArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sprint_report::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sprint Report",
    about = "Turn Jira CSV exports into sprint hierarchy, KPI and spreadsheet reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the export overview, KPIs and hierarchy for a Jira CSV export
    Analyze(AnalyzeArgs),
    /// Render the sprint spreadsheet report to disk
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args),
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["sprint-report"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_collects_repeated_major_items() {
        let cli = Cli::try_parse_from([
            "sprint-report",
            "report",
            "--csv",
            "export.csv",
            "--sprint-number",
            "27",
            "--sprint-start",
            "2026-02-02",
            "--dev-release",
            "2026-02-18",
            "--qa-release",
            "2026-02-20",
            "--prod-release",
            "2026-02-22",
            "--sprint-end",
            "2026-02-22",
            "--scrum-master",
            "Avery Quinn",
            "--major-item",
            "Checkout",
            "--major-item",
            "Search",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.sprint_number, 27);
                assert_eq!(
                    args.sprint_start,
                    NaiveDate::from_ymd_opt(2026, 2, 2).expect("valid date")
                );
                assert_eq!(args.major_item, ["Checkout", "Search"]);
                assert!(args.out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn report_rejects_non_iso_dates() {
        let result = Cli::try_parse_from([
            "sprint-report",
            "report",
            "--csv",
            "export.csv",
            "--sprint-number",
            "27",
            "--sprint-start",
            "02/Feb/26",
        ]);
        assert!(result.is_err());
    }
}
