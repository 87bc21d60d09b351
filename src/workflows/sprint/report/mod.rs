mod summary;
mod table;
mod theme;

pub use theme::{ReportTheme, StatusTone, Tone};

use super::{SprintAnalysis, SprintMetadata};
use crate::config::DEFAULT_JIRA_BASE_URL;
use chrono::NaiveDate;
use rust_xlsxwriter::{ColNum, Workbook, XlsxError};
use tracing::info;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub jira_base_url: String,
    pub theme: ReportTheme,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            jira_base_url: DEFAULT_JIRA_BASE_URL.to_string(),
            theme: ReportTheme::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportRenderError {
    #[error("failed to build workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

pub fn report_file_name(sprint_number: u32) -> String {
    format!("Sprint_{sprint_number}_Report.xlsx")
}

pub fn sheet_name(sprint_number: u32) -> String {
    format!("Sprint {sprint_number} - Report")
}

/// Lays out the sprint summary block and the task table on one worksheet.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn build(
        &self,
        metadata: &SprintMetadata,
        analysis: &SprintAnalysis,
        today: NaiveDate,
    ) -> Result<RenderedReport, ReportRenderError> {
        let ReportOptions {
            jira_base_url,
            theme,
        } = &self.options;

        let mut workbook = Workbook::new();
        let worksheet = workbook
            .add_worksheet()
            .set_name(sheet_name(metadata.sprint_number))?;

        summary::write_summary_block(worksheet, theme, metadata, &analysis.kpis, today)?;
        let next_row =
            table::write_task_table(worksheet, theme, jira_base_url, &analysis.hierarchy)?;

        for (col, width) in table::COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as ColNum, *width)?;
        }
        worksheet.set_freeze_panes(table::FIRST_ENTRY_ROW, 0)?;

        let bytes = workbook.save_to_buffer()?;
        info!(
            sprint = metadata.sprint_number,
            table_rows = next_row - table::FIRST_ENTRY_ROW,
            bytes = bytes.len(),
            "rendered sprint report"
        );

        Ok(RenderedReport {
            file_name: report_file_name(metadata.sprint_number),
            bytes,
        })
    }
}
