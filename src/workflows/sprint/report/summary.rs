use super::theme::ReportTheme;
use crate::workflows::sprint::domain::date_label;
use crate::workflows::sprint::kpi::{daily_task_count, StatusBucket};
use crate::workflows::sprint::{SprintKpis, SprintMetadata};
use chrono::NaiveDate;
use rust_xlsxwriter::{ColNum, Format, RowNum, Worksheet, XlsxError};

pub(super) const LEGEND: &str =
    "\u{1F7E1} Yellow = Manual Input   |   Auto-calculated fields derived from Jira CSV";

const METADATA_COLUMNS: ColNum = 8;
const STATUS_COLUMNS: ColNum = 11;

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

fn number(value: impl Into<f64>) -> Cell {
    Cell::Number(value.into())
}

fn count(value: usize) -> Cell {
    Cell::Number(value as f64)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
    format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Text(text) if text.is_empty() => worksheet.write_blank(row, col, format)?,
        Cell::Text(text) => worksheet.write_string_with_format(row, col, text, format)?,
        Cell::Number(value) => worksheet.write_number_with_format(row, col, *value, format)?,
    };
    Ok(())
}

fn fill_row(
    worksheet: &mut Worksheet,
    row: RowNum,
    cols: std::ops::Range<ColNum>,
    format: &Format,
) -> Result<(), XlsxError> {
    for col in cols {
        worksheet.write_blank(row, col, format)?;
    }
    Ok(())
}

fn spacer_row(
    worksheet: &mut Worksheet,
    theme: &ReportTheme,
    row: RowNum,
    width: ColNum,
) -> Result<(), XlsxError> {
    worksheet.set_row_height(row, 6)?;
    fill_row(worksheet, row, 0..width, &theme.fill(theme.neutral_fill))
}

/// Writes rows 1–14: sprint details, KPIs, status counts, goal and legend.
pub(super) fn write_summary_block(
    worksheet: &mut Worksheet,
    theme: &ReportTheme,
    metadata: &SprintMetadata,
    kpis: &SprintKpis,
    today: NaiveDate,
) -> Result<(), XlsxError> {
    let total_days = metadata.total_days();

    let metadata_cells: [(&str, Cell); 8] = [
        ("Sprint Number", number(metadata.sprint_number)),
        ("Sprint Start Date", date_label(Some(metadata.sprint_start)).into()),
        (
            "Sprint Development Release",
            date_label(Some(metadata.dev_release)).into(),
        ),
        ("Sprint QA Release", date_label(Some(metadata.qa_release)).into()),
        (
            "Production Release",
            date_label(Some(metadata.prod_release)).into(),
        ),
        ("Sprint End Date", date_label(Some(metadata.sprint_end)).into()),
        ("Total No. of Days", Cell::Number(total_days as f64)),
        ("Scrum Master", metadata.scrum_master.as_str().into()),
    ];
    let manual_value = theme.value(theme.manual_input_fill, true, 10.0, false);
    for (col, ((label, value), fill)) in metadata_cells
        .iter()
        .zip(theme.metadata_headers)
        .enumerate()
    {
        let col = col as ColNum;
        worksheet.write_string_with_format(0, col, *label, &theme.header(fill))?;
        write_cell(worksheet, 1, col, value, &manual_value)?;
    }
    worksheet.set_row_height(0, 28)?;
    worksheet.set_row_height(1, 22)?;

    spacer_row(worksheet, theme, 2, METADATA_COLUMNS)?;

    let kpi_cells: [(&str, Cell); 5] = [
        (
            "No of Days Left in Sprint",
            Cell::Number(metadata.days_left(today) as f64),
        ),
        ("Action Items", count(kpis.action_items)),
        ("Pending %", kpis.pending_pct.to_string().into()),
        ("Not Initiated %", kpis.not_initiated_pct.to_string().into()),
        (
            "Production Release %",
            kpis.production_release_pct.to_string().into(),
        ),
    ];
    let kpi_value = theme.value(theme.value_fill, true, 11.0, false);
    for (col, ((label, value), fill)) in kpi_cells.iter().zip(theme.kpi_headers).enumerate() {
        let col = col as ColNum;
        worksheet.write_string_with_format(3, col, *label, &theme.header(fill))?;
        write_cell(worksheet, 4, col, value, &kpi_value)?;
    }
    let unused = theme.header(theme.unused_header);
    fill_row(worksheet, 3, kpi_cells.len() as ColNum..METADATA_COLUMNS, &unused)?;
    fill_row(
        worksheet,
        4,
        kpi_cells.len() as ColNum..METADATA_COLUMNS,
        &theme.fill(theme.neutral_fill),
    )?;
    worksheet.set_row_height(3, 28)?;
    worksheet.set_row_height(4, 22)?;

    spacer_row(worksheet, theme, 5, METADATA_COLUMNS)?;

    let mut status_cells: Vec<(&str, Cell)> = vec![
        (
            "Daily Task Count",
            number(daily_task_count(kpis.action_items, total_days)),
        ),
        ("Pending Action Items", count(kpis.pending_action_items)),
    ];
    status_cells.extend(
        StatusBucket::ordered()
            .into_iter()
            .map(|bucket| (bucket.label(), count(kpis.bucket_count(bucket)))),
    );
    for (col, ((label, value), fill)) in status_cells
        .iter()
        .zip(theme.status_headers)
        .enumerate()
    {
        let col = col as ColNum;
        worksheet.write_string_with_format(6, col, *label, &theme.header(fill))?;
        write_cell(worksheet, 7, col, value, &kpi_value)?;
    }
    worksheet.set_row_height(6, 36)?;
    worksheet.set_row_height(7, 22)?;

    spacer_row(worksheet, theme, 8, STATUS_COLUMNS)?;

    let neutral = theme.fill(theme.neutral_fill);
    worksheet.write_string_with_format(9, 0, "Sprint Goal", &theme.header(theme.goal_header))?;
    worksheet.write_string_with_format(
        9,
        1,
        "Major Sprint Items",
        &theme.header(theme.major_items_header),
    )?;
    fill_row(worksheet, 9, 2..STATUS_COLUMNS, &neutral)?;
    worksheet.set_row_height(9, 24)?;

    let major_value = theme.value(theme.manual_input_fill, false, 9.0, true);
    for slot in 0..3usize {
        let row = 10 + slot as RowNum;
        let (goal, goal_fill) = if slot == 0 {
            (metadata.sprint_goal.as_str(), theme.goal_fill)
        } else {
            ("", theme.neutral_fill)
        };
        write_cell(
            worksheet,
            row,
            0,
            &goal.into(),
            &theme.value(goal_fill, false, 9.0, true),
        )?;
        write_cell(
            worksheet,
            row,
            1,
            &metadata.major_item(slot).into(),
            &major_value,
        )?;
        fill_row(worksheet, row, 2..STATUS_COLUMNS, &neutral)?;
        worksheet.set_row_height(row, 20)?;
    }

    worksheet.set_row_height(13, 14)?;
    worksheet.write_string_with_format(
        13,
        0,
        LEGEND,
        &theme.font(theme.legend_text, 8.0).set_italic(),
    )?;

    Ok(())
}
