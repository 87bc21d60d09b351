use super::theme::{ReportTheme, StatusTone, Tone};
use crate::workflows::sprint::domain::date_label;
use crate::workflows::sprint::hierarchy::{
    Hierarchy, HierarchyEntry, HierarchyLevel, HierarchyNode, UNLINKED_GROUP_KEY,
};
use rust_xlsxwriter::{
    ColNum, Color, Format, FormatAlign, FormatBorder, FormatUnderline, RowNum, Url, Worksheet,
    XlsxError,
};

pub(super) const HEADER_ROW: RowNum = 14;
pub(super) const FIRST_ENTRY_ROW: RowNum = 15;

pub(super) const COLUMNS: [&str; 9] = [
    "Issue Key",
    "URL",
    "Issue Type",
    "Summary / Title",
    "Status",
    "Priority",
    "Assignee",
    "Projected Start",
    "Projected End",
];

pub(super) const COLUMN_WIDTHS: [f64; 11] = [
    14.0, 50.0, 14.0, 58.0, 16.0, 13.0, 24.0, 16.0, 16.0, 14.0, 24.0,
];

const URL_COL: ColNum = 1;
const SUMMARY_COL: ColNum = 3;
const STATUS_COL: ColNum = 4;

/// Per-level look of a task table row.
struct RowStyle {
    tone: Tone,
    bold: bool,
    size: f64,
    height: f64,
    epic_border: bool,
}

impl RowStyle {
    fn for_level(level: HierarchyLevel, theme: &ReportTheme) -> Self {
        match level {
            HierarchyLevel::Group => Self {
                tone: theme.epic,
                bold: true,
                size: 11.0,
                height: 28.0,
                epic_border: true,
            },
            HierarchyLevel::Item => Self {
                tone: theme.story,
                bold: true,
                size: 10.0,
                height: 22.0,
                epic_border: false,
            },
            HierarchyLevel::SubTask => Self {
                tone: theme.subtask,
                bold: false,
                size: 9.0,
                height: 18.0,
                epic_border: false,
            },
        }
    }

    fn bordered(&self, format: Format, theme: &ReportTheme) -> Format {
        if self.epic_border {
            format
                .set_border(FormatBorder::Medium)
                .set_border_color(Color::RGB(theme.epic.fill))
        } else {
            format
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::RGB(theme.row_border))
        }
    }

    fn cell(&self, theme: &ReportTheme, wrap: bool) -> Format {
        let format = theme
            .font(self.tone.text, self.size)
            .set_background_color(Color::RGB(self.tone.fill))
            .set_align(FormatAlign::VerticalCenter);
        let format = if self.bold { format.set_bold() } else { format };
        let format = if wrap { format.set_text_wrap() } else { format };
        self.bordered(format, theme)
    }

    fn link(&self, theme: &ReportTheme) -> Format {
        let format = theme
            .font(theme.link_text, self.size)
            .set_underline(FormatUnderline::Single)
            .set_background_color(Color::RGB(self.tone.fill))
            .set_align(FormatAlign::VerticalCenter);
        self.bordered(format, theme)
    }

    fn status(&self, theme: &ReportTheme, status: &str) -> Format {
        let tone = theme.status_tone(StatusTone::classify(status));
        let format = theme
            .font(tone.text, self.size)
            .set_bold()
            .set_background_color(Color::RGB(tone.fill))
            .set_align(FormatAlign::VerticalCenter);
        self.bordered(format, theme)
    }
}

/// Summary as displayed: indented by level, group headers upper-cased.
pub(super) fn display_summary(node: &HierarchyNode) -> String {
    match node.level {
        HierarchyLevel::Group => format!("\u{2B1B}  {}", node.summary.to_uppercase()),
        HierarchyLevel::Item => format!("    \u{25B6}  {}", node.summary),
        HierarchyLevel::SubTask => format!("         \u{25E6}  {}", node.summary),
    }
}

pub(super) fn issue_url(base_url: &str, node: &HierarchyNode) -> Option<String> {
    (node.issue_key != UNLINKED_GROUP_KEY).then(|| format!("{}/{}", base_url, node.issue_key))
}

fn write_text(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    if text.is_empty() {
        worksheet.write_blank(row, col, format)?;
    } else {
        worksheet.write_string_with_format(row, col, text, format)?;
    }
    Ok(())
}

/// Writes the task table header and one row per hierarchy entry. Returns the next free row.
pub(super) fn write_task_table(
    worksheet: &mut Worksheet,
    theme: &ReportTheme,
    base_url: &str,
    hierarchy: &Hierarchy,
) -> Result<RowNum, XlsxError> {
    let header = theme.header(theme.table_header);
    for (col, label) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as ColNum, *label, &header)?;
    }
    worksheet.set_row_height(HEADER_ROW, 28)?;

    let spacer = theme.fill(theme.spacer_fill);
    let mut row = FIRST_ENTRY_ROW;
    for entry in hierarchy.entries() {
        match entry {
            HierarchyEntry::Spacer => {
                worksheet.set_row_height(row, 8)?;
                for col in 0..COLUMNS.len() as ColNum {
                    worksheet.write_blank(row, col, &spacer)?;
                }
            }
            HierarchyEntry::Node(node) => write_node(worksheet, theme, base_url, row, node)?,
        }
        row += 1;
    }

    Ok(row)
}

fn write_node(
    worksheet: &mut Worksheet,
    theme: &ReportTheme,
    base_url: &str,
    row: RowNum,
    node: &HierarchyNode,
) -> Result<(), XlsxError> {
    let style = RowStyle::for_level(node.level, theme);
    worksheet.set_row_height(row, style.height)?;

    let plain = style.cell(theme, false);
    let values: [(ColNum, String); 7] = [
        (0, node.issue_key.clone()),
        (2, node.issue_type.clone()),
        (5, node.priority.clone()),
        (6, node.assignee.clone()),
        (7, date_label(node.target_start)),
        (8, date_label(node.target_end)),
        (SUMMARY_COL, display_summary(node)),
    ];
    for (col, value) in &values {
        let format = if *col == SUMMARY_COL {
            style.cell(theme, true)
        } else {
            plain.clone()
        };
        write_text(worksheet, row, *col, value, &format)?;
    }

    write_text(
        worksheet,
        row,
        STATUS_COL,
        &node.status,
        &style.status(theme, &node.status),
    )?;

    let link = style.link(theme);
    match issue_url(base_url, node) {
        Some(url) => {
            worksheet.write_url_with_format(row, URL_COL, Url::new(url.as_str()), &link)?;
        }
        None => {
            worksheet.write_blank(row, URL_COL, &link)?;
        }
    }

    Ok(())
}
