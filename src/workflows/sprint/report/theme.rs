use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

/// Fill and font colour pair, as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub fill: u32,
    pub text: u32,
}

/// Colours and fonts used by the rendered workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTheme {
    pub font_name: String,
    pub header_text: u32,
    pub value_text: u32,
    pub value_fill: u32,
    pub value_border: u32,
    /// Sprint number, start, dev release, QA release, production release, end, total days, scrum master.
    pub metadata_headers: [u32; 8],
    /// Days left, action items, pending %, not initiated %, production release %.
    pub kpi_headers: [u32; 5],
    /// Daily task count, pending action items, then one per status bucket.
    pub status_headers: [u32; 11],
    pub goal_header: u32,
    pub major_items_header: u32,
    pub unused_header: u32,
    pub manual_input_fill: u32,
    pub goal_fill: u32,
    pub neutral_fill: u32,
    pub legend_text: u32,
    pub table_header: u32,
    pub epic: Tone,
    pub story: Tone,
    pub subtask: Tone,
    pub row_border: u32,
    pub link_text: u32,
    pub spacer_fill: u32,
    pub status_done: Tone,
    pub status_in_progress: Tone,
    pub status_staging: Tone,
    pub status_to_do: Tone,
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            header_text: 0xFFFFFF,
            value_text: 0x000000,
            value_fill: 0xFFFFFF,
            value_border: 0xCCCCCC,
            metadata_headers: [
                0x000000, 0x1F4E79, 0x2E75B6, 0x00B0F0, 0xC00000, 0x375623, 0x595959, 0x7030A0,
            ],
            kpi_headers: [0x000000, 0x1F3864, 0xFFC000, 0xED7D31, 0x375623],
            status_headers: [
                0x595959, 0xF4B942, 0xED7D31, 0x00B0F0, 0xBF8F00, 0xFFC000, 0x70AD47, 0x00B050,
                0x375623, 0xA6A6A6, 0x7030A0,
            ],
            goal_header: 0x7030A0,
            major_items_header: 0x1F3864,
            unused_header: 0xD9D9D9,
            manual_input_fill: 0xFFF2CC,
            goal_fill: 0xFAE5D3,
            neutral_fill: 0xF2F2F2,
            legend_text: 0x595959,
            table_header: 0x1F3864,
            epic: Tone {
                fill: 0x1F3864,
                text: 0xFFFFFF,
            },
            story: Tone {
                fill: 0x2E75B6,
                text: 0xFFFFFF,
            },
            subtask: Tone {
                fill: 0xD9E2F3,
                text: 0x1F3864,
            },
            row_border: 0xCCCCCC,
            link_text: 0x4472C4,
            spacer_fill: 0xFFFFFF,
            status_done: Tone {
                fill: 0xC6EFCE,
                text: 0x375623,
            },
            status_in_progress: Tone {
                fill: 0xFFEB9C,
                text: 0x7F6000,
            },
            status_staging: Tone {
                fill: 0xFFF2CC,
                text: 0x7F6000,
            },
            status_to_do: Tone {
                fill: 0xFCE4D6,
                text: 0x9C0006,
            },
        }
    }
}

/// Colour family for a status cell in the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Done,
    InProgress,
    Staging,
    ToDo,
}

impl StatusTone {
    /// Case-sensitive, first match wins; anything unrecognised reads as to-do.
    pub fn classify(status: &str) -> Self {
        const DONE: &[&str] = &["Done", "DONE", "Production", "Released"];
        const IN_PROGRESS: &[&str] = &["Progress", "IN PROGRESS"];
        const STAGING: &[&str] = &["Staging", "STAGING"];

        let any = |needles: &[&str]| needles.iter().any(|needle| status.contains(needle));
        if any(DONE) {
            Self::Done
        } else if any(IN_PROGRESS) {
            Self::InProgress
        } else if any(STAGING) {
            Self::Staging
        } else {
            Self::ToDo
        }
    }
}

impl ReportTheme {
    pub fn status_tone(&self, tone: StatusTone) -> Tone {
        match tone {
            StatusTone::Done => self.status_done,
            StatusTone::InProgress => self.status_in_progress,
            StatusTone::Staging => self.status_staging,
            StatusTone::ToDo => self.status_to_do,
        }
    }

    pub(super) fn font(&self, text: u32, size: f64) -> Format {
        Format::new()
            .set_font_name(self.font_name.as_str())
            .set_font_size(size)
            .set_font_color(Color::RGB(text))
    }

    /// Bold white-on-colour header cell, centred and wrapped.
    pub(super) fn header(&self, fill: u32) -> Format {
        self.font(self.header_text, 9.0)
            .set_bold()
            .set_background_color(Color::RGB(fill))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(self.header_text))
    }

    pub(super) fn value(&self, fill: u32, bold: bool, size: f64, left: bool) -> Format {
        let format = self
            .font(self.value_text, size)
            .set_background_color(Color::RGB(fill))
            .set_align(if left {
                FormatAlign::Left
            } else {
                FormatAlign::Center
            })
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(self.value_border));
        if bold {
            format.set_bold()
        } else {
            format
        }
    }

    pub(super) fn fill(&self, fill: u32) -> Format {
        Format::new().set_background_color(Color::RGB(fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tone_checks_done_before_progress() {
        assert_eq!(StatusTone::classify("Done"), StatusTone::Done);
        assert_eq!(StatusTone::classify("Released to Production"), StatusTone::Done);
        assert_eq!(StatusTone::classify("In Progress"), StatusTone::InProgress);
        assert_eq!(StatusTone::classify("STAGING"), StatusTone::Staging);
        assert_eq!(StatusTone::classify("To Do"), StatusTone::ToDo);
        assert_eq!(StatusTone::classify(""), StatusTone::ToDo);
    }

    #[test]
    fn status_tone_is_case_sensitive() {
        assert_eq!(StatusTone::classify("done"), StatusTone::ToDo);
    }

    #[test]
    fn default_theme_maps_tones() {
        let theme = ReportTheme::default();
        assert_eq!(theme.status_tone(StatusTone::Done).fill, 0xC6EFCE);
        assert_eq!(theme.status_tone(StatusTone::ToDo).text, 0x9C0006);
    }
}
