//! Fixed-geometry travel authorization form.
//!
//! The printed stock carries the form twice, side by side, so one sheet holds a left and a right
//! copy. Both are produced by [`DocumentLayoutEngine::layout_copy`] with a different column
//! offset. Row numbers below are absolute; column numbers are relative to the copy.

use chrono::NaiveDate;
use tracing::debug;

use super::grid::{
    BorderWeight, Borders, CellStyle, DocumentGrid, HorizontalAlign, ImageAnchor, Region,
    VerticalAlign,
};
use crate::workflows::travel::domain::{TeamActivityEntry, TravelEntry};
use crate::workflows::travel::duration::twelve_hour_label;

/// Columns in one copy of the form.
pub const BLOCK_COLUMNS: u16 = 10;
/// Blank spacer column between the two copies.
pub const GUTTER_COLUMNS: u16 = 1;
/// Data rows printed on the form. Later entries only appear in the purpose region.
pub const TABLE_ROWS: usize = 8;
pub const TEAM_ACTIVITY_ROWS: usize = 6;

pub const TITLE: &str = "TRAVEL AUTHORIZATION";
pub const SUBTITLE: &str = "Authority to Travel / Travel Log";
pub const FORMULA_TEXT: &str = "Overtime Pay = Rate x Excess Hours";
pub const REQUESTED_BY: &str = "Requested by";
pub const APPROVED_BY: &str = "Approved by";

pub const TITLE_REGION: Region = Region::new(0, 2, 1, 9);
pub const SUBTITLE_REGION: Region = Region::new(2, 2, 2, 9);

pub const NAME_ROW: u32 = 4;
pub const FILED_ROW: u32 = 5;
pub const NAME_VALUE: Region = Region::row_span(NAME_ROW, 2, 5);
pub const POSITION_VALUE: Region = Region::row_span(NAME_ROW, 7, 9);
pub const FILED_VALUE: Region = Region::row_span(FILED_ROW, 2, 5);

pub const TABLE_HEADER_ROW: u32 = 7;
pub const TABLE_SUBHEADER_ROW: u32 = 8;
pub const TABLE_FIRST_ROW: u32 = 9;

/// Column spans of the five logical table columns (Date, From, To, Departure, Arrival).
pub const TABLE_COLUMNS: [(u16, u16); 5] = [(0, 1), (2, 3), (4, 5), (6, 7), (8, 9)];

pub const PURPOSE_LABEL_ROW: u32 = 17;
pub const PURPOSE_REGION: Region = Region::new(18, 0, 21, 9);

pub const TEAM_TITLE_ROW: u32 = 23;
pub const TEAM_HEADER_ROW: u32 = 24;
pub const TEAM_FIRST_ROW: u32 = 25;
pub const TEAM_COLUMNS: [(u16, u16); 5] = TABLE_COLUMNS;

pub const FORMULA_ROW: u32 = 32;
pub const GOOGLE_MAPS_ROW: u32 = 33;
pub const TOTAL_HOURS_ROW: u32 = 34;
pub const HOURS_VALUE_COLUMNS: (u16, u16) = (4, 5);

pub const SIGNATURE_LINE_ROW: u32 = 37;
pub const SIGNATURE_LABEL_ROW: u32 = 38;
pub const LAST_ROW: u32 = 39;

pub const LOGO_ANCHOR: ImageAnchor = ImageAnchor {
    row: 0,
    col: 0,
    x_offset: 8,
    y_offset: 4,
    width_px: 64,
    height_px: 64,
};

const COLUMN_WIDTHS: [f64; BLOCK_COLUMNS as usize] =
    [9.0, 9.0, 10.0, 10.0, 10.0, 10.0, 9.0, 9.0, 9.0, 9.0];
const GUTTER_WIDTH: f64 = 3.0;
const TITLE_ROW_HEIGHT: f64 = 22.0;
const PURPOSE_ROW_HEIGHT: f64 = 30.0;

/// One copy of the form on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnBlock {
    Left,
    Right,
}

impl ColumnBlock {
    pub const fn ordered() -> [ColumnBlock; 2] {
        [ColumnBlock::Left, ColumnBlock::Right]
    }

    pub const fn offset(self) -> u16 {
        match self {
            ColumnBlock::Left => 0,
            ColumnBlock::Right => BLOCK_COLUMNS + GUTTER_COLUMNS,
        }
    }

    /// Whole footprint of the copy, used for the outer border.
    pub const fn region(self) -> Region {
        let offset = self.offset();
        Region::new(0, offset, LAST_ROW, offset + BLOCK_COLUMNS - 1)
    }
}

/// Everything printed on the form.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelDocumentContent {
    pub submitter_name: String,
    pub submitter_position: String,
    pub filed_on: NaiveDate,
    pub entries: Vec<TravelEntry>,
    pub team_activity: Vec<TeamActivityEntry>,
    pub google_maps_hours: Option<f32>,
    pub total_hours: Option<u32>,
}

/// Options that vary by deployment rather than by report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    pub overtime_rate: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLayoutEngine {
    options: LayoutOptions,
}

impl DocumentLayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Lay out both copies. Image anchors are only recorded when an image will be embedded.
    pub fn render(&self, content: &TravelDocumentContent, with_image: bool) -> DocumentGrid {
        if content.entries.len() > TABLE_ROWS {
            debug!(
                entries = content.entries.len(),
                table_rows = TABLE_ROWS,
                "travel entries past the table rows appear in the purpose region only"
            );
        }
        if content.team_activity.len() > TEAM_ACTIVITY_ROWS {
            debug!(
                rows = content.team_activity.len(),
                team_rows = TEAM_ACTIVITY_ROWS,
                "team activity rows past the block are not printed"
            );
        }

        let mut grid = DocumentGrid::new();
        for block in ColumnBlock::ordered() {
            self.layout_copy(&mut grid, content, block.offset(), with_image);
        }

        let gutter = ColumnBlock::Right.offset() - GUTTER_COLUMNS;
        grid.set_column_width(gutter, GUTTER_WIDTH);
        for row in TITLE_REGION.first_row..=TITLE_REGION.last_row {
            grid.set_row_height(row, TITLE_ROW_HEIGHT);
        }
        for row in PURPOSE_REGION.first_row..=PURPOSE_REGION.last_row {
            grid.set_row_height(row, PURPOSE_ROW_HEIGHT);
        }

        grid
    }

    /// Write one full copy of the form starting at column `offset`.
    pub fn layout_copy(
        &self,
        grid: &mut DocumentGrid,
        content: &TravelDocumentContent,
        offset: u16,
        with_image: bool,
    ) {
        let at = |region: Region| shift(region, offset);

        for (index, width) in COLUMN_WIDTHS.iter().enumerate() {
            grid.set_column_width(offset + index as u16, *width);
        }

        if with_image {
            grid.anchor_image(ImageAnchor {
                col: LOGO_ANCHOR.col + offset,
                ..LOGO_ANCHOR
            });
        }

        grid.merge(
            at(TITLE_REGION),
            TITLE,
            CellStyle::plain()
                .bold()
                .size(14.0)
                .align(HorizontalAlign::Center)
                .valign(VerticalAlign::Center),
        );
        grid.merge(
            at(SUBTITLE_REGION),
            SUBTITLE,
            CellStyle::plain().align(HorizontalAlign::Center),
        );

        self.layout_header(grid, content, offset);
        self.layout_travel_table(grid, &content.entries, offset);

        grid.merge(
            at(Region::row_span(PURPOSE_LABEL_ROW, 0, BLOCK_COLUMNS - 1)),
            "Purpose of Travel:",
            CellStyle::plain().bold().borders(Borders::boxed(BorderWeight::Thin)),
        );
        grid.merge(
            at(PURPOSE_REGION),
            purpose_lines(&content.entries),
            CellStyle::plain()
                .wrap()
                .align(HorizontalAlign::Left)
                .valign(VerticalAlign::Top)
                .borders(Borders::boxed(BorderWeight::Thin)),
        );

        self.layout_team_activity(grid, &content.team_activity, offset);
        self.layout_footer(grid, content, offset);

        grid.outline(at(ColumnBlock::Left.region()), BorderWeight::Medium);
    }

    fn layout_header(&self, grid: &mut DocumentGrid, content: &TravelDocumentContent, offset: u16) {
        let label = CellStyle::plain().bold().align(HorizontalAlign::Right);
        let value = CellStyle::plain()
            .align(HorizontalAlign::Left)
            .borders(Borders::bottom_rule());

        grid.merge(shift(Region::row_span(NAME_ROW, 0, 1), offset), "Name:", label);
        grid.merge(shift(NAME_VALUE, offset), content.submitter_name.trim(), value);
        grid.write(NAME_ROW, offset + 6, "Position:", label);
        grid.merge(
            shift(POSITION_VALUE, offset),
            content.submitter_position.trim(),
            value,
        );
        grid.merge(
            shift(Region::row_span(FILED_ROW, 0, 1), offset),
            "Date Filed:",
            label,
        );
        grid.merge(
            shift(FILED_VALUE, offset),
            content.filed_on.format("%B %-d, %Y").to_string(),
            value,
        );
    }

    fn layout_travel_table(&self, grid: &mut DocumentGrid, entries: &[TravelEntry], offset: u16) {
        let header = CellStyle::header();
        let span = |row: u32, (first, last): (u16, u16)| {
            shift(Region::row_span(row, first, last), offset)
        };

        let (date_first, date_last) = TABLE_COLUMNS[0];
        grid.merge(
            shift(
                Region::new(TABLE_HEADER_ROW, date_first, TABLE_SUBHEADER_ROW, date_last),
                offset,
            ),
            "Date",
            header,
        );
        grid.merge(
            span(TABLE_HEADER_ROW, (TABLE_COLUMNS[1].0, TABLE_COLUMNS[2].1)),
            "Destination",
            header,
        );
        grid.merge(
            span(TABLE_HEADER_ROW, (TABLE_COLUMNS[3].0, TABLE_COLUMNS[4].1)),
            "Time",
            header,
        );
        for (columns, label) in TABLE_COLUMNS[1..]
            .iter()
            .zip(["From", "To", "Departure", "Arrival"])
        {
            grid.merge(span(TABLE_SUBHEADER_ROW, *columns), label, header);
        }

        let cell = CellStyle::boxed().align(HorizontalAlign::Center).wrap();
        for slot in 0..TABLE_ROWS {
            let row = TABLE_FIRST_ROW + slot as u32;
            let values = match entries.get(slot) {
                Some(entry) => [
                    display_date(&entry.date),
                    entry.origin_location.trim().to_string(),
                    entry.destination_location.trim().to_string(),
                    twelve_hour_label(&entry.departure_time),
                    twelve_hour_label(&entry.arrival_time),
                ],
                None => Default::default(),
            };
            for (columns, value) in TABLE_COLUMNS.iter().zip(values) {
                grid.merge(span(row, *columns), value, cell);
            }
        }
    }

    fn layout_team_activity(
        &self,
        grid: &mut DocumentGrid,
        team: &[TeamActivityEntry],
        offset: u16,
    ) {
        let header = CellStyle::header();
        let span = |row: u32, (first, last): (u16, u16)| {
            shift(Region::row_span(row, first, last), offset)
        };

        grid.merge(
            span(TEAM_TITLE_ROW, (0, BLOCK_COLUMNS - 1)),
            "Team Activity",
            header,
        );
        for (columns, label) in TEAM_COLUMNS.iter().zip([
            "Employee Name",
            "Designation",
            "Assigned Task",
            "Time Duration",
            "Remarks",
        ]) {
            grid.merge(span(TEAM_HEADER_ROW, *columns), label, header);
        }

        let cell = CellStyle::boxed().wrap();
        for slot in 0..TEAM_ACTIVITY_ROWS {
            let row = TEAM_FIRST_ROW + slot as u32;
            let values = match team.get(slot) {
                Some(member) => [
                    member.employee_name.trim(),
                    member.designation.trim(),
                    member.assigned_task.trim(),
                    member.time_duration.trim(),
                    member.remarks.trim(),
                ],
                None => [""; 5],
            };
            for (columns, value) in TEAM_COLUMNS.iter().zip(values) {
                grid.merge(span(row, *columns), value, cell);
            }
        }
    }

    fn layout_footer(&self, grid: &mut DocumentGrid, content: &TravelDocumentContent, offset: u16) {
        let formula = match self.options.overtime_rate.as_deref() {
            Some(rate) => format!("{FORMULA_TEXT} (rate: {rate})"),
            None => FORMULA_TEXT.to_string(),
        };
        grid.merge(
            shift(Region::row_span(FORMULA_ROW, 0, BLOCK_COLUMNS - 1), offset),
            formula,
            CellStyle::plain().align(HorizontalAlign::Left),
        );

        let label = CellStyle::plain().bold().align(HorizontalAlign::Right);
        let value = CellStyle::plain()
            .align(HorizontalAlign::Center)
            .borders(Borders::bottom_rule());
        let (value_first, value_last) = HOURS_VALUE_COLUMNS;

        let google_maps = content
            .google_maps_hours
            .map(|hours| hours.to_string())
            .unwrap_or_default();
        let total = content
            .total_hours
            .map(|hours| hours.to_string())
            .unwrap_or_default();

        for (row, text, hours) in [
            (GOOGLE_MAPS_ROW, "Google Maps Hours:", google_maps),
            (TOTAL_HOURS_ROW, "Total Hours:", total),
        ] {
            grid.merge(
                shift(Region::row_span(row, 0, value_first - 1), offset),
                text,
                label,
            );
            grid.merge(
                shift(Region::row_span(row, value_first, value_last), offset),
                hours,
                value,
            );
        }

        let centered = CellStyle::plain().align(HorizontalAlign::Center);
        for ((first, last), caption) in [((0, 3), REQUESTED_BY), ((6, 9), APPROVED_BY)] {
            grid.merge(
                shift(Region::row_span(SIGNATURE_LINE_ROW, first, last), offset),
                "",
                CellStyle::plain().borders(Borders::bottom_rule()),
            );
            grid.merge(
                shift(Region::row_span(SIGNATURE_LABEL_ROW, first, last), offset),
                caption,
                centered,
            );
        }
    }
}

/// Every purpose, numbered from 1, one per line. Not capped at the table size.
pub fn purpose_lines(entries: &[TravelEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{}. {}", index + 1, entry.purpose.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d/%Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

const fn shift(region: Region, offset: u16) -> Region {
    Region::new(
        region.first_row,
        region.first_col + offset,
        region.last_row,
        region.last_col + offset,
    )
}
