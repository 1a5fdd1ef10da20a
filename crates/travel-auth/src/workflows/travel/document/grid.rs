use std::collections::BTreeMap;

/// Line weight of one cell edge. Ordered so the heavier weight wins when edges combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum BorderWeight {
    #[default]
    None,
    Thin,
    Medium,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Borders {
    pub top: BorderWeight,
    pub bottom: BorderWeight,
    pub left: BorderWeight,
    pub right: BorderWeight,
}

impl Borders {
    pub const NONE: Borders = Borders {
        top: BorderWeight::None,
        bottom: BorderWeight::None,
        left: BorderWeight::None,
        right: BorderWeight::None,
    };

    pub const fn boxed(weight: BorderWeight) -> Self {
        Borders {
            top: weight,
            bottom: weight,
            left: weight,
            right: weight,
        }
    }

    /// Fill-in-the-blank value cell: a single rule underneath.
    pub const fn bottom_rule() -> Self {
        Borders {
            bottom: BorderWeight::Thin,
            ..Borders::NONE
        }
    }

    pub fn combine(self, other: Borders) -> Borders {
        Borders {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.max(other.left),
            right: self.right.max(other.right),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    #[default]
    Bottom,
    Center,
    Top,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: Option<f64>,
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
    pub wrap: bool,
    pub borders: Borders,
}

impl CellStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn size(mut self, points: f64) -> Self {
        self.font_size = Some(points);
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Bold, centered, thin box: table header cells.
    pub fn header() -> Self {
        Self::plain()
            .bold()
            .align(HorizontalAlign::Center)
            .valign(VerticalAlign::Center)
            .wrap()
            .borders(Borders::boxed(BorderWeight::Thin))
    }

    /// Thin box around a data cell.
    pub fn boxed() -> Self {
        Self::plain()
            .valign(VerticalAlign::Center)
            .borders(Borders::boxed(BorderWeight::Thin))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: String,
    pub style: CellStyle,
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl Region {
    pub const fn new(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    pub const fn row_span(row: u32, first_col: u16, last_col: u16) -> Self {
        Self::new(row, first_col, row, last_col)
    }

    pub const fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.first_row && row <= self.last_row && col >= self.first_col && col <= self.last_col
    }

    pub const fn overlaps(&self, other: &Region) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    pub const fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    pub fn cells(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |row| (self.first_col..=self.last_col).map(move |col| (row, col)))
    }
}

/// Where an image lands: top-left cell plus pixel offset, scaled to a fixed pixel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageAnchor {
    pub row: u32,
    pub col: u16,
    pub x_offset: u32,
    pub y_offset: u32,
    pub width_px: u32,
    pub height_px: u32,
}

/// Sparse single-sheet grid: cell text and style, merged regions, image anchors, and sizes.
#[derive(Debug, Clone, Default)]
pub struct DocumentGrid {
    cells: BTreeMap<(u32, u16), Cell>,
    merges: Vec<Region>,
    images: Vec<ImageAnchor>,
    column_widths: BTreeMap<u16, f64>,
    row_heights: BTreeMap<u32, f64>,
}

impl DocumentGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, row: u32, col: u16, value: impl Into<String>, style: CellStyle) {
        self.cells.insert(
            (row, col),
            Cell {
                value: value.into(),
                style,
            },
        );
    }

    /// Merge `region`, put `value` in its top-left cell, and give every covered cell `style`.
    /// Single-cell regions are written without recording a merge.
    pub fn merge(&mut self, region: Region, value: impl Into<String>, style: CellStyle) {
        debug_assert!(
            self.merges.iter().all(|existing| !existing.overlaps(&region)),
            "merged regions must not overlap: {region:?}"
        );

        for (row, col) in region.cells() {
            self.write(row, col, String::new(), style);
        }
        self.write(region.first_row, region.first_col, value, style);

        if !region.is_single_cell() {
            self.merges.push(region);
        }
    }

    /// Thicken edges of an existing (or blank) cell without touching its text.
    pub fn add_borders(&mut self, row: u32, col: u16, borders: Borders) {
        let cell = self.cells.entry((row, col)).or_default();
        cell.style.borders = cell.style.borders.combine(borders);
    }

    /// Trace the perimeter of `region` at `weight`.
    pub fn outline(&mut self, region: Region, weight: BorderWeight) {
        for col in region.first_col..=region.last_col {
            self.add_borders(region.first_row, col, Borders { top: weight, ..Borders::NONE });
            self.add_borders(region.last_row, col, Borders { bottom: weight, ..Borders::NONE });
        }
        for row in region.first_row..=region.last_row {
            self.add_borders(row, region.first_col, Borders { left: weight, ..Borders::NONE });
            self.add_borders(row, region.last_col, Borders { right: weight, ..Borders::NONE });
        }
    }

    pub fn anchor_image(&mut self, anchor: ImageAnchor) {
        self.images.push(anchor);
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Text of a cell, or `None` when the cell is absent or blank.
    pub fn text(&self, row: u32, col: u16) -> Option<&str> {
        self.cell(row, col)
            .map(|cell| cell.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn cells(&self) -> impl Iterator<Item = ((u32, u16), &Cell)> {
        self.cells.iter().map(|(key, cell)| (*key, cell))
    }

    pub fn merges(&self) -> &[Region] {
        &self.merges
    }

    pub fn merge_at(&self, row: u32, col: u16) -> Option<&Region> {
        self.merges.iter().find(|region| region.contains(row, col))
    }

    pub fn images(&self) -> &[ImageAnchor] {
        &self.images
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths.iter().map(|(col, width)| (*col, *width))
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.row_heights.iter().map(|(row, height)| (*row, *height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_places_text_top_left_and_styles_every_cell() {
        let mut grid = DocumentGrid::new();
        let region = Region::new(2, 1, 3, 4);
        grid.merge(region, "Title", CellStyle::header());

        assert_eq!(grid.text(2, 1), Some("Title"));
        assert_eq!(grid.text(3, 4), None);
        assert_eq!(
            grid.cell(3, 4).expect("covered").style,
            CellStyle::header()
        );
        assert_eq!(grid.merge_at(3, 2), Some(&region));
        assert_eq!(grid.merges().len(), 1);
    }

    #[test]
    fn single_cell_merge_is_a_plain_write() {
        let mut grid = DocumentGrid::new();
        grid.merge(Region::row_span(0, 0, 0), "Date", CellStyle::header());
        assert!(grid.merges().is_empty());
        assert_eq!(grid.text(0, 0), Some("Date"));
    }

    #[test]
    fn outline_keeps_heavier_edges() {
        let mut grid = DocumentGrid::new();
        grid.write(0, 0, "a", CellStyle::boxed());
        grid.outline(Region::new(0, 0, 1, 1), BorderWeight::Medium);

        let corner = grid.cell(0, 0).expect("cell").style.borders;
        assert_eq!(corner.top, BorderWeight::Medium);
        assert_eq!(corner.left, BorderWeight::Medium);
        assert_eq!(corner.bottom, BorderWeight::Thin);
        assert_eq!(corner.right, BorderWeight::Thin);

        let far = grid.cell(1, 1).expect("created").style.borders;
        assert_eq!(far.bottom, BorderWeight::Medium);
        assert_eq!(far.right, BorderWeight::Medium);
        assert_eq!(far.top, BorderWeight::None);
    }

    #[test]
    fn regions_detect_overlap() {
        let a = Region::new(0, 0, 2, 2);
        assert!(a.overlaps(&Region::new(2, 2, 3, 3)));
        assert!(!a.overlaps(&Region::new(3, 0, 3, 2)));
        assert_eq!(a.cells().count(), 9);
    }
}
