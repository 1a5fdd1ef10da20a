use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Image, Workbook};
use tracing::warn;

use super::grid::{BorderWeight, CellStyle, DocumentGrid, HorizontalAlign, VerticalAlign};

pub const SHEET_NAME: &str = "Travel Authorization";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unable to read image asset {path}: {source}")]
    Asset {
        path: String,
        source: std::io::Error,
    },
    #[error("unable to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Raw bytes of the image stamped on each copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        std::fs::read(path)
            .map(Self::from_bytes)
            .map_err(|source| DocumentError::Asset {
                path: path.display().to_string(),
                source,
            })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Serialize `grid` as a single-sheet `.xlsx` workbook.
///
/// An image that the workbook writer cannot decode is skipped with a warning; the rest of the
/// document is still produced.
pub fn write_workbook(
    grid: &DocumentGrid,
    image: Option<&ImageAsset>,
) -> Result<Vec<u8>, DocumentError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    worksheet.set_landscape();
    worksheet.set_print_fit_to_pages(1, 1);

    for (col, width) in grid.column_widths() {
        worksheet.set_column_width(col, width)?;
    }
    for (row, height) in grid.row_heights() {
        worksheet.set_row_height(row, height)?;
    }

    for region in grid.merges() {
        let anchor = grid
            .cell(region.first_row, region.first_col)
            .cloned()
            .unwrap_or_default();
        worksheet.merge_range(
            region.first_row,
            region.first_col,
            region.last_row,
            region.last_col,
            &anchor.value,
            &to_format(&anchor.style),
        )?;

        // Perimeter borders can differ per covered cell; restyle those after the merge.
        for (row, col) in region.cells().skip(1) {
            if let Some(cell) = grid.cell(row, col) {
                if cell.style != anchor.style {
                    worksheet.write_blank(row, col, &to_format(&cell.style))?;
                }
            }
        }
    }

    for ((row, col), cell) in grid.cells() {
        if grid.merge_at(row, col).is_some() {
            continue;
        }
        let format = to_format(&cell.style);
        if cell.value.is_empty() {
            worksheet.write_blank(row, col, &format)?;
        } else {
            worksheet.write_string_with_format(row, col, &cell.value, &format)?;
        }
    }

    if let Some(asset) = image {
        match Image::new_from_buffer(asset.bytes()) {
            Ok(picture) => {
                let (width, height) = (picture.width(), picture.height());
                for anchor in grid.images() {
                    let scaled = if width > 0.0 && height > 0.0 {
                        picture
                            .clone()
                            .set_scale_width(f64::from(anchor.width_px) / width)
                            .set_scale_height(f64::from(anchor.height_px) / height)
                    } else {
                        picture.clone()
                    };
                    worksheet.insert_image_with_offset(
                        anchor.row,
                        anchor.col,
                        &scaled,
                        anchor.x_offset,
                        anchor.y_offset,
                    )?;
                }
            }
            Err(err) => warn!(error = %err, "image asset could not be decoded; continuing without it"),
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if style.wrap {
        format = format.set_text_wrap();
    }

    format = match style.align {
        HorizontalAlign::General => format,
        HorizontalAlign::Left => format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format.set_align(FormatAlign::Right),
    };
    format = match style.valign {
        VerticalAlign::Bottom => format,
        VerticalAlign::Center => format.set_align(FormatAlign::VerticalCenter),
        VerticalAlign::Top => format.set_align(FormatAlign::Top),
    };

    let borders = style.borders;
    format
        .set_border_top(border(borders.top))
        .set_border_bottom(border(borders.bottom))
        .set_border_left(border(borders.left))
        .set_border_right(border(borders.right))
}

fn border(weight: BorderWeight) -> FormatBorder {
    match weight {
        BorderWeight::None => FormatBorder::None,
        BorderWeight::Thin => FormatBorder::Thin,
        BorderWeight::Medium => FormatBorder::Medium,
    }
}
