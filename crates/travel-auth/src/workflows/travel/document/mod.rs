//! Two-up travel authorization form: grid model, fixed layout, and `.xlsx` serialization.

pub mod grid;
pub mod layout;
mod writer;

pub use grid::{BorderWeight, Borders, Cell, CellStyle, DocumentGrid, ImageAnchor, Region};
pub use layout::{
    purpose_lines, ColumnBlock, DocumentLayoutEngine, LayoutOptions, TravelDocumentContent,
};
pub use writer::{write_workbook, DocumentError, ImageAsset, SHEET_NAME};
