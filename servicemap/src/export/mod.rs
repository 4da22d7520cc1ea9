//! Export of selected records as a "Service centre details" sheet.
//!
//! The layout (title, per-centre label/value lines, separators) is fixed;
//! turning a sheet into a PDF is up to an external [`SheetRenderer`]. A
//! plain-text renderer is provided.

pub mod sheet;

pub use sheet::{fit_to_width, ExportSheet, PlainTextRenderer, SheetEntry, SheetRenderer, SHEET_TITLE};
