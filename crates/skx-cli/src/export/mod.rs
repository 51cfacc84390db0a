//! Spreadsheet export
//!
//! Looks up the column schema for a document type, asks a [`DestinationPicker`] where
//! to write, and builds the xlsx artifact there.

pub mod destination;
pub mod schema;
pub mod workbook;

pub use destination::{DestinationPicker, FixedDestination, PromptDestination};
pub use schema::{schema_for, CellValue, ColumnDef, ColumnKind, ExportSchema};
pub use workbook::build_artifact;

use crate::error::Result;
use skx_common::types::{DateRange, DocumentType, RawRecord};
use std::path::PathBuf;
use tracing::warn;

/// A written spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub record_count: usize,
    pub path: PathBuf,
}

/// Outcome of an export; backing out of the destination prompt is not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(ExportResult),
    Cancelled,
}

/// e.g. `inward_20251201_20251231.xlsx`
pub fn default_file_name(document_type: DocumentType, range: &DateRange) -> String {
    format!("{}_{}.xlsx", document_type.as_str(), range.compact())
}

pub fn export(
    document_type: DocumentType,
    range: &DateRange,
    records: &[RawRecord],
    picker: &mut dyn DestinationPicker,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        warn!(document_type = %document_type, "Exporting an empty record set; the sheet will only have headers");
    }

    let suggested = default_file_name(document_type, range);
    let Some(path) = picker.choose(&suggested)? else {
        return Ok(ExportOutcome::Cancelled);
    };

    let result = build_artifact(schema_for(document_type), records, &path)?;
    Ok(ExportOutcome::Written(result))
}
