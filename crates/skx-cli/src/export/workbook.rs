//! xlsx artifact writer

use crate::error::{CliError, Result};
use crate::export::schema::{project_row, CellValue, ExportSchema};
use crate::export::ExportResult;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use skx_common::types::RawRecord;
use std::path::Path;
use tracing::debug;

/// Header fill colour
pub const HEADER_FILL: u32 = 0x4472C4;

/// Header row height in points
pub const HEADER_HEIGHT: f64 = 25.0;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

fn data_format() -> Format {
    Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

fn save_error(err: XlsxError) -> CliError {
    match err {
        XlsxError::IoError(io) => CliError::Io(io),
        other => CliError::Export(other),
    }
}

/// Write `records` as a single formatted sheet at `path`
pub fn build_artifact(schema: &ExportSchema, records: &[RawRecord], path: &Path) -> Result<ExportResult> {
    let header = header_format();
    let data = data_format();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(schema.sheet_name)?;

    for (col, column) in (0u16..).zip(schema.columns) {
        sheet.set_column_width(col, column.width)?;
        sheet.write_string_with_format(0, col, column.header, &header)?;
    }
    sheet.set_row_height(0, HEADER_HEIGHT)?;

    for (row, record) in (1u32..).zip(records) {
        for (col, cell) in (0u16..).zip(project_row(schema, record)) {
            match cell {
                CellValue::Text(text) => sheet.write_string_with_format(row, col, text, &data)?,
                CellValue::Number(number) => sheet.write_number_with_format(row, col, number, &data)?,
            };
        }
    }

    workbook.save(path).map_err(save_error)?;
    debug!(path = %path.display(), rows = records.len(), sheet = schema.sheet_name, "Wrote workbook");

    Ok(ExportResult {
        record_count: records.len(),
        path: path.to_path_buf(),
    })
}
