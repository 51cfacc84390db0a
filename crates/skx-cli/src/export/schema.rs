//! Column schemas per document type and the row projection applied at export time

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Value;
use skx_common::types::{DocumentType, RawRecord, SOURCE_NAME_FIELD};

/// Controls how a missing or odd-shaped field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    pub header: &'static str,
    /// Field of the raw record this column reads
    pub key: &'static str,
    pub width: f64,
    pub kind: ColumnKind,
}

const fn col(header: &'static str, key: &'static str, width: f64, kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        header,
        key,
        width,
        kind,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSchema {
    pub sheet_name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl ExportSchema {
    #[cfg(test)]
    pub(crate) fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }
}

/// Display format for date cells
pub const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

const WAREHOUSE_COLUMNS: &[ColumnDef] = &[
    col("Reference No.", "RefNo", 20.0, ColumnKind::Text),
    col("Date", "RefDate", 20.0, ColumnKind::Date),
    col("Branch", SOURCE_NAME_FIELD, 30.0, ColumnKind::Text),
    col("Type", "RefType", 15.0, ColumnKind::Text),
    col("Memo", "JournalMemo", 40.0, ColumnKind::Text),
    col("Counterpart", "AccountObjectName", 30.0, ColumnKind::Text),
    col("Total Amount", "TotalAmount", 15.0, ColumnKind::Number),
    col("From Branch", "FromBranchName", 30.0, ColumnKind::Text),
    col("Reason", "ReasonName", 30.0, ColumnKind::Text),
];

const PAYMENT_REPORT_COLUMNS: &[ColumnDef] = &[
    col("Reference No.", "RefNo", 20.0, ColumnKind::Text),
    col("Date", "RefDate", 20.0, ColumnKind::Date),
    col("Type", "RefTypeName", 20.0, ColumnKind::Text),
    col("Branch", "BranchName", 30.0, ColumnKind::Text),
    col("Branch Code", "BranchCode", 15.0, ColumnKind::Text),
    col("Counterpart", "AccountObjectName", 30.0, ColumnKind::Text),
    col("Counterpart Code", "AccountObjectCode", 18.0, ColumnKind::Text),
    col("Employee", "EmployeeName", 25.0, ColumnKind::Text),
    col("Receipt Amount", "ReceiptAmount", 15.0, ColumnKind::Number),
    col("Payment Amount", "PaymentAmount", 15.0, ColumnKind::Number),
    col("Closing Balance", "ClosingAmount", 15.0, ColumnKind::Number),
    col("Payment Method", "PaymentMethodName", 20.0, ColumnKind::Text),
    col("Card", "CardName", 20.0, ColumnKind::Text),
    col("Account No.", "BankAccountNumber", 20.0, ColumnKind::Text),
    col("Note", "Description", 40.0, ColumnKind::Text),
    col("Invoice No.", "InvoiceNo", 15.0, ColumnKind::Text),
];

static INWARD_SCHEMA: ExportSchema = ExportSchema {
    sheet_name: "Warehouse Inward",
    columns: WAREHOUSE_COLUMNS,
};

static OUTWARD_SCHEMA: ExportSchema = ExportSchema {
    sheet_name: "Warehouse Outward",
    columns: WAREHOUSE_COLUMNS,
};

static PAYMENT_REPORT_SCHEMA: ExportSchema = ExportSchema {
    sheet_name: "Receipts and Payments",
    columns: PAYMENT_REPORT_COLUMNS,
};

pub fn schema_for(document_type: DocumentType) -> &'static ExportSchema {
    match document_type {
        DocumentType::WarehouseInward => &INWARD_SCHEMA,
        DocumentType::WarehouseOutward => &OUTWARD_SCHEMA,
        DocumentType::PaymentReport => &PAYMENT_REPORT_SCHEMA,
    }
}

/// One projected cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

/// Project a record onto the schema's columns, in column order
pub fn project_row(schema: &ExportSchema, record: &RawRecord) -> Vec<CellValue> {
    schema
        .columns
        .iter()
        .map(|column| project_cell(column, record.get(column.key)))
        .collect()
}

pub fn project_cell(column: &ColumnDef, value: Option<&Value>) -> CellValue {
    match column.kind {
        ColumnKind::Text => CellValue::Text(text_of(value)),
        ColumnKind::Number => CellValue::Number(number_of(value)),
        ColumnKind::Date => CellValue::Text(match value {
            Some(Value::String(s)) => format_date(s),
            other => text_of(other),
        }),
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

// Non-numeric strings and other shapes fall back to zero like a missing amount
fn number_of(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Render a remote timestamp as local `dd/mm/YYYY HH:MM`.
///
/// Offset-carrying timestamps are converted to local time; naive ones are taken as
/// already local. Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Local).format(DATE_DISPLAY_FORMAT).to_string();
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.format(DATE_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_registry_covers_every_type() {
        for kind in DocumentType::ALL {
            let schema = schema_for(kind);
            assert!(!schema.columns.is_empty());
            assert!(schema.sheet_name.len() <= 31);
        }
        assert_eq!(schema_for(DocumentType::WarehouseInward).columns.len(), 9);
        assert_eq!(schema_for(DocumentType::PaymentReport).columns.len(), 16);
        assert_ne!(
            schema_for(DocumentType::WarehouseInward).sheet_name,
            schema_for(DocumentType::WarehouseOutward).sheet_name
        );
    }

    #[test]
    fn test_warehouse_branch_column_reads_injected_name() {
        let schema = schema_for(DocumentType::WarehouseOutward);
        assert_eq!(schema.columns[2].key, SOURCE_NAME_FIELD);
        assert_eq!(schema.headers()[2], "Branch");
    }

    #[test]
    fn test_missing_fields_get_kind_defaults() {
        let schema = schema_for(DocumentType::WarehouseInward);
        let row = project_row(schema, &record(json!({ "RefNo": "NK001", "JournalMemo": null })));

        assert_eq!(row.len(), schema.columns.len());
        assert_eq!(row[0], CellValue::Text("NK001".into()));
        assert_eq!(row[1], CellValue::Text(String::new()));
        assert_eq!(row[4], CellValue::Text(String::new()));
        assert_eq!(row[6], CellValue::Number(0.0));
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let column = col("Amount", "Amount", 10.0, ColumnKind::Number);
        assert_eq!(project_cell(&column, Some(&json!(1250.5))), CellValue::Number(1250.5));
        assert_eq!(project_cell(&column, Some(&json!(" 300 "))), CellValue::Number(300.0));
        assert_eq!(project_cell(&column, Some(&json!("n/a"))), CellValue::Number(0.0));
        assert_eq!(project_cell(&column, Some(&Value::Null)), CellValue::Number(0.0));
    }

    #[test]
    fn test_text_renders_scalars() {
        let column = col("Code", "Code", 10.0, ColumnKind::Text);
        assert_eq!(project_cell(&column, Some(&json!(42))), CellValue::Text("42".into()));
        assert_eq!(project_cell(&column, Some(&json!(true))), CellValue::Text("true".into()));
    }

    #[test]
    fn test_naive_dates_are_formatted_as_is() {
        assert_eq!(format_date("2025-12-05T10:30:00"), "05/12/2025 10:30");
        assert_eq!(format_date("2025-12-05T10:30:00.123"), "05/12/2025 10:30");
        assert_eq!(format_date("2025-12-05 08:15:00"), "05/12/2025 08:15");
    }

    #[test]
    fn test_offset_dates_use_local_time() {
        let expected = DateTime::parse_from_rfc3339("2025-12-05T03:30:00Z")
            .unwrap()
            .with_timezone(&Local)
            .format(DATE_DISPLAY_FORMAT)
            .to_string();
        assert_eq!(format_date("2025-12-05T03:30:00Z"), expected);
    }

    #[test]
    fn test_unparseable_dates_pass_through() {
        assert_eq!(format_date("sometime last week"), "sometime last week");
        assert_eq!(format_date("   "), "");

        let column = col("Date", "RefDate", 20.0, ColumnKind::Date);
        assert_eq!(project_cell(&column, None), CellValue::Text(String::new()));
    }
}
