//! Domain types shared across SKX

use crate::error::{Result, SkxError};
use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A record exactly as the remote service returned it.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Field injected into per-source records with the branch display name.
pub const SOURCE_NAME_FIELD: &str = "sourceName";

// ============================================================================
// Document Types
// ============================================================================

/// How a document type walks the branch set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// One paginated query per branch, results concatenated in branch order
    PerSource,
    /// One paginated query whose filter spans every branch
    CrossSource,
}

/// Kind of business document to pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// Goods received into a warehouse
    WarehouseInward,
    /// Goods issued from a warehouse
    WarehouseOutward,
    /// Receipt and payment report rows
    PaymentReport,
}

impl DocumentType {
    /// All supported document types, in menu order
    pub const ALL: [DocumentType; 3] = [
        DocumentType::WarehouseInward,
        DocumentType::WarehouseOutward,
        DocumentType::PaymentReport,
    ];

    pub fn mode(&self) -> AggregationMode {
        match self {
            DocumentType::WarehouseInward | DocumentType::WarehouseOutward => {
                AggregationMode::PerSource
            },
            DocumentType::PaymentReport => AggregationMode::CrossSource,
        }
    }

    /// Remote endpoint (documents) or report id (reports)
    pub fn remote_name(&self) -> &'static str {
        match self {
            DocumentType::WarehouseInward => "INInwards",
            DocumentType::WarehouseOutward => "Outwards",
            DocumentType::PaymentReport => "RP_ListReceiptAndPayment",
        }
    }

    /// Short name used on the command line and in file names
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::WarehouseInward => "inward",
            DocumentType::WarehouseOutward => "outward",
            DocumentType::PaymentReport => "payment-report",
        }
    }

    /// Plural noun for user-facing counts
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::WarehouseInward => "inward documents",
            DocumentType::WarehouseOutward => "outward documents",
            DocumentType::PaymentReport => "payment records",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = SkxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inward" | "ininwards" => Ok(DocumentType::WarehouseInward),
            "outward" | "outwards" => Ok(DocumentType::WarehouseOutward),
            "payment-report" | "paymentreport" => Ok(DocumentType::PaymentReport),
            _ => Err(SkxError::validation(format!(
                "Unknown document type '{}'. Valid types: inward, outward, payment-report",
                s
            ))),
        }
    }
}

// ============================================================================
// Date Range
// ============================================================================

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SkxError::validation(format!(
                "Start date {} must not be after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` dates
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First to last day of the month containing `today`
    pub fn month_of(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(today);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Local start-of-day timestamp, e.g. `2025-12-01T00:00:00`
    pub fn start_timestamp(&self) -> String {
        format!("{}T00:00:00", self.start.format("%Y-%m-%d"))
    }

    /// Local end-of-day timestamp, e.g. `2025-12-31T23:59:59`
    pub fn end_timestamp(&self) -> String {
        format!("{}T23:59:59", self.end.format("%Y-%m-%d"))
    }

    /// Range bounds as UTC instants, e.g. `2025-11-30T17:00:00.000Z`
    pub fn utc_bounds(&self) -> (String, String) {
        let start = self.start.and_time(NaiveTime::default());
        let end = self.end.and_hms_milli_opt(23, 59, 59, 999).unwrap_or(start);
        let to_utc = |naive: chrono::NaiveDateTime| {
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string()
        };
        (to_utc(start), to_utc(end))
    }

    /// Compact form used in file names, e.g. `20251201_20251231`
    pub fn compact(&self) -> String {
        format!("{}_{}", self.start.format("%Y%m%d"), self.end.format("%Y%m%d"))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parse one `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        SkxError::parse(format!("Invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
    })
}

// ============================================================================
// Sources
// ============================================================================

/// One branch (stock) whose documents can be queried independently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Remote branch identifier, sent as the branch header
    pub id: String,

    pub display_name: String,

    pub code: String,
}

impl Source {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            code: code.into(),
        }
    }
}
