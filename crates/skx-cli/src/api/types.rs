//! API request and response types
//!
//! Field names follow the remote service's PascalCase JSON.

use serde::{Deserialize, Serialize};
use skx_common::types::{DateRange, DocumentType, RawRecord, Source};

/// Envelope code the service uses for success
pub const SUCCESS_CODE: i64 = 200;

/// Standard response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiEnvelope<T> {
    pub code: i64,

    pub data: Option<T>,

    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// One entry of the Stocks listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDto {
    #[serde(rename = "BranchID")]
    pub branch_id: String,

    #[serde(rename = "StockName", default)]
    pub stock_name: String,

    #[serde(rename = "StockCode", default)]
    pub stock_code: String,
}

impl From<StockDto> for Source {
    fn from(dto: StockDto) -> Self {
        Source::new(dto.branch_id, dto.stock_name, dto.stock_code)
    }
}

/// Which branches a query covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    /// A single branch, sent as the branch header
    Source(String),
    /// Every listed branch, sent inside the report parameters
    AllSources(Vec<String>),
}

/// One page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub document_type: DocumentType,
    pub range: DateRange,
    pub scope: QueryScope,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl FetchQuery {
    /// The same query pointed at another page
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Zero-based offset of the first record on this page
    pub fn start(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    pub records: Vec<RawRecord>,
    pub total_count: u64,
    pub total_pages: u32,
}

impl FetchResult {
    pub fn new(records: Vec<RawRecord>, total_count: u64, page_size: u32) -> Self {
        Self {
            records,
            total_count,
            total_pages: total_pages(total_count, page_size),
        }
    }
}

/// Pages needed to cover `total_count` records
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The `objParams` payload of a report request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ReportParams {
    pub from_date: String,
    pub to_date: String,
    #[serde(rename = "EmployeeID")]
    pub employee_id: String,
    pub payment_type: i32,
    pub period: i32,
    #[serde(rename = "ReportID")]
    pub report_id: String,
    pub is_view_by_all_branch: bool,
    #[serde(rename = "ListBranchID")]
    pub list_branch_id: String,
    #[serde(rename = "BranchID")]
    pub branch_id: String,
    #[serde(rename = "StockID")]
    pub stock_id: String,
}

impl ReportParams {
    /// Parameters for a report over every branch in `branch_ids`
    pub fn for_branches(report_id: &str, range: &DateRange, branch_ids: &[String]) -> Self {
        let nil = uuid::Uuid::nil().to_string();
        let (from_date, to_date) = range.utc_bounds();
        Self {
            from_date,
            to_date,
            employee_id: nil.clone(),
            payment_type: 0,
            // "custom range" period selector
            period: 50,
            report_id: report_id.to_string(),
            is_view_by_all_branch: true,
            list_branch_id: branch_ids.join(";"),
            branch_id: nil.clone(),
            stock_id: nil,
        }
    }
}
