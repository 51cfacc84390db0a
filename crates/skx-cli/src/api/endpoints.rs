//! API endpoint URL builders
//!
//! Helper functions to construct remote service URLs, filters and form bodies.

use crate::api::types::ReportParams;
use crate::error::Result;
use serde_json::{json, Value};
use skx_common::types::DateRange;

/// Host suffix of the per-company API
pub const API_HOST_SUFFIX: &str = "mshopkeeper.vn/backendg1/api";

/// Records requested from the Stocks listing in a single call
pub const STOCK_LIST_LIMIT: u32 = 50;

/// Record field the date filter compares against
pub const DATE_FILTER_FIELD: &str = "RefDate";

/// Base URL for a company, e.g. `https://acme.mshopkeeper.vn/backendg1/api`
pub fn company_base_url(company_code: &str) -> String {
    format!("https://{}.{}", company_code, API_HOST_SUFFIX)
}

/// Build the branch listing URL
pub fn stocks_url(base_url: &str) -> String {
    format!(
        "{}/Stocks?page=1&start=0&limit={}",
        base_url.trim_end_matches('/'),
        STOCK_LIST_LIMIT
    )
}

/// Build a paginated document listing URL with its date filter
pub fn document_url(base_url: &str, endpoint: &str, page: u32, start: u64, limit: u32, filter: &Value) -> String {
    format!(
        "{}/{}?page={}&start={}&limit={}&filter={}",
        base_url.trim_end_matches('/'),
        endpoint,
        page,
        start,
        limit,
        urlencoding::encode(&filter.to_string())
    )
}

/// Build the report URL
pub fn report_url(base_url: &str, report_id: &str) -> String {
    format!("{}/ReportList/GetReport/{}", base_url.trim_end_matches('/'), report_id)
}

/// Inclusive range predicates over the record date.
///
/// Operator 4 is "on or after", operator 3 is "on or before".
pub fn date_filter(range: &DateRange) -> Value {
    json!([
        {
            "xtype": "filter",
            "property": DATE_FILTER_FIELD,
            "operator": 4,
            "value": range.start_timestamp(),
            "type": 2,
            "group": DATE_FILTER_FIELD
        },
        {
            "xtype": "filter",
            "property": DATE_FILTER_FIELD,
            "operator": 3,
            "value": range.end_timestamp(),
            "type": 2,
            "addition": 1,
            "group": DATE_FILTER_FIELD
        }
    ])
}

/// Form-encoded body for a report page request
pub fn report_form(params: &ReportParams, page: u32, start: u64, limit: u32) -> Result<String> {
    let encoded = serde_json::to_string(params)?;
    Ok(format!(
        "reportID={}&objParams={}&page={}&start={}&limit={}",
        urlencoding::encode(&params.report_id),
        urlencoding::encode(&encoded),
        page,
        start,
        limit
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn december() -> DateRange {
        DateRange::parse("2025-12-01", "2025-12-31").unwrap()
    }

    #[test]
    fn test_company_base_url() {
        assert_eq!(
            company_base_url("acme"),
            "https://acme.mshopkeeper.vn/backendg1/api"
        );
    }

    #[test]
    fn test_stocks_url() {
        assert_eq!(
            stocks_url("https://acme.mshopkeeper.vn/backendg1/api/"),
            "https://acme.mshopkeeper.vn/backendg1/api/Stocks?page=1&start=0&limit=50"
        );
    }

    #[test]
    fn test_date_filter_bounds() {
        let filter = date_filter(&december());
        assert_eq!(filter[0]["operator"], 4);
        assert_eq!(filter[0]["value"], "2025-12-01T00:00:00");
        assert_eq!(filter[1]["operator"], 3);
        assert_eq!(filter[1]["value"], "2025-12-31T23:59:59");
        assert_eq!(filter[1]["property"], "RefDate");
    }

    #[test]
    fn test_document_url_encodes_filter() {
        let url = document_url("http://localhost:9000", "INInwards", 2, 50, 50, &date_filter(&december()));
        assert!(url.starts_with("http://localhost:9000/INInwards?page=2&start=50&limit=50&filter="));
        assert!(!url.contains('"'));
        assert!(url.contains("RefDate"));
    }

    #[test]
    fn test_report_url() {
        assert_eq!(
            report_url("http://localhost:9000", "RP_ListReceiptAndPayment"),
            "http://localhost:9000/ReportList/GetReport/RP_ListReceiptAndPayment"
        );
    }

    #[test]
    fn test_report_form() {
        let params = ReportParams::for_branches("RP_ListReceiptAndPayment", &december(), &["a".into(), "b".into()]);
        let body = report_form(&params, 1, 0, 50).unwrap();
        assert!(body.starts_with("reportID=RP_ListReceiptAndPayment&objParams="));
        assert!(body.ends_with("&page=1&start=0&limit=50"));
        assert!(body.contains("a%3Bb"));
    }
}
