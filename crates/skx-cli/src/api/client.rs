//! HTTP client for the remote document service
//!
//! [`DataClient`] is the seam the aggregation pipeline talks to; [`ApiClient`] is the
//! reqwest implementation.

use crate::api::{endpoints, types::*};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use skx_common::types::{AggregationMode, RawRecord, Source};
use std::time::Duration;
use tracing::debug;

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via SKX_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Header carrying the branch a request is scoped to
pub const BRANCH_HEADER: &str = "X-MISA-BranchID";

/// Header carrying the company code
pub const COMPANY_HEADER: &str = "CompanyCode";

/// Remote calls the aggregation pipeline needs
#[async_trait]
pub trait DataClient: Send + Sync {
    /// List every branch of the company in one call
    async fn list_sources(&self) -> Result<Vec<Source>>;

    /// Fetch one page of documents or report rows
    async fn fetch_page(&self, query: &FetchQuery) -> Result<FetchResult>;
}

/// API client for the remote service
pub struct ApiClient {
    client: Client,
    base_url: String,
    company_code: String,
    authorization: String,
}

impl ApiClient {
    /// Create a new API client against an explicit base URL
    pub fn new(base_url: String, company_code: String, authorization: String) -> Result<Self> {
        let timeout_secs = std::env::var("SKX_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            company_code,
            authorization,
        })
    }

    /// Create a client for the company's default host
    pub fn for_company(company_code: String, authorization: String) -> Result<Self> {
        Self::new(endpoints::company_base_url(&company_code), company_code, authorization)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_metadata(&self, request: RequestBuilder, branch_id: &str) -> RequestBuilder {
        request
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.authorization))
            .header(COMPANY_HEADER, &self.company_code)
            .header(BRANCH_HEADER, branch_id)
    }

    /// Send a request and unwrap the service envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<ApiEnvelope<T>> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CliError::remote(format!("{} request failed with HTTP {}", what, status)));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.is_success() {
            return Err(CliError::remote(format!(
                "{} request returned code {}{}",
                what,
                envelope.code,
                envelope
                    .message
                    .as_deref()
                    .map(|m| format!(" ({})", m))
                    .unwrap_or_default()
            )));
        }

        Ok(envelope)
    }

    async fn fetch_documents(&self, query: &FetchQuery, branch_id: &str) -> Result<FetchResult> {
        let filter = endpoints::date_filter(&query.range);
        let url = endpoints::document_url(
            &self.base_url,
            query.document_type.remote_name(),
            query.page,
            query.start(),
            query.page_size,
            &filter,
        );
        debug!(url = %url, branch = %branch_id, page = query.page, "Fetching document page");

        let request = self.with_metadata(self.client.get(&url), branch_id);
        let envelope: ApiEnvelope<Vec<RawRecord>> =
            self.send(request, query.document_type.remote_name()).await?;

        Ok(FetchResult::new(
            envelope.data.unwrap_or_default(),
            envelope.total.unwrap_or(0),
            query.page_size,
        ))
    }

    async fn fetch_report(&self, query: &FetchQuery, branch_ids: &[String]) -> Result<FetchResult> {
        let report_id = query.document_type.remote_name();
        let url = endpoints::report_url(&self.base_url, report_id);
        let params = ReportParams::for_branches(report_id, &query.range, branch_ids);
        let body = endpoints::report_form(&params, query.page, query.start(), query.page_size)?;
        debug!(url = %url, branches = branch_ids.len(), page = query.page, "Fetching report page");

        let nil = uuid::Uuid::nil().to_string();
        let request = self
            .with_metadata(self.client.post(&url), &nil)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .body(body);
        let envelope: ApiEnvelope<Vec<RawRecord>> = self.send(request, report_id).await?;

        Ok(FetchResult::new(
            envelope.data.unwrap_or_default(),
            envelope.total.unwrap_or(0),
            query.page_size,
        ))
    }
}

#[async_trait]
impl DataClient for ApiClient {
    async fn list_sources(&self) -> Result<Vec<Source>> {
        let url = endpoints::stocks_url(&self.base_url);
        let nil = uuid::Uuid::nil().to_string();
        let request = self.with_metadata(self.client.get(&url), &nil);

        let envelope: ApiEnvelope<Vec<StockDto>> = self.send(request, "Stocks").await?;

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Source::from)
            .collect())
    }

    async fn fetch_page(&self, query: &FetchQuery) -> Result<FetchResult> {
        match (query.document_type.mode(), &query.scope) {
            (AggregationMode::PerSource, QueryScope::Source(branch_id)) => {
                self.fetch_documents(query, branch_id).await
            },
            (AggregationMode::CrossSource, QueryScope::AllSources(branch_ids)) => {
                self.fetch_report(query, branch_ids).await
            },
            (mode, scope) => Err(CliError::validation(format!(
                "{} queries run in {:?} mode and cannot use scope {:?}",
                query.document_type, mode, scope
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use skx_common::types::{DateRange, DocumentType};

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new(
            "http://localhost:9000/".to_string(),
            "acme".to_string(),
            "token".to_string(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_for_company_uses_company_host() {
        let client = ApiClient::for_company("acme".to_string(), "token".to_string()).unwrap();
        assert_eq!(client.base_url(), "https://acme.mshopkeeper.vn/backendg1/api");
    }

    #[tokio::test]
    async fn test_mismatched_scope_is_rejected_before_sending() {
        let client = ApiClient::new(
            "http://localhost:9".to_string(),
            "acme".to_string(),
            "token".to_string(),
        )
        .unwrap();
        let query = FetchQuery {
            document_type: DocumentType::PaymentReport,
            range: DateRange::parse("2025-12-01", "2025-12-31").unwrap(),
            scope: QueryScope::Source("b-1".to_string()),
            page: 1,
            page_size: 50,
        };

        let err = client.fetch_page(&query).await.unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
