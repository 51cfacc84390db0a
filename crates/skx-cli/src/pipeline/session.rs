//! Aggregation session
//!
//! A session resolves the branch list once, then either walks every branch in turn
//! (warehouse documents) or runs a single report query spanning all of them (payment
//! report). It owns the accumulated records, the cancellation token and the progress
//! tracker, and reports what it is doing through an [`EventSink`].

use crate::api::{DataClient, FetchQuery, QueryScope};
use crate::error::{CliError, Result};
use crate::pipeline::collector::{collect_all, StopReason};
use crate::pipeline::events::{EventSink, SessionEvent, Severity};
use crate::pipeline::progress::{per_source_percent, report_percent, ProgressTracker, REPORT_SETUP_PERCENT};
use crate::pipeline::sources::resolve_sources;
use serde_json::Value;
use skx_common::types::{AggregationMode, DateRange, DocumentType, RawRecord, Source, SOURCE_NAME_FIELD};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Records requested per page unless overridden
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the remote service accepts
pub const MAX_PAGE_SIZE: u32 = 500;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// What a run should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub document_type: DocumentType,
    pub range: DateRange,
    pub page_size: u32,
}

impl SessionRequest {
    pub fn new(document_type: DocumentType, range: DateRange) -> Self {
        Self {
            document_type,
            range,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CliError::validation(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        Ok(())
    }
}

/// Result of a run that did not fail fatally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub document_type: DocumentType,
    pub state: SessionState,
    pub record_count: usize,
    pub source_count: usize,
    /// Display names of branches skipped after a failed page
    pub failed_sources: Vec<String>,
}

impl SessionSummary {
    pub fn is_cancelled(&self) -> bool {
        self.state == SessionState::Cancelled
    }

    /// One-line description, e.g. "Loaded 85 inward documents from 2 sources"
    pub fn message(&self) -> String {
        let mut message = match self.state {
            SessionState::Cancelled => format!(
                "Cancelled after loading {} {}",
                self.record_count,
                self.document_type.label()
            ),
            _ => format!(
                "Loaded {} {} from {} sources",
                self.record_count,
                self.document_type.label(),
                self.source_count
            ),
        };
        if !self.failed_sources.is_empty() {
            message.push_str(&format!(" ({} skipped)", self.failed_sources.len()));
        }
        message
    }
}

fn emit_log(sink: &mut dyn EventSink, severity: Severity, message: String) {
    match severity {
        Severity::Info | Severity::Success => info!("{}", message),
        Severity::Warning => warn!("{}", message),
        Severity::Error => error!("{}", message),
    }
    sink.emit(SessionEvent::Log { message, severity });
}

fn emit_progress(sink: &mut dyn EventSink, tracker: &mut ProgressTracker, candidate: f64, status: String) {
    let percent = tracker.advance(candidate);
    sink.emit(SessionEvent::Progress { percent, status });
}

/// One aggregation run's worth of state
pub struct AggregationSession {
    client: Arc<dyn DataClient>,
    company_code: String,
    cancel: CancellationToken,
    state: SessionState,
    sources: Vec<Source>,
    records: Vec<RawRecord>,
    tracker: ProgressTracker,
}

impl AggregationSession {
    pub fn new(client: Arc<dyn DataClient>, company_code: impl Into<String>) -> Self {
        Self {
            client,
            company_code: company_code.into(),
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
            sources: Vec::new(),
            records: Vec::new(),
            tracker: ProgressTracker::new(),
        }
    }

    /// Clone of the session's token; cancelling it stops the run at the next loop head
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Records accumulated by the latest run, including partial results
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Fetch everything `request` describes.
    ///
    /// Fatal errors leave the session `Failed` with whatever was accumulated before
    /// them. Cancellation is not an error; the summary carries the `Cancelled` state.
    pub async fn run(&mut self, request: &SessionRequest, sink: &mut dyn EventSink) -> Result<SessionSummary> {
        self.records.clear();
        self.sources.clear();
        self.tracker.reset();

        if let Err(e) = request.validate() {
            return Err(self.fail(sink, e));
        }

        self.state = SessionState::Running;
        emit_progress(
            sink,
            &mut self.tracker,
            0.0,
            format!("Loading branches for {}", self.company_code),
        );
        info!(
            document_type = %request.document_type,
            range = %request.range,
            page_size = request.page_size,
            "Starting aggregation"
        );

        if self.cancel.is_cancelled() {
            return Ok(self.finish_cancelled(request, sink, Vec::new()));
        }

        let sources = match resolve_sources(self.client.as_ref(), &self.company_code).await {
            Ok(sources) => sources,
            Err(e) => return Err(self.fail(sink, e)),
        };
        emit_log(
            sink,
            Severity::Info,
            format!("Found {} branches", sources.len()),
        );
        self.sources = sources;

        match request.document_type.mode() {
            AggregationMode::PerSource => Ok(self.run_per_source(request, sink).await),
            AggregationMode::CrossSource => self.run_report(request, sink).await,
        }
    }

    async fn run_per_source(&mut self, request: &SessionRequest, sink: &mut dyn EventSink) -> SessionSummary {
        let sources = self.sources.clone();
        let count = sources.len();
        let client = self.client.as_ref();
        let mut failed_sources = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return self.finish_cancelled(request, sink, failed_sources);
            }

            emit_log(
                sink,
                Severity::Info,
                format!("Fetching {} ({}/{})", source.display_name, index + 1, count),
            );

            let base = FetchQuery {
                document_type: request.document_type,
                range: request.range,
                scope: QueryScope::Source(source.id.clone()),
                page: 1,
                page_size: request.page_size,
            };
            let tracker = &mut self.tracker;
            let progress_sink = &mut *sink;

            let mut collected = collect_all(
                move |page| {
                    let query = base.at_page(page);
                    async move { client.fetch_page(&query).await }
                },
                &self.cancel,
                |progress| {
                    let status = format!(
                        "{}: page {}/{}",
                        source.display_name,
                        progress.page,
                        progress.total_pages.max(1)
                    );
                    emit_log(
                        progress_sink,
                        Severity::Info,
                        format!("{}: {} records", status, progress.page_records),
                    );
                    emit_progress(
                        progress_sink,
                        tracker,
                        per_source_percent(index, count, progress.page, progress.total_pages),
                        status,
                    );
                },
            )
            .await;

            for record in &mut collected.records {
                record.insert(
                    SOURCE_NAME_FIELD.to_string(),
                    Value::String(source.display_name.clone()),
                );
            }
            let fetched = collected.records.len();
            self.records.append(&mut collected.records);

            match collected.stop {
                StopReason::Exhausted => emit_log(
                    sink,
                    Severity::Info,
                    format!("{}: {} records", source.display_name, fetched),
                ),
                StopReason::Cancelled => return self.finish_cancelled(request, sink, failed_sources),
                StopReason::Failed { page, error } => {
                    emit_log(
                        sink,
                        Severity::Warning,
                        format!(
                            "Skipping {} after page {} failed: {}",
                            source.display_name, page, error
                        ),
                    );
                    failed_sources.push(source.display_name.clone());
                },
            }
        }

        self.finish_completed(request, sink, failed_sources)
    }

    async fn run_report(&mut self, request: &SessionRequest, sink: &mut dyn EventSink) -> Result<SessionSummary> {
        emit_progress(
            sink,
            &mut self.tracker,
            REPORT_SETUP_PERCENT,
            format!("Querying {} branches", self.sources.len()),
        );

        if self.cancel.is_cancelled() {
            return Ok(self.finish_cancelled(request, sink, Vec::new()));
        }

        let base = FetchQuery {
            document_type: request.document_type,
            range: request.range,
            scope: QueryScope::AllSources(self.sources.iter().map(|s| s.id.clone()).collect()),
            page: 1,
            page_size: request.page_size,
        };
        let client = self.client.as_ref();
        let tracker = &mut self.tracker;
        let progress_sink = &mut *sink;

        let mut collected = collect_all(
            move |page| {
                let query = base.at_page(page);
                async move { client.fetch_page(&query).await }
            },
            &self.cancel,
            |progress| {
                emit_log(
                    progress_sink,
                    Severity::Info,
                    format!(
                        "Report page {}/{}: {} records",
                        progress.page,
                        progress.total_pages.max(1),
                        progress.page_records
                    ),
                );
                emit_progress(
                    progress_sink,
                    tracker,
                    report_percent(progress.page, progress.total_pages),
                    format!(
                        "Report page {}/{} ({} of {} rows)",
                        progress.page,
                        progress.total_pages.max(1),
                        progress.collected,
                        progress.total_count
                    ),
                );
            },
        )
        .await;

        self.records.append(&mut collected.records);

        match collected.stop {
            StopReason::Exhausted => Ok(self.finish_completed(request, sink, Vec::new())),
            StopReason::Cancelled => Ok(self.finish_cancelled(request, sink, Vec::new())),
            StopReason::Failed { page, error } => Err(self.fail(sink, error.on_page(page))),
        }
    }

    fn summary(&self, request: &SessionRequest, failed_sources: Vec<String>) -> SessionSummary {
        SessionSummary {
            document_type: request.document_type,
            state: self.state,
            record_count: self.records.len(),
            source_count: self.sources.len(),
            failed_sources,
        }
    }

    fn finish_completed(
        &mut self,
        request: &SessionRequest,
        sink: &mut dyn EventSink,
        failed_sources: Vec<String>,
    ) -> SessionSummary {
        self.state = SessionState::Completed;
        if self.tracker.current() < 100.0 {
            emit_progress(sink, &mut self.tracker, 100.0, "Completed".to_string());
        }
        let summary = self.summary(request, failed_sources);
        emit_log(sink, Severity::Success, summary.message());
        summary
    }

    fn finish_cancelled(
        &mut self,
        request: &SessionRequest,
        sink: &mut dyn EventSink,
        failed_sources: Vec<String>,
    ) -> SessionSummary {
        self.state = SessionState::Cancelled;
        let summary = self.summary(request, failed_sources);
        emit_log(sink, Severity::Warning, summary.message());
        summary
    }

    fn fail(&mut self, sink: &mut dyn EventSink, error: CliError) -> CliError {
        self.state = SessionState::Failed;
        emit_log(sink, Severity::Error, error.to_string());
        error
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::FetchResult;
    use crate::pipeline::events::progress_values;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const REPORT_KEY: &str = "*";

    /// Remote double serving a fixed number of records per branch
    #[derive(Default)]
    struct ScriptedClient {
        sources: Vec<Source>,
        totals: HashMap<String, u64>,
        fail_at: HashMap<String, u32>,
        /// Cancels the token once this many pages have been requested
        cancel_after: Mutex<Option<(usize, CancellationToken)>>,
        /// Cancels the token while the branch list is being served
        cancel_on_list: Mutex<Option<CancellationToken>>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedClient {
        fn with_sources(sources: &[(&str, &str)]) -> Self {
            Self {
                sources: sources
                    .iter()
                    .map(|(id, name)| Source::new(*id, *name, id.to_uppercase()))
                    .collect(),
                ..Default::default()
            }
        }

        fn total(mut self, key: &str, total: u64) -> Self {
            self.totals.insert(key.to_string(), total);
            self
        }

        fn fail(mut self, key: &str, page: u32) -> Self {
            self.fail_at.insert(key.to_string(), page);
            self
        }

        fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataClient for ScriptedClient {
        async fn list_sources(&self) -> Result<Vec<Source>> {
            if let Some(token) = self.cancel_on_list.lock().unwrap().as_ref() {
                token.cancel();
            }
            Ok(self.sources.clone())
        }

        async fn fetch_page(&self, query: &FetchQuery) -> Result<FetchResult> {
            let key = match &query.scope {
                QueryScope::Source(id) => id.clone(),
                QueryScope::AllSources(_) => REPORT_KEY.to_string(),
            };
            let made = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((key.clone(), query.page));
                calls.len()
            };
            if let Some((after, token)) = self.cancel_after.lock().unwrap().as_ref() {
                if made == *after {
                    token.cancel();
                }
            }

            if self.fail_at.get(&key) == Some(&query.page) {
                return Err(CliError::remote(format!("{} page {} unavailable", key, query.page)));
            }

            let total = self.totals.get(&key).copied().unwrap_or(0);
            let remaining = total.saturating_sub(query.start());
            let count = remaining.min(u64::from(query.page_size)) as usize;
            let records = (0..count)
                .map(|i| {
                    json!({ "RefNo": format!("{}-{}-{}", key, query.page, i), "TotalAmount": 10 })
                        .as_object()
                        .cloned()
                        .unwrap()
                })
                .collect();
            Ok(FetchResult::new(records, total, query.page_size))
        }
    }

    fn quiet() -> Vec<SessionEvent> {
        Vec::new()
    }

    fn december() -> DateRange {
        DateRange::parse("2025-12-01", "2025-12-31").unwrap()
    }

    fn session_for(client: &Arc<ScriptedClient>) -> AggregationSession {
        let dynamic: Arc<dyn DataClient> = client.clone();
        AggregationSession::new(dynamic, "acme")
    }

    fn logs(events: &[SessionEvent], wanted: Severity) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Log { message, severity } if *severity == wanted => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn assert_strictly_increasing(values: &[f64]) {
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1], "progress not strictly increasing: {:?}", values);
        }
    }

    #[tokio::test]
    async fn test_acme_december_inward() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("s1", "Store One"), ("s2", "Store Two")])
                .total("s1", 75)
                .total("s2", 10),
        );
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Completed);
        assert_eq!(summary.record_count, 85);
        assert_eq!(summary.source_count, 2);
        assert_eq!(summary.message(), "Loaded 85 inward documents from 2 sources");
        assert_eq!(session.state(), SessionState::Completed);

        let records = session.records();
        assert_eq!(records[0]["RefNo"], "s1-1-0");
        assert_eq!(records[50]["RefNo"], "s1-2-0");
        assert_eq!(records[75]["RefNo"], "s2-1-0");
        assert_eq!(records[0][SOURCE_NAME_FIELD], "Store One");
        assert_eq!(records[84][SOURCE_NAME_FIELD], "Store Two");

        let progress = progress_values(&events);
        assert_eq!(progress, vec![0.0, 25.0, 50.0, 100.0]);
        assert_strictly_increasing(&progress);
        assert_eq!(
            client.calls(),
            vec![("s1".to_string(), 1), ("s1".to_string(), 2), ("s2".to_string(), 1)]
        );

        let info = logs(&events, Severity::Info);
        assert!(info.contains(&"Store One: page 1/2: 50 records".to_string()));
        assert!(info.contains(&"Store One: page 2/2: 25 records".to_string()));
        assert!(info.contains(&"Store Two: page 1/1: 10 records".to_string()));
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A"), ("b", "B"), ("c", "C")])
                .total("a", 30)
                .total("b", 40)
                .total("c", 20)
                .fail("b", 1),
        );
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseOutward, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Completed);
        assert_eq!(summary.record_count, 50);
        assert_eq!(summary.failed_sources, vec!["B".to_string()]);
        assert!(session
            .records()
            .iter()
            .all(|r| r[SOURCE_NAME_FIELD] != "B"));

        let warnings = logs(&events, Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Skipping B"));

        let progress = progress_values(&events);
        assert_eq!(progress.last().copied(), Some(100.0));
        assert_strictly_increasing(&progress);
    }

    #[tokio::test]
    async fn test_failure_mid_source_keeps_earlier_pages() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A"), ("b", "B")])
                .total("a", 120)
                .total("b", 5)
                .fail("a", 3),
        );
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.record_count, 105);
        assert_eq!(summary.failed_sources, vec!["A".to_string()]);
        assert_eq!(client.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_cancel_keeps_fetched_pages_and_stops_fetching() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A"), ("b", "B")])
                .total("a", 500)
                .total("b", 500),
        );
        let mut session = session_for(&client);
        *client.cancel_after.lock().unwrap() = Some((2, session.cancel_token()));
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut events)
            .await
            .unwrap();

        assert!(summary.is_cancelled());
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.records().len(), 100);
        assert_eq!(client.calls().len(), 2);

        let progress = progress_values(&events);
        assert!(progress.iter().all(|p| *p < 100.0));
        assert!(summary.message().starts_with("Cancelled after loading 100"));
    }

    #[tokio::test]
    async fn test_cancel_between_sources_stops_before_next_source() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A"), ("b", "B")])
                .total("a", 50)
                .total("b", 50),
        );
        let mut session = session_for(&client);
        *client.cancel_after.lock().unwrap() = Some((1, session.cancel_token()));
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Cancelled);
        assert_eq!(summary.record_count, 50);
        assert!(summary.failed_sources.is_empty());
        assert_eq!(client.calls(), vec![("a".to_string(), 1)]);
        assert!(session.records().iter().all(|r| r[SOURCE_NAME_FIELD] == "A"));
        assert_eq!(progress_values(&events), vec![0.0, 50.0]);
    }

    #[tokio::test]
    async fn test_cancel_before_run_makes_no_calls() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A")]).total("a", 10));
        let mut session = session_for(&client);
        session.cancel();

        let summary = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut quiet())
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Cancelled);
        assert_eq!(summary.record_count, 0);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_report_first_page_failure_is_fatal() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A"), ("b", "B")])
                .total(REPORT_KEY, 80)
                .fail(REPORT_KEY, 1),
        );
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        let err = session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut events)
            .await
            .unwrap_err();

        assert!(err.is_remote());
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.records().is_empty());

        let errors = logs(&events, Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("page 1 failed"));
    }

    #[tokio::test]
    async fn test_report_later_failure_keeps_earlier_rows() {
        let client = Arc::new(
            ScriptedClient::with_sources(&[("a", "A")])
                .total(REPORT_KEY, 80)
                .fail(REPORT_KEY, 2),
        );
        let mut session = session_for(&client);

        let result = session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut quiet())
            .await;

        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.records().len(), 50);
    }

    #[tokio::test]
    async fn test_report_cancel_mid_walk_keeps_rows() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A")]).total(REPORT_KEY, 120));
        let mut session = session_for(&client);
        *client.cancel_after.lock().unwrap() = Some((1, session.cancel_token()));
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut events)
            .await
            .unwrap();

        assert!(summary.is_cancelled());
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.records().len(), 50);
        assert_eq!(client.calls(), vec![(REPORT_KEY.to_string(), 1)]);
        assert!(progress_values(&events).iter().all(|p| *p < 100.0));
        assert!(logs(&events, Severity::Error).is_empty());
    }

    #[tokio::test]
    async fn test_report_cancel_after_branches_makes_no_calls() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A"), ("b", "B")]).total(REPORT_KEY, 80));
        let mut session = session_for(&client);
        *client.cancel_on_list.lock().unwrap() = Some(session.cancel_token());
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Cancelled);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.source_count, 2);
        assert!(client.calls().is_empty());
        assert_eq!(progress_values(&events), vec![0.0, 10.0]);
    }

    #[tokio::test]
    async fn test_report_over_empty_range() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A"), ("b", "B"), ("c", "C")]));
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        let summary = session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(summary.state, SessionState::Completed);
        assert_eq!(summary.record_count, 0);
        assert_eq!(progress_values(&events), vec![0.0, 10.0, 100.0]);
        assert_eq!(client.calls(), vec![(REPORT_KEY.to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_report_progress_walk() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A")]).total(REPORT_KEY, 100));
        let mut session = session_for(&client);
        let mut events: Vec<SessionEvent> = Vec::new();

        session
            .run(&SessionRequest::new(DocumentType::PaymentReport, december()), &mut events)
            .await
            .unwrap();

        assert_eq!(progress_values(&events), vec![0.0, 10.0, 55.0, 100.0]);
        assert_eq!(session.records().len(), 100);
        let info = logs(&events, Severity::Info);
        assert!(info.contains(&"Report page 1/2: 50 records".to_string()));
        assert!(info.contains(&"Report page 2/2: 50 records".to_string()));
        assert!(session.records()[0].get(SOURCE_NAME_FIELD).is_none());
    }

    #[tokio::test]
    async fn test_no_sources_is_fatal() {
        let client = Arc::new(ScriptedClient::default());
        let mut session = session_for(&client);

        let err = session
            .run(&SessionRequest::new(DocumentType::WarehouseInward, december()), &mut quiet())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::NoSources(_)));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_page_size_makes_no_calls() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A")]));
        let mut session = session_for(&client);

        for page_size in [0, MAX_PAGE_SIZE + 1] {
            let request = SessionRequest::new(DocumentType::WarehouseInward, december())
                .with_page_size(page_size);
            let err = session.run(&request, &mut quiet()).await.unwrap_err();
            assert!(matches!(err, CliError::Validation(_)));
        }
        assert_eq!(session.state(), SessionState::Failed);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rerun_clears_previous_records() {
        let client = Arc::new(ScriptedClient::with_sources(&[("a", "A")]).total("a", 7));
        let mut session = session_for(&client);
        let request = SessionRequest::new(DocumentType::WarehouseInward, december());

        session.run(&request, &mut quiet()).await.unwrap();
        session.run(&request, &mut quiet()).await.unwrap();

        assert_eq!(session.records().len(), 7);
    }
}
