//! Pagination collector
//!
//! Drains the pages of one query in order, checking the cancellation token before every
//! request. A failed page ends the walk; records already fetched are kept and handed
//! back with the failure so the caller can decide what to do with them.

use crate::api::FetchResult;
use crate::error::{CliError, Result};
use futures::stream::{self, Stream, StreamExt};
use skx_common::types::RawRecord;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Outcome of one step of the page walk
#[derive(Debug)]
pub enum PageEvent {
    Fetched { page: u32, result: FetchResult },
    Cancelled,
    Failed { page: u32, error: CliError },
}

/// Why a collection run stopped
#[derive(Debug)]
pub enum StopReason {
    /// Every page up to the reported total was fetched
    Exhausted,
    /// The token was set before the next request went out
    Cancelled,
    /// The request for `page` failed
    Failed { page: u32, error: CliError },
}

/// Records gathered by one collection run
#[derive(Debug)]
pub struct Collected {
    pub records: Vec<RawRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl Collected {
    pub fn is_exhausted(&self) -> bool {
        matches!(self.stop, StopReason::Exhausted)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.stop, StopReason::Cancelled)
    }
}

/// Position reported after each fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    /// Records on this page
    pub page_records: usize,
    /// Records accumulated so far in this run
    pub collected: usize,
}

struct Cursor<F> {
    fetch: F,
    cancel: CancellationToken,
    next: Option<u32>,
}

/// Lazy page walk starting at page 1.
///
/// Yields `Cancelled` or `Failed` at most once, as the final item.
pub fn page_stream<F, Fut>(fetch: F, cancel: CancellationToken) -> impl Stream<Item = PageEvent>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<FetchResult>>,
{
    let cursor = Cursor {
        fetch,
        cancel,
        next: Some(1),
    };

    stream::unfold(cursor, |mut cursor| async move {
        let page = cursor.next?;

        if cursor.cancel.is_cancelled() {
            cursor.next = None;
            return Some((PageEvent::Cancelled, cursor));
        }

        match (cursor.fetch)(page).await {
            Ok(result) => {
                cursor.next = if page >= result.total_pages {
                    None
                } else {
                    page.checked_add(1)
                };
                Some((PageEvent::Fetched { page, result }, cursor))
            },
            Err(error) => {
                cursor.next = None;
                Some((PageEvent::Failed { page, error }, cursor))
            },
        }
    })
}

/// Drive [`page_stream`] to the end, calling `on_page` after every fetched page
pub async fn collect_all<F, Fut, P>(fetch: F, cancel: &CancellationToken, mut on_page: P) -> Collected
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<FetchResult>>,
    P: FnMut(PageProgress),
{
    let mut pages = std::pin::pin!(page_stream(fetch, cancel.clone()));
    let mut records = Vec::new();
    let mut pages_fetched = 0u32;
    let mut stop = StopReason::Exhausted;

    while let Some(event) = pages.next().await {
        match event {
            PageEvent::Fetched { page, result } => {
                pages_fetched += 1;
                let page_records = result.records.len();
                records.extend(result.records);
                on_page(PageProgress {
                    page,
                    total_pages: result.total_pages,
                    total_count: result.total_count,
                    page_records,
                    collected: records.len(),
                });
            },
            PageEvent::Cancelled => stop = StopReason::Cancelled,
            PageEvent::Failed { page, error } => stop = StopReason::Failed { page, error },
        }
    }

    Collected {
        records,
        pages_fetched,
        stop,
    }
}
