//! Overall progress across the source and page dimensions

/// Points reserved in report mode for resolving the source list
pub const REPORT_SETUP_PERCENT: f64 = 10.0;

fn page_fraction(page: u32, total_pages: u32) -> f64 {
    if total_pages == 0 {
        // Nothing to fetch counts as a finished source
        return 1.0;
    }
    (f64::from(page) / f64::from(total_pages)).clamp(0.0, 1.0)
}

/// Percent complete after `page` of `total_pages` for the source at `source_index`
/// (0-based) of `source_count`.
///
/// Equals `(i / n) * 100 + (p / t) * (100 / n)`, written so the last page of the last
/// source lands on exactly 100.
pub fn per_source_percent(source_index: usize, source_count: usize, page: u32, total_pages: u32) -> f64 {
    if source_count == 0 {
        return 100.0;
    }
    let done = source_index as f64 + page_fraction(page, total_pages);
    (done / source_count as f64 * 100.0).clamp(0.0, 100.0)
}

/// Percent complete after `page` of `total_pages` of the single report query
pub fn report_percent(page: u32, total_pages: u32) -> f64 {
    let span = 100.0 - REPORT_SETUP_PERCENT;
    (REPORT_SETUP_PERCENT + page_fraction(page, total_pages) * span).clamp(0.0, 100.0)
}

/// Keeps the reported percentage from ever moving backwards within a session
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    last: f64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp `candidate` into `[last, 100]` and remember it
    pub fn advance(&mut self, candidate: f64) -> f64 {
        let clamped = if candidate.is_nan() { self.last } else { candidate.clamp(0.0, 100.0) };
        self.last = self.last.max(clamped);
        self.last
    }

    pub fn current(&self) -> f64 {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}
