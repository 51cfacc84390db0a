//! Terminal rendering of session events
//!
//! Progress events drive an `indicatif` bar; log events are printed above it with a
//! coloured status glyph.

use crate::pipeline::{EventSink, SessionEvent, Severity};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>3}% {msg}";

/// Create the percentage bar used while a session runs
pub fn create_percent_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Prefix glyph for a log line
pub fn glyph(severity: Severity) -> String {
    match severity {
        Severity::Info => "ℹ".cyan().to_string(),
        Severity::Success => "✓".green().to_string(),
        Severity::Warning => "⚠".yellow().to_string(),
        Severity::Error => "✗".red().to_string(),
    }
}

/// [`EventSink`] that draws to the terminal
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: create_percent_bar(),
        }
    }

    /// Reporter that draws nothing; log lines are still printed
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ProgressReporter {
    fn emit(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Progress { percent, status } => {
                self.bar.set_position(percent.round() as u64);
                self.bar.set_message(status);
            },
            SessionEvent::Log { message, severity } => {
                let line = format!("{} {}", glyph(severity), message);
                if self.bar.is_hidden() {
                    eprintln!("{}", line);
                } else {
                    self.bar.println(line);
                }
            },
        }
    }
}
