//! `skx fetch` command implementation
//!
//! Runs an aggregation session for one document type and date range, then exports the
//! accumulated records.

use crate::commands::connect;
use crate::error::Result;
use crate::export::{
    self, schema::project_cell, schema_for, DestinationPicker, ExportOutcome, FixedDestination,
    PromptDestination,
};
use crate::pipeline::{AggregationSession, SessionRequest};
use crate::progress::ProgressReporter;
use crate::ConnectionArgs;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use skx_common::types::{parse_date, DateRange, DocumentType, RawRecord, SOURCE_NAME_FIELD};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Records shown by `--preview`
pub const PREVIEW_LIMIT: usize = 100;

/// Options of one fetch run
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub document_type: DocumentType,
    pub from: Option<String>,
    pub to: Option<String>,
    pub output: Option<String>,
    pub no_export: bool,
    pub preview: bool,
    pub page_size: u32,
}

/// Fill in whichever bound is missing from the month of the other, or of `today`
pub fn resolve_range(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<DateRange> {
    let range = match (from, to) {
        (None, None) => DateRange::month_of(today),
        (Some(from), None) => {
            let start = parse_date(from)?;
            DateRange::new(start, DateRange::month_of(start).end())?
        },
        (None, Some(to)) => {
            let end = parse_date(to)?;
            DateRange::new(DateRange::month_of(end).start(), end)?
        },
        (Some(from), Some(to)) => DateRange::parse(from, to)?,
    };
    Ok(range)
}

pub async fn run(connection: ConnectionArgs, args: FetchArgs) -> Result<()> {
    let range = resolve_range(args.from.as_deref(), args.to.as_deref(), Local::now().date_naive())?;
    let request = SessionRequest::new(args.document_type, range).with_page_size(args.page_size);
    request.validate()?;

    let (config, client) = connect(&connection)?;
    let mut session = AggregationSession::new(client, config.company_code.clone());

    let cancel_listener = AbortOnDrop(tokio::spawn(cancel_on_interrupt(session.cancel_token())));

    println!(
        "{} Fetching {} for {} ({})",
        "→".cyan(),
        args.document_type.label(),
        config.company_code.bold(),
        range
    );

    let mut reporter = ProgressReporter::new();
    let outcome = session.run(&request, &mut reporter).await;
    reporter.finish();
    drop(cancel_listener);
    let _exit_listener = AbortOnDrop(tokio::spawn(exit_on_interrupt()));

    let summary = outcome?;
    if summary.is_cancelled() {
        println!("{} {}", "⚠".yellow(), summary.message());
    } else {
        println!("{} {}", "✓".green(), summary.message());
    }
    for name in &summary.failed_sources {
        println!("  {} skipped {}", "⚠".yellow(), name);
    }

    if args.preview {
        print!("{}", format_preview(args.document_type, session.records()));
    }

    if args.no_export {
        debug!("Export skipped by --no-export");
        return Ok(());
    }

    let mut picker: Box<dyn DestinationPicker> = match &args.output {
        Some(path) => Box::new(FixedDestination(PathBuf::from(path))),
        None => Box::new(PromptDestination),
    };

    match export::export(args.document_type, &range, session.records(), picker.as_mut())? {
        ExportOutcome::Written(result) => {
            info!(path = %result.path.display(), records = result.record_count, "Exported");
            println!(
                "{} Exported {} records to {}",
                "✓".green(),
                result.record_count,
                result.path.display()
            );
        },
        ExportOutcome::Cancelled => println!("{} Export skipped", "ℹ".cyan()),
    }

    Ok(())
}

/// Exit status for a run ended by a second Ctrl-C
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The first Ctrl-C cancels the session; a second one exits the process.
///
/// Installing the listener replaces the default SIGINT handling, so the second
/// interrupt has to be turned into an exit here.
async fn cancel_on_interrupt(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    token.cancel();
    eprintln!(
        "{} Cancelling after the current page. Press Ctrl-C again to quit now.",
        "⚠".yellow()
    );

    exit_on_interrupt().await;
}

/// Once the session is over there is nothing left to cancel, so Ctrl-C just exits.
async fn exit_on_interrupt() {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, exiting");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
}

struct AbortOnDrop(tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn preview_keys(document_type: DocumentType) -> &'static [&'static str] {
    match document_type {
        DocumentType::WarehouseInward | DocumentType::WarehouseOutward => &[
            "RefNo",
            "RefDate",
            SOURCE_NAME_FIELD,
            "JournalMemo",
            "AccountObjectName",
            "FromBranchName",
        ],
        DocumentType::PaymentReport => &[
            "RefNo",
            "RefDate",
            "BranchName",
            "Description",
            "AccountObjectName",
            "ReceiptAmount",
            "PaymentAmount",
        ],
    }
}

/// Table of the first [`PREVIEW_LIMIT`] records
pub fn format_preview(document_type: DocumentType, records: &[RawRecord]) -> String {
    use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

    let schema = schema_for(document_type);
    let columns: Vec<_> = preview_keys(document_type)
        .iter()
        .filter_map(|key| schema.columns.iter().find(|c| c.key == *key))
        .collect();

    let mut header = vec!["#"];
    header.extend(columns.iter().map(|c| c.header));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);

    for (index, record) in records.iter().take(PREVIEW_LIMIT).enumerate() {
        let mut row = vec![(index + 1).to_string()];
        row.extend(
            columns
                .iter()
                .map(|column| project_cell(column, record.get(column.key)).as_text()),
        );
        table.add_row(row);
    }

    let mut output = format!("{}\n", table);
    if records.len() > PREVIEW_LIMIT {
        output.push_str(&format!("showing {}/{}\n", PREVIEW_LIMIT, records.len()));
    }
    output
}
