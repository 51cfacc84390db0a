//! SKX CLI Library
//!
//! Command-line tool that aggregates business documents across every branch of a
//! company and exports them as a formatted spreadsheet.
//!
//! # Overview
//!
//! - **Fetching**: Walk every branch, or run one cross-branch report (`skx fetch`)
//! - **Branches**: List the company's branches (`skx sources`)
//! - **Configuration**: Manage the stored token and company code (`skx config`)
//!
//! The aggregation itself lives in [`pipeline`]; it talks to the remote service
//! through the [`api::DataClient`] trait and hands its records to [`export`].

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};

/// SKX - branch document aggregation and spreadsheet export
#[derive(Parser, Debug)]
#[command(name = "skx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the command reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,

    /// Override the API base URL (defaults to the company's host)
    #[arg(long, env = "SKX_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Company code for this run, overriding the stored value
    #[arg(long, env = "SKX_COMPANY_CODE", global = true)]
    pub company: Option<String>,

    /// Access token for this run, overriding the stored value
    #[arg(long, env = "SKX_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch documents for a date range and export them to xlsx
    Fetch {
        /// Document type: inward, outward or payment-report
        #[arg(value_parser = parse_document_type)]
        document_type: skx_common::types::DocumentType,

        /// First day of the range, YYYY-MM-DD (defaults to the start of this month)
        #[arg(long)]
        from: Option<String>,

        /// Last day of the range, YYYY-MM-DD (defaults to the end of this month)
        #[arg(long)]
        to: Option<String>,

        /// Write the spreadsheet here instead of prompting for a path
        #[arg(short, long)]
        output: Option<String>,

        /// Skip the export step
        #[arg(long, conflicts_with = "output")]
        no_export: bool,

        /// Print the first records as a table after loading
        #[arg(long)]
        preview: bool,

        /// Records requested per page
        #[arg(long, default_value_t = pipeline::session::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },

    /// List the company's branches
    Sources,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key (authorization, company_code)
        key: String,
    },

    /// Set configuration value
    Set {
        /// Configuration key (authorization, company_code)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Show all configuration
    Show,

    /// Restore the default configuration
    Reset,
}

fn parse_document_type(value: &str) -> std::result::Result<skx_common::types::DocumentType, String> {
    value.parse().map_err(|e: skx_common::SkxError| e.to_string())
}

/// Connection settings shared by the networked commands
#[derive(Debug, Clone)]
pub struct ConnectionArgs {
    pub base_url: Option<String>,
    pub company: Option<String>,
    pub token: Option<String>,
}

impl Cli {
    pub fn connection(&self) -> ConnectionArgs {
        ConnectionArgs {
            base_url: self.base_url.clone(),
            company: self.company.clone(),
            token: self.token.clone(),
        }
    }
}
