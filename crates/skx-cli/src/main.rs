//! SKX CLI - Main entry point

use clap::Parser;
use skx_cli::commands::fetch::FetchArgs;
use skx_cli::{Cli, Commands, ConfigCommand};
use skx_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Pick up a local .env before clap reads SKX_* variables
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command.as_ref() else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Session events are already printed, so non-verbose runs only log errors
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Error };
    let base = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("skx")
        .build();

    // Environment variables take precedence
    let log_config = base.clone().merge_env().unwrap_or(base);

    // The CLI works without logging, so a failed init is not fatal
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli, command).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, command: &Commands) -> skx_cli::Result<()> {
    match command {
        Commands::Fetch {
            document_type,
            from,
            to,
            output,
            no_export,
            preview,
            page_size,
        } => {
            let args = FetchArgs {
                document_type: *document_type,
                from: from.clone(),
                to: to.clone(),
                output: output.clone(),
                no_export: *no_export,
                preview: *preview,
                page_size: *page_size,
            };
            skx_cli::commands::fetch::run(cli.connection(), args).await
        },

        Commands::Sources => skx_cli::commands::sources::run(cli.connection()).await,

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => skx_cli::commands::config::get(key.clone()).await,
            ConfigCommand::Set { key, value } => {
                skx_cli::commands::config::set(key.clone(), value.clone()).await
            },
            ConfigCommand::Show => skx_cli::commands::config::show().await,
            ConfigCommand::Reset => skx_cli::commands::config::reset().await,
        },
    }
}
