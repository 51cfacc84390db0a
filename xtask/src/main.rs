//! Build automation tasks for SKX
//!
//! Currently generates the markdown CLI reference from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for SKX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<skx_cli::Cli>();

    let content = format!(
        r#"# SKX CLI Reference

Generated from the CLI source on {}.

## Quick Start

```bash
# Store credentials once
skx config set company_code acme
skx config set authorization <token>

# List branches
skx sources

# Inward documents for December 2025, written straight to a file
skx fetch inward --from 2025-12-01 --to 2025-12-31 --output inward.xlsx

# Receipts and payments across every branch for the current month
skx fetch payment-report --preview
```

Press Ctrl-C during a fetch to stop after the current page; the records loaded so
far can still be exported.

## Commands

{}

## Environment Variables

- `SKX_COMPANY_CODE` - Company code for one run
- `SKX_TOKEN` - Access token for one run
- `SKX_BASE_URL` - API base URL (default: `https://<company>.mshopkeeper.vn/backendg1/api`)
- `SKX_CONFIG_DIR` - Directory holding `config.json`
- `SKX_API_TIMEOUT_SECS` - Request timeout in seconds (default: 60)
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`, `LOG_FILTER` - Logging

---

*Regenerate with `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
