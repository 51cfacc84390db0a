//! `skx sources` command implementation

use crate::api::DataClient;
use crate::commands::connect;
use crate::error::Result;
use crate::ConnectionArgs;
use colored::Colorize;
use skx_common::types::Source;

pub async fn run(connection: ConnectionArgs) -> Result<()> {
    let (config, client) = connect(&connection)?;
    let sources = client.list_sources().await?;

    if sources.is_empty() {
        println!(
            "{} No branches found for company '{}'",
            "⚠".yellow(),
            config.company_code
        );
        return Ok(());
    }

    print!("{}", format_sources(&sources));
    println!(
        "{} {} branches for {}",
        "✓".green(),
        sources.len(),
        config.company_code.bold()
    );
    Ok(())
}

pub fn format_sources(sources: &[Source]) -> String {
    use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["#", "Name", "Code", "ID"]);

    for (index, source) in sources.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            source.display_name.clone(),
            source.code.clone(),
            source.id.clone(),
        ]);
    }

    format!("{}\n", table)
}
