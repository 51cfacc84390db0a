//! `skx config` command implementation
//!
//! Manages the stored token and company code.

use crate::config::{Config, CONFIG_DIR_ENV};
use crate::error::Result;
use colored::Colorize;

/// Get configuration value
pub async fn get(key: String) -> Result<()> {
    let config = Config::load()?;
    println!("{}", config.get(&key)?);
    Ok(())
}

/// Set configuration value
pub async fn set(key: String, value: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set(&key, value)?;
    let path = config.save()?;

    println!("{} Saved {} to {}", "✓".green(), key, path.display());
    Ok(())
}

/// Show all configuration
pub async fn show() -> Result<()> {
    let config = Config::load()?;
    let path = Config::default_path()?;

    println!("{}", "SKX CLI Configuration:".cyan().bold());
    println!();
    println!("{:<15} {}", "file:", path.display());
    println!("{:<15} {}", "company_code:", config.company_code);
    println!("{:<15} {}", "authorization:", config.masked_authorization());
    println!();
    println!("{}", "Environment Variables:".cyan());
    println!("  SKX_COMPANY_CODE  - Company code for one run");
    println!("  SKX_TOKEN         - Access token for one run");
    println!("  SKX_BASE_URL      - API base URL");
    println!("  {:<17} - Directory holding config.json", CONFIG_DIR_ENV);

    Ok(())
}

/// Restore the default configuration
pub async fn reset() -> Result<()> {
    let path = Config::default().save()?;
    println!("{} Reset configuration at {}", "✓".green(), path.display());
    Ok(())
}
