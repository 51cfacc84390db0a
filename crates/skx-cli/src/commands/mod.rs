//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod config;
pub mod fetch;
pub mod sources;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::ConnectionArgs;
use std::sync::Arc;
use tracing::debug;

/// Load the stored config, apply per-run overrides and build a client.
///
/// Fails with a validation error before any request when the token or company code
/// is missing.
pub fn connect(args: &ConnectionArgs) -> Result<(Config, Arc<ApiClient>)> {
    let config = Config::load()?.with_overrides(args.token.clone(), args.company.clone());
    config.validate()?;

    let client = match &args.base_url {
        Some(url) => ApiClient::new(
            url.clone(),
            config.company_code.clone(),
            config.authorization.clone(),
        )?,
        None => ApiClient::for_company(config.company_code.clone(), config.authorization.clone())?,
    };
    debug!(base_url = %client.base_url(), company = %config.company_code, "Connecting");

    Ok((config, Arc::new(client)))
}
