//! Branch enumeration

use crate::api::DataClient;
use crate::error::{CliError, Result};
use skx_common::types::Source;
use tracing::debug;

/// Ordered branch list for the session; an empty list is fatal
pub async fn resolve_sources(client: &dyn DataClient, company_code: &str) -> Result<Vec<Source>> {
    let sources = client.list_sources().await?;
    debug!(company = %company_code, count = sources.len(), "Resolved sources");

    if sources.is_empty() {
        return Err(CliError::NoSources(company_code.to_string()));
    }

    Ok(sources)
}
