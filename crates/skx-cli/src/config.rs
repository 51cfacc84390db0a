//! Configuration management for the SKX CLI
//!
//! Holds the access token and company code, persisted as `config.json` in the user's
//! config directory. Command-line flags and environment variables override the stored
//! values for a single run.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Company code used until one is configured
pub const DEFAULT_COMPANY_CODE: &str = "demo";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Overrides the directory holding `config.json`
pub const CONFIG_DIR_ENV: &str = "SKX_CONFIG_DIR";

/// Keys accepted by `skx config get/set`
pub const CONFIG_KEYS: [&str; 2] = ["authorization", "company_code"];

fn default_company_code() -> String {
    DEFAULT_COMPANY_CODE.to_string()
}

/// Persisted CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Bearer token for the remote service
    #[serde(default)]
    pub authorization: String,

    #[serde(default = "default_company_code")]
    pub company_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            authorization: String::new(),
            company_code: default_company_code(),
        }
    }
}

impl Config {
    /// Directory holding the config file
    pub fn default_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        Ok(dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?
            .join("skx"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            CliError::config(format!("Could not parse {}: {}", path.display(), e))
        })
    }

    /// Save to the default location, returning the path written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Replace the file at `path` with this configuration
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        match normalize_key(key)? {
            "authorization" => Ok(&self.authorization),
            _ => Ok(&self.company_code),
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match normalize_key(key)? {
            "authorization" => self.authorization = value.trim().to_string(),
            _ => self.company_code = value.trim().to_string(),
        }
        Ok(())
    }

    /// Apply per-run overrides from flags or environment
    pub fn with_overrides(mut self, token: Option<String>, company_code: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.authorization = token.trim().to_string();
        }
        if let Some(company) = company_code.filter(|c| !c.trim().is_empty()) {
            self.company_code = company.trim().to_string();
        }
        self
    }

    /// Both credentials must be present before any network call
    pub fn validate(&self) -> Result<()> {
        if self.company_code.trim().is_empty() {
            return Err(CliError::validation(
                "Company code is required. Set it with 'skx config set company_code <code>' or --company",
            ));
        }
        if self.authorization.trim().is_empty() {
            return Err(CliError::validation(
                "Access token is required. Set it with 'skx config set authorization <token>' or --token",
            ));
        }
        Ok(())
    }

    /// Token shortened for display
    pub fn masked_authorization(&self) -> String {
        let token = self.authorization.trim();
        if token.is_empty() {
            return "(not set)".to_string();
        }
        let visible: String = token.chars().take(6).collect();
        if visible.len() == token.len() {
            "******".to_string()
        } else {
            format!("{}...", visible)
        }
    }
}

fn normalize_key(key: &str) -> Result<&'static str> {
    match key.trim().to_lowercase().replace('-', "_").as_str() {
        "authorization" | "token" => Ok("authorization"),
        "company_code" | "companycode" | "company" => Ok("company_code"),
        _ => Err(CliError::config(format!(
            "Unknown config key '{}'. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        ))),
    }
}
