use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration. Layered at load time: struct defaults, then
/// an optional TOML file, then `GOV_DATA__*` environment overrides. API
/// keys additionally fall back to the conventional environment variables
/// (`CONGRESS_API_KEY`, `FRED_API_KEY`) so a plain `.env`-style setup works
/// without a config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub congress: CongressConfig,
    pub treasury: TreasuryConfig,
    pub fred: FredConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Seconds to wait for in-flight work before forcing shutdown.
    pub graceful_shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            graceful_shutdown_timeout_secs: 5,
        }
    }
}

/// Congress.gov API settings. Key goes in the `x-api-key` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CongressConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Response format requested on every call via the `format` parameter.
    pub response_format: String,
    pub raise_on_http_error: bool,
}

impl Default for CongressConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.congress.gov/v3/".to_string(),
            api_key: None,
            response_format: "json".to_string(),
            raise_on_http_error: true,
        }
    }
}

/// Fiscal Data Treasury API settings. No credential required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasuryConfig {
    pub base_url: String,
    pub raise_on_http_error: bool,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v2/"
                .to_string(),
            raise_on_http_error: true,
        }
    }
}

/// FRED API settings. Key goes in the `api_key` query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FredConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Response format requested on every call via the `file_type` parameter.
    pub file_type: String,
    pub raise_on_http_error: bool,
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.stlouisfed.org/fred/".to_string(),
            api_key: None,
            file_type: "json".to_string(),
            // Unlike the other services, FRED errors are returned to the
            // caller with their real status code by default.
            raise_on_http_error: false,
        }
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file path. Without
    /// one, the platform config directory is consulted
    /// (`<config-dir>/gov-data-mcp/config.toml`) and skipped if absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
        } else if let Some(default_path) = Self::default_path() {
            if default_path.exists() {
                debug!(path = %default_path.display(), "loading default configuration file");
                builder = builder.add_source(config::File::from(default_path));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GOV_DATA")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_env_credentials();
        Ok(config)
    }

    /// Fill credentials from the conventional environment variables when
    /// the file/env layers left them unset.
    fn apply_env_credentials(&mut self) {
        if self.congress.api_key.is_none() {
            self.congress.api_key = env::var("CONGRESS_API_KEY").ok();
        }
        if self.fred.api_key.is_none() {
            self.fred.api_key = env::var("FRED_API_KEY").ok();
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gov-data-mcp").join("config.toml"))
    }
}
