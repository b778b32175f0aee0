//! Construction-time configurations for the three target APIs. Each
//! function maps a config section onto an [`AdapterConfig`] and builds the
//! long-lived adapter for that service; credentials are demanded here so a
//! missing key fails at startup instead of on the first call.

use crate::client::adapter::{AdapterConfig, ApiAdapter, ApiKey, Auth};
use crate::config::{CongressConfig, FredConfig, TreasuryConfig};
use crate::{Error, Result};

pub const CONGRESS_SENTINEL: &str = "API Failure";
pub const TREASURY_SENTINEL: &str = "FD Treasury API Failure";
pub const FRED_SENTINEL: &str = "FRED API Failure";

/// Congress.gov client: key in the `x-api-key` header, `format` parameter
/// on every request. The key is never placed in the query string.
pub fn congress_adapter(config: &CongressConfig) -> Result<ApiAdapter> {
    let api_key = config
        .api_key
        .clone()
        .ok_or(Error::MissingCredential {
            service: "congress.gov",
            variable: "CONGRESS_API_KEY",
        })?;

    AdapterConfig::new("congress.gov", &config.base_url)?
        .default_param("format", &config.response_format)
        .auth(Auth::Header {
            name: "x-api-key".to_string(),
            key: ApiKey::new(api_key),
        })
        .raise_on_http_error(config.raise_on_http_error)
        .failure_sentinel(CONGRESS_SENTINEL)
        .build()
}

/// Fiscal Data Treasury client: open API, no credential.
pub fn treasury_adapter(config: &TreasuryConfig) -> Result<ApiAdapter> {
    AdapterConfig::new("fiscaldata.treasury.gov", &config.base_url)?
        .raise_on_http_error(config.raise_on_http_error)
        .failure_sentinel(TREASURY_SENTINEL)
        .build()
}

/// FRED client: key and `file_type` as default query parameters. Errors
/// are returned with their real status by default rather than collapsed.
pub fn fred_adapter(config: &FredConfig) -> Result<ApiAdapter> {
    let api_key = config.api_key.clone().ok_or(Error::MissingCredential {
        service: "fred.stlouisfed.org",
        variable: "FRED_API_KEY",
    })?;

    AdapterConfig::new("fred.stlouisfed.org", &config.base_url)?
        .default_param("file_type", &config.file_type)
        .auth(Auth::Query {
            name: "api_key".to_string(),
            key: ApiKey::new(api_key),
        })
        .raise_on_http_error(config.raise_on_http_error)
        .failure_sentinel(FRED_SENTINEL)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_congress_adapter_requires_key() {
        let config = CongressConfig {
            api_key: None,
            ..CongressConfig::default()
        };
        let err = congress_adapter(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCredential {
                variable: "CONGRESS_API_KEY",
                ..
            }
        ));
    }

    #[test]
    fn test_fred_adapter_requires_key() {
        let config = FredConfig {
            api_key: None,
            ..FredConfig::default()
        };
        assert!(fred_adapter(&config).is_err());
    }

    #[test]
    fn test_treasury_adapter_builds_without_credentials() {
        let adapter = treasury_adapter(&TreasuryConfig::default()).unwrap();
        let url = adapter.resolve("accounting/od/debt_outstanding").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v2/accounting/od/debt_outstanding"
        );
    }

    #[test]
    fn test_congress_adapter_resolves_versioned_endpoints() {
        let config = CongressConfig {
            api_key: Some("test-key".to_string()),
            ..CongressConfig::default()
        };
        let adapter = congress_adapter(&config).unwrap();
        let url = adapter.resolve("bill/118/hr/1/actions").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.congress.gov/v3/bill/118/hr/1/actions"
        );
    }
}
