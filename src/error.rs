use thiserror::Error;

/// Error type shared across the crate.
///
/// Transport-level failures never surface through this type during a tool
/// call: the API adapter converts them into its failure sentinel at the call
/// boundary. The variants here cover construction, configuration, and
/// programmer errors that *should* propagate.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // HTTP client construction / request build errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    // Programmer error: a verb name the transport does not support.
    // Deliberately not swallowed by the adapter - this signals a bug in
    // calling code, not an operational condition.
    #[error("Unsupported HTTP verb: {0}")]
    UnsupportedVerb(String),

    #[error("Missing credential for {service}: set {variable}")]
    MissingCredential {
        service: &'static str,
        variable: &'static str,
    },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("MCP protocol error: {0}")]
    Mcp(String),

    #[error("Service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_verb_display() {
        let err = Error::UnsupportedVerb("brew".to_string());
        assert_eq!(err.to_string(), "Unsupported HTTP verb: brew");
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = Error::MissingCredential {
            service: "congress.gov",
            variable: "CONGRESS_API_KEY",
        };
        assert!(err.to_string().contains("CONGRESS_API_KEY"));
    }
}
