pub mod congress;
pub mod fred;
pub mod treasury;

pub use congress::CongressTools;
pub use fred::FredTools;
pub use treasury::TreasuryTools;

use crate::client::{Payload, ResponseEnvelope};
use tracing::warn;

/// Collapse an envelope into tool output text: the response body on a 200,
/// the fixed fallback message on anything else. The envelope keeps the real
/// status and payload for callers that want detail; this layer is where
/// that detail is deliberately flattened for the agent.
pub(crate) fn render(envelope: ResponseEnvelope, fallback: &str) -> String {
    if envelope.status != 200 {
        warn!(status = envelope.status, fallback, "upstream request unsuccessful");
        return fallback.to_string();
    }
    match envelope.payload {
        Payload::Json(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        Payload::Raw(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Payload::Failure(_) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TRANSPORT_FAILURE;
    use serde_json::json;

    #[test]
    fn test_render_pretty_prints_json_on_success() {
        let envelope = ResponseEnvelope {
            payload: Payload::Json(json!({"bills": [{"number": "1"}]})),
            status: 200,
        };
        let text = render(envelope, "Unable to fetch bills.");
        assert!(text.contains("\"bills\""));
        assert!(text.contains("\"number\""));
    }

    #[test]
    fn test_render_passes_raw_bodies_through() {
        let envelope = ResponseEnvelope {
            payload: Payload::Raw(b"record_date,value\n2025-01-01,1".to_vec()),
            status: 200,
        };
        let text = render(envelope, "Unable to fetch.");
        assert!(text.starts_with("record_date"));
    }

    #[test]
    fn test_render_uses_fallback_on_error_status() {
        let envelope = ResponseEnvelope {
            payload: Payload::Json(json!({"error": "not found"})),
            status: 404,
        };
        assert_eq!(render(envelope, "Unable to fetch bills."), "Unable to fetch bills.");
    }

    #[test]
    fn test_render_uses_fallback_on_transport_failure() {
        let envelope = ResponseEnvelope {
            payload: Payload::Failure("API Failure".to_string()),
            status: TRANSPORT_FAILURE,
        };
        assert_eq!(render(envelope, "Unable to fetch bills."), "Unable to fetch bills.");
    }
}
