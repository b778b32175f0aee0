use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Status code reserved for transport-level failure. Never a real HTTP
/// status: the envelope carries it if and only if no valid response was
/// obtained and the payload is the configured failure sentinel.
pub const TRANSPORT_FAILURE: i32 = -1;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// An API credential. Wrapped so the value cannot leak through `Debug`
/// output or log lines.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Access the underlying secret. Call sites are limited to request
    /// construction; the value must never reach a log line.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where the credential is placed on outgoing requests. Header auth is
/// installed on the underlying session at construction; query auth is
/// attached by the adapter on every call. Never both, and never supplied
/// as a per-call argument.
#[derive(Debug, Clone)]
pub enum Auth {
    /// No credential (e.g. the Fiscal Data Treasury API).
    None,
    /// Credential sent as a request header, `x-api-key` style.
    Header { name: String, key: ApiKey },
    /// Credential sent as a default query parameter, `api_key` style.
    Query { name: String, key: ApiKey },
}

/// HTTP verbs the adapter dispatches. The set is closed at compile time;
/// parsing an unknown verb name fails with [`Error::UnsupportedVerb`],
/// which propagates to the caller rather than being folded into the
/// failure sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            other => Err(Error::UnsupportedVerb(other.to_string())),
        }
    }
}

/// Optional request body for non-GET calls.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Bytes(Vec<u8>),
}

/// Per-call request arguments, passed through to the transport verbatim.
/// The adapter does not validate or reshape them.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json_body(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    #[must_use]
    pub fn bytes_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes(body));
        self
    }

    /// Caller-supplied timeout for this request only. The adapter imposes
    /// no timeout of its own.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Decoded response payload. JSON bodies (content-type prefix
/// `application/json`) are parsed; everything else is returned as raw
/// bytes. `Failure` carries the per-service sentinel string when no valid
/// response was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
    Failure(String),
}

impl Payload {
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// The normalized result of every adapter call: a payload and the status
/// code it arrived with.
///
/// Invariant: `status == TRANSPORT_FAILURE` if and only if the payload is
/// `Payload::Failure`. Any other status reflects a real response,
/// including non-2xx bodies when `raise_on_http_error` is off.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub payload: Payload,
    pub status: i32,
}

impl ResponseEnvelope {
    fn failure(sentinel: &str) -> Self {
        Self {
            payload: Payload::Failure(sentinel.to_string()),
            status: TRANSPORT_FAILURE,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE
    }

    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        self.payload.as_json()
    }
}

/// Construction-time configuration for one [`ApiAdapter`]. Immutable after
/// `build`.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    service: &'static str,
    base_url: Url,
    default_params: Vec<(String, String)>,
    auth: Auth,
    raise_on_http_error: bool,
    failure_sentinel: String,
}

impl AdapterConfig {
    /// Start a configuration for the named service. The base URL path is
    /// normalized to a trailing slash so relative endpoints join under it
    /// instead of replacing its last segment.
    pub fn new(service: &'static str, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            service,
            base_url,
            default_params: Vec::new(),
            auth: Auth::None,
            raise_on_http_error: true,
            failure_sentinel: "API Failure".to_string(),
        })
    }

    /// Query parameter sent on every request (e.g. `format=json`).
    #[must_use]
    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// When on, any non-2xx status is treated as a transport-layer error
    /// and collapses into the failure sentinel. The original status code is
    /// lost in that mode; callers that need it turn this off.
    #[must_use]
    pub const fn raise_on_http_error(mut self, raise: bool) -> Self {
        self.raise_on_http_error = raise;
        self
    }

    #[must_use]
    pub fn failure_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.failure_sentinel = sentinel.into();
        self
    }

    pub fn build(self) -> Result<ApiAdapter> {
        ApiAdapter::new(self)
    }
}

/// Generic request-forwarding client: one configured transport session per
/// target API. Turns "verb + endpoint + arguments" into a normalized
/// [`ResponseEnvelope`] and never lets a transport error escape.
///
/// One adapter is built per service at startup and shared by reference;
/// `invoke` takes `&self` and is safe to call from concurrent tasks. No
/// retry, no backoff, and no default timeout: one best-effort attempt per
/// call, with any reliability layering left to the caller.
#[derive(Debug, Clone)]
pub struct ApiAdapter {
    http: Client,
    config: AdapterConfig,
}

impl ApiAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Auth::Header { name, key } = &config.auth {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                Error::InvalidInput {
                    field: "auth header name".to_string(),
                    reason: e.to_string(),
                }
            })?;
            let mut value =
                HeaderValue::from_str(key.expose()).map_err(|e| Error::InvalidInput {
                    field: "auth header value".to_string(),
                    reason: e.to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    /// The service name this adapter was configured for.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.config.service
    }

    /// Resolve an endpoint against the base URL with standard relative-URL
    /// semantics. An absolute endpoint overrides the base entirely.
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        Ok(self.config.base_url.join(endpoint)?)
    }

    pub async fn get(&self, endpoint: &str) -> ResponseEnvelope {
        self.invoke(Verb::Get, endpoint, RequestOptions::new()).await
    }

    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> ResponseEnvelope {
        self.invoke(Verb::Post, endpoint, options).await
    }

    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> ResponseEnvelope {
        self.invoke(Verb::Put, endpoint, options).await
    }

    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> ResponseEnvelope {
        self.invoke(Verb::Delete, endpoint, options).await
    }

    /// Issue one request and normalize the outcome. Total over transport
    /// conditions: connection errors, timeouts, decode failures, and (when
    /// `raise_on_http_error` is on) non-2xx statuses all land in the
    /// failure envelope instead of an `Err`. Callers branch on the status
    /// code, never on exceptions.
    pub async fn invoke(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> ResponseEnvelope {
        match self.try_invoke(verb, endpoint, options).await {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(
                    service = self.config.service,
                    %verb,
                    endpoint,
                    error = %e,
                    "request failed"
                );
                ResponseEnvelope::failure(&self.config.failure_sentinel)
            }
        }
    }

    async fn try_invoke(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope> {
        let url = self.resolve(endpoint)?;

        // Closed dispatch table: every supported verb maps to a transport
        // call here.
        let mut builder = match verb {
            Verb::Get => self.http.get(url),
            Verb::Post => self.http.post(url),
            Verb::Put => self.http.put(url),
            Verb::Delete => self.http.delete(url),
        };

        // Defaults first, then query-mode auth, then per-call parameters.
        // Query strings embedded in the endpoint itself survive: reqwest
        // appends rather than replaces.
        if !self.config.default_params.is_empty() {
            builder = builder.query(&self.config.default_params);
        }
        if let Auth::Query { name, key } = &self.config.auth {
            builder = builder.query(&[(name.as_str(), key.expose())]);
        }
        for (name, value) in &options.params {
            builder = builder.query(&[(name.as_str(), value.as_str())]);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        match &options.body {
            Some(RequestBody::Json(value)) => builder = builder.json(value),
            Some(RequestBody::Bytes(bytes)) => builder = builder.body(bytes.clone()),
            None => {}
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let request = builder.build()?;
        let resolved = self.redacted(request.url());

        let response = self.http.execute(request).await?;
        let response = if self.config.raise_on_http_error {
            response.error_for_status()?
        } else {
            response
        };

        let status = i32::from(response.status().as_u16());
        debug!(url = %resolved, status, "request completed");

        // Content-type prefix match is the sole decode criterion, so
        // "application/json; charset=utf-8" still decodes as JSON.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let payload = if is_json {
            Payload::Json(response.json().await?)
        } else {
            Payload::Raw(response.bytes().await?.to_vec())
        };

        Ok(ResponseEnvelope { payload, status })
    }

    /// Render a URL for logging with the query-mode credential masked.
    fn redacted(&self, url: &Url) -> String {
        let Auth::Query { name, .. } = &self.config.auth else {
            return url.to_string();
        };
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                if k.as_ref() == name.as_str() {
                    (k.into_owned(), "***".to_string())
                } else {
                    (k.into_owned(), v.into_owned())
                }
            })
            .collect();
        let mut clean = url.clone();
        clean.query_pairs_mut().clear().extend_pairs(pairs);
        clean.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_adapter(base_url: &str) -> ApiAdapter {
        AdapterConfig::new("test", base_url)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_verb_parsing() {
        assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("POST".parse::<Verb>().unwrap(), Verb::Post);
        assert_eq!("Put".parse::<Verb>().unwrap(), Verb::Put);
        assert_eq!("delete".parse::<Verb>().unwrap(), Verb::Delete);

        let err = "brew".parse::<Verb>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedVerb(name) if name == "brew"));
    }

    #[test]
    fn test_verb_round_trip() {
        for verb in Verb::ALL {
            assert_eq!(verb.as_str().parse::<Verb>().unwrap(), verb);
        }
    }

    #[test]
    fn test_relative_endpoint_joins_under_base() {
        let adapter = test_adapter("https://api.example.org/v3/");
        let url = adapter.resolve("bill/118/hr/1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/v3/bill/118/hr/1");
    }

    #[test]
    fn test_endpoint_query_string_survives_join() {
        let adapter = test_adapter("https://api.example.org/v3/");
        let url = adapter.resolve("bill?limit=100").unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/v3/bill?limit=100");
    }

    #[test]
    fn test_absolute_endpoint_overrides_base() {
        let adapter = test_adapter("https://api.example.org/v3/");
        let url = adapter.resolve("https://other.example.org/x").unwrap();
        assert_eq!(url.as_str(), "https://other.example.org/x");
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let adapter = test_adapter("https://api.example.org/v3");
        let url = adapter.resolve("bill/118").unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/v3/bill/118");
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn test_redacted_masks_query_credential() {
        let adapter = AdapterConfig::new("test", "https://api.example.org/")
            .unwrap()
            .auth(Auth::Query {
                name: "api_key".to_string(),
                key: ApiKey::new("super-secret"),
            })
            .build()
            .unwrap();

        let url =
            Url::parse("https://api.example.org/releases?api_key=super-secret&file_type=json")
                .unwrap();
        let logged = adapter.redacted(&url);
        assert!(!logged.contains("super-secret"));
        assert!(logged.contains("api_key=***"));
        assert!(logged.contains("file_type=json"));
    }

    #[test]
    fn test_failure_envelope_invariant() {
        let envelope = ResponseEnvelope::failure("API Failure");
        assert!(envelope.is_transport_failure());
        assert!(!envelope.is_success());
        assert_eq!(
            envelope.payload,
            Payload::Failure("API Failure".to_string())
        );
    }

    #[test]
    fn test_success_envelope_checks() {
        let envelope = ResponseEnvelope {
            payload: Payload::Json(serde_json::json!({"bills": []})),
            status: 200,
        };
        assert!(envelope.is_success());
        assert!(!envelope.is_transport_failure());
        assert!(envelope.json().unwrap().get("bills").is_some());

        let not_found = ResponseEnvelope {
            payload: Payload::Raw(b"gone".to_vec()),
            status: 404,
        };
        assert!(!not_found.is_success());
        assert!(!not_found.is_transport_failure());
    }
}
