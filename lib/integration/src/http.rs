//! HTTP capability used by connectors.
//!
//! Connectors describe the request they need as an [`HttpRequest`] and hand it
//! to an injected [`HttpClient`]. Production code uses [`ReqwestHttpClient`];
//! tests substitute a recording client so no network is involved.
//!
//! Retries, redirects and TLS policy are the client's concern. Connectors never
//! retry on their own.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Url;
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Content type used for form-encoded request bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP methods a connector may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters travel in the query string.
    Get,
    /// Parameters travel in a form-encoded body.
    Post,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound request.
///
/// Parameters keep their insertion order so the encoded query string or body
/// is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The request method.
    pub method: HttpMethod,
    /// Base URL of the remote service (e.g., "https://crm.example.com").
    pub base_url: String,
    /// Path appended to the base URL (e.g., "/webservice.php").
    pub path: String,
    /// Query string parameters for GET, form fields for POST.
    pub params: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a GET request carrying its parameters in the query string.
    #[must_use]
    pub fn get(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, base_url, path)
    }

    /// Creates a POST request carrying its parameters in a form-encoded body.
    #[must_use]
    pub fn post_form(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, base_url, path)
    }

    fn new(method: HttpMethod, base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first parameter with the given name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the parameter names in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Returns the content type of the request body, if it has one.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self.method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(FORM_URLENCODED),
        }
    }

    /// Returns the parameters encoded as `application/x-www-form-urlencoded`.
    ///
    /// The same encoding is used for the query string and the form body.
    #[must_use]
    pub fn encoded_params(&self) -> String {
        // Serializing a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(&self.params).unwrap_or_default()
    }

    /// Builds the target URL by appending the path to the base URL.
    ///
    /// The base URL may carry its own path prefix; it is kept.
    pub fn url(&self) -> Result<Url, Report<TransportError>> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let url = Url::parse(&joined).map_err(|e| TransportError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        Ok(url)
    }
}

/// Capability for executing HTTP requests.
///
/// Implementations send exactly one request per call and parse the response
/// body as JSON.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the server answers
    /// with a non-success status, or the body is not JSON.
    async fn send(&self, request: HttpRequest) -> Result<JsonValue, Report<TransportError>>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Creates a client with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Report<TransportError>> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::ClientSetup {
            reason: e.to_string(),
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<JsonValue, Report<TransportError>> {
        let url = request.url()?;
        let url_str = url.to_string();

        debug!(
            method = %request.method,
            url = %url_str,
            params = ?request.param_names(),
            "sending request"
        );

        let builder = match request.method {
            HttpMethod::Get => self.client.get(url).query(&request.params),
            HttpMethod::Post => self.client.post(url).form(&request.params),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url_str.clone(),
                }
            } else {
                TransportError::RequestFailed {
                    url: url_str.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url_str,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .json::<JsonValue>()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                url: url_str.clone(),
                reason: e.to_string(),
            })?;

        Ok(body)
    }
}
