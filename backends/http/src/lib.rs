#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `schema-cache-http`: HTTP Transport Backend
//!
//! This crate provides the concrete HTTP implementation of the
//! [`transport::Transport`] trait used against a live schema registry.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::Client`]
//! - Sends the registry media type in `Accept` (and `Content-Type` when a
//!   body is present)
//! - Supports unauthenticated, basic-auth and bearer-token access
//! - Applies a per-request timeout ([`DEFAULT_TIMEOUT`] unless configured)
//!
//! ## Example
//! ```no_run
//! use schema_cache_http::HttpTransport;
//! use transport::{Method, Transport};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = HttpTransport::with_auth("http://127.0.0.1:8081", "svc", "secret").unwrap();
//! let subjects = transport.request(Method::Get, "/subjects", None).await.unwrap();
//! println!("{}", String::from_utf8_lossy(&subjects));
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use transport::{AuthConfig, Method, Transport, TransportConfig, TransportError};
use types::ErrorBody;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Credentials {
    Basic { username: String, password: Option<String> },
    Bearer(String),
}

/// A concrete implementation of the [`Transport`] trait using HTTP.
///
/// Performs no caching, retries or response typing: a 2xx body is returned
/// as raw bytes, and any other status becomes [`TransportError::Status`]
/// carrying the registry's `error_code` and `message` when the body holds
/// them.
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
    /// Registry base URL without a trailing `/` (e.g. `http://127.0.0.1:8081`).
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl HttpTransport {
    /// Constructs an unauthenticated transport with [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    /// [`TransportError::Other`] if `url` is empty.
    ///
    /// # Example
    /// ```
    /// use schema_cache_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://127.0.0.1:8081/").unwrap();
    /// assert_eq!(transport.endpoint(), "http://127.0.0.1:8081");
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::build(url.into(), None, DEFAULT_TIMEOUT)
    }

    /// Constructs a transport sending basic-auth credentials.
    pub fn with_auth(
        url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let credentials = Credentials::Basic { username: user.into(), password: Some(pass.into()) };
        Self::build(url.into(), Some(credentials), DEFAULT_TIMEOUT)
    }

    /// Returns a copy of this transport with a different request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, TransportError> {
        Self::build(self.base_url, self.credentials, timeout)
    }

    /// Constructs a transport from a [`TransportConfig`].
    ///
    /// `auth_type` is `basic` (username and optional password) or `bearer`
    /// (token); a zero `timeout_secs` selects [`DEFAULT_TIMEOUT`].
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let credentials = config.auth.as_ref().map(credentials_from).transpose()?;
        let timeout = match config.timeout_secs {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        Self::build(config.endpoint.clone(), credentials, timeout)
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration { self.timeout }

    fn build(
        url: String,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let base_url = url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TransportError::Other("registry URL must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;

        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", base_url));
        Ok(Self { client, base_url, credentials, timeout })
    }
}

fn credentials_from(auth: &AuthConfig) -> Result<Credentials, TransportError> {
    match auth.auth_type.to_ascii_lowercase().as_str() {
        "basic" => {
            let username = auth.username.clone().ok_or_else(|| {
                TransportError::Other("basic auth requires a username".to_string())
            })?;
            Ok(Credentials::Basic { username, password: auth.password.clone() })
        }
        "bearer" => auth
            .token
            .clone()
            .map(Credentials::Bearer)
            .ok_or_else(|| TransportError::Other("bearer auth requires a token".to_string())),
        other => Err(TransportError::Other(format!("unsupported auth type: {}", other))),
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Turns a non-2xx response into [`TransportError::Status`].
fn status_error(status: u16, body: &[u8]) -> TransportError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    let error_code = parsed.as_ref().map(|b| b.error_code).filter(|code| *code != 0);
    let message = parsed.map(|b| b.message).filter(|m| !m.is_empty());
    TransportError::Status { status, error_code, message }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Sends one request to `{base_url}{path}` and returns the body of a 2xx response.
    ///
    /// # Errors
    /// - [`TransportError::Timeout`] if the request exceeds the timeout
    /// - [`TransportError::Http`] if the connection fails or the body cannot be read
    /// - [`TransportError::Serialization`] if `body` cannot be encoded
    /// - [`TransportError::Status`] for any non-2xx status
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%method, %url, "Registry request");

        let mut req =
            self.client.request(http_method(method), &url).header(ACCEPT, types::CONTENT_TYPE);
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, types::CONTENT_TYPE).body(serde_json::to_vec(body)?);
        }
        req = match &self.credentials {
            Some(Credentials::Basic { username, password }) => {
                req.basic_auth(username, password.as_ref())
            }
            Some(Credentials::Bearer(token)) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::error!(%url, timeout_ms, "Registry request timed out");
                TransportError::Timeout(e.to_string())
            } else {
                tracing::error!(%url, error = %e, "Registry request failed");
                TransportError::Http(e.to_string())
            }
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!(%url, error = %e, "Failed to read registry response body");
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        if !status.is_success() {
            let err = status_error(status.as_u16(), &bytes);
            tracing::debug!(
                %url,
                status = status.as_u16(),
                error = %err,
                "Registry returned an error status"
            );
            return Err(err);
        }
        Ok(bytes.to_vec())
    }

    /// Returns the registry base URL.
    fn endpoint(&self) -> &str { &self.base_url }
}
