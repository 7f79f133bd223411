#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `schema-cache-transport`: Registry Transport Layer
//!
//! This crate defines the **transport abstraction** the schema cache uses to
//! talk to a remote schema registry.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! Performs exactly one request per call: a [`Method`], a path relative to
//! the registry base URL, and an optional JSON body. It returns the raw
//! response bytes of a successful (2xx) response, or a [`TransportError`].
//! Connection pooling, timeouts and authentication belong to the
//! implementation (see `schema-cache-http`).
//!
//! ### `TransportError`
//! Enumerates the classes of failure a transport can report. Non-2xx
//! responses surface as [`TransportError::Status`] together with the
//! registry's structured error body when one could be decoded.
//!
//! ### `Endpoint`
//! Path templating for every registry endpoint the cache needs.
//!
//! ### `RegistryApi`
//! A typed wrapper over a [`DynTransport`] that issues one endpoint call and
//! decodes its JSON body into the DTOs from the `types` crate.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, RegistryApi, TransportError};
//!
//! async fn demo(transport: DynTransport) -> Result<(), TransportError> {
//!     let api = RegistryApi::new(transport);
//!     for subject in api.subjects().await? {
//!         println!("{}", subject);
//!     }
//!     Ok(())
//! }
//! ```

/// Typed endpoint calls over a [`DynTransport`].
pub mod api;
/// Registry endpoint path templating.
pub mod endpoint;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use api::RegistryApi;
pub use endpoint::Endpoint;

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
///
/// Each variant corresponds to a distinct communication or parsing failure
/// mode, so that higher layers can classify failures without knowing which
/// backend produced them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The registry answered with a non-2xx status.
    ///
    /// `error_code` and `message` are present when the response body was a
    /// decodable registry error object.
    #[error("registry returned HTTP {status}{}", format_registry_detail(.error_code, .message))]
    Status {
        /// HTTP status code
        status: u16,
        /// Registry error code (e.g. `40403`), if the body carried one
        error_code: Option<i32>,
        /// Registry error message, if the body carried one
        message: Option<String>,
    },

    /// A connection-level failure (refused, reset, DNS, TLS).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Failure to serialize a request or deserialize a response payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

fn format_registry_detail(error_code: &Option<i32>, message: &Option<String>) -> String {
    match (error_code, message.as_deref()) {
        (Some(code), Some(msg)) => format!(" (error_code {}): {}", code, msg),
        (Some(code), None) => format!(" (error_code {})", code),
        (None, Some(msg)) => format!(": {}", msg),
        (None, None) => String::new(),
    }
}

impl TransportError {
    /// HTTP status of a [`TransportError::Status`], `None` for other variants.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error carries a decoded registry error object.
    pub fn has_registry_body(&self) -> bool {
        matches!(self, TransportError::Status { error_code: Some(_), .. })
            || matches!(self, TransportError::Status { message: Some(_), .. })
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

/// HTTP method of a registry request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Canonical upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The registry transport: one HTTP-equivalent request per call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request against the registry.
    ///
    /// `path` is relative to the transport's base URL and always starts with
    /// `/`. On a 2xx response the raw body bytes are returned; any other
    /// outcome is reported as a [`TransportError`].
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Vec<u8>>;

    /// Returns the configured base URL or a symbolic name for stubs.
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::{DynTransport, Transport};
///
/// fn use_transport(t: DynTransport) {
///     println!("Using registry: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// Transport configuration for a registry connection.
///
/// # Examples
///
/// ```
/// use transport::TransportConfig;
///
/// let config = TransportConfig {
///     endpoint: "http://127.0.0.1:8081".to_string(),
///     timeout_secs: 5,
///     auth: Some(transport::AuthConfig {
///         auth_type: "basic".to_string(),
///         username: Some("registry".to_string()),
///         password: Some("secret".to_string()),
///         token: None,
///     }),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Registry base URL
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Authentication settings (optional)
    pub auth: Option<AuthConfig>,
}

/// Authentication configuration for transport connections.
///
/// Supports basic auth and bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Auth type ("basic", "token" or "none")
    pub auth_type: String,
    /// Username (for basic auth)
    pub username: Option<String>,
    /// Password (for basic auth)
    pub password: Option<String>,
    /// Token (for token auth)
    pub token: Option<String>,
}

/// Gets a random free port assigned by the OS.
///
/// This function binds to `127.0.0.1:0`, which causes the OS to assign
/// an available port. The listener is then dropped and the port number
/// is returned.
///
/// # Examples
///
/// ```
/// use transport::get_random_free_port;
///
/// let port = get_random_free_port()?;
/// println!("Using port: {}", port);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn get_random_free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
