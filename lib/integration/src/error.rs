//! Error types for the integration crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ConnectorError`: Errors from connector operations
//! - `CredentialError`: Errors from credential validation
//! - `TransportError`: Errors from the HTTP capability

use std::fmt;

/// Errors from connector operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Connection to service failed.
    ConnectionFailed { reason: String },
    /// Authentication failed.
    AuthenticationFailed { reason: String },
    /// Operation not supported.
    OperationNotSupported { operation: String },
    /// Invalid operation parameters.
    InvalidParameters { operation: String, reason: String },
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed { reason } => {
                write!(f, "connection failed: {reason}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "authentication failed: {reason}")
            }
            Self::OperationNotSupported { operation } => {
                write!(f, "operation not supported: {operation}")
            }
            Self::InvalidParameters { operation, reason } => {
                write!(f, "invalid parameters for '{operation}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConnectorError {}

/// Errors from credential validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A required credential field is empty.
    MissingField { field: String },
    /// The host is not an absolute http(s) URL.
    InvalidHost { host: String, reason: String },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "credential field '{field}' is required")
            }
            Self::InvalidHost { host, reason } => {
                write!(f, "invalid credential host '{host}': {reason}")
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// Errors from the HTTP capability.
///
/// These carry only what the transport layer knows. The caller adds the
/// operation being performed via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request URL could not be built.
    InvalidUrl { url: String, reason: String },
    /// The HTTP client could not be constructed.
    ClientSetup { reason: String },
    /// The request could not be sent or the connection failed.
    RequestFailed { url: String, reason: String },
    /// The server answered with a non-success status.
    Status { url: String, status: u16 },
    /// The request timed out.
    Timeout { url: String },
    /// The response body was not valid JSON.
    InvalidResponse { url: String, reason: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => {
                write!(f, "invalid request url '{url}': {reason}")
            }
            Self::ClientSetup { reason } => {
                write!(f, "failed to build http client: {reason}")
            }
            Self::RequestFailed { url, reason } => {
                write!(f, "request to '{url}' failed: {reason}")
            }
            Self::Status { url, status } => {
                write!(f, "request to '{url}' returned status {status}")
            }
            Self::Timeout { url } => write!(f, "request to '{url}' timed out"),
            Self::InvalidResponse { url, reason } => {
                write!(f, "invalid response from '{url}': {reason}")
            }
        }
    }
}

impl std::error::Error for TransportError {}
