//! Error types and handling for the Mainstay SDK
//!
//! This module defines the error types that can be returned by SDK operations.
//! Errors carry enough detail (status code, server message, request ID) for a
//! caller to decide whether to retry, abort, or report upward. The API token is
//! never included in any error message.
//!
//! # Error Categories
//!
//! - **Credential**: no token could be resolved when building a client
//! - **Request**: the API answered with a non-2xx status
//! - **Transport**: connection, DNS, or timeout failure before any status
//! - **Parse**: the response body was not the JSON shape that was expected
//! - **Config** / **Export**: invalid client setup, or a failed file write
//!
//! # Example
//!
//! ```no_run
//! # use mainstay_sdk::{Client, ContactFilters, Error};
//! # fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
//! match client.get_contact("4045551234", &ContactFilters::default()) {
//!     Ok(contact) => println!("Got contact with {} fields", contact.len()),
//!     Err(Error::Http { status: 404, .. }) => println!("Contact not found"),
//!     Err(Error::Http { status: 401, .. }) => println!("Token rejected"),
//!     Err(Error::Timeout) => println!("Request timed out"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    /// The API token could not be resolved
    #[error("credential: {0}")]
    Credential(#[from] CredentialError),

    /// HTTP error from the API
    #[error("http {status}: {message} (req={request_id:?})")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message from the server, or a generic description
        message: String,
        /// Request ID sent with the failed request
        request_id: Option<String>,
    },

    /// Deserialization error
    #[error("deserialize: {0}")]
    Deserialize(String),

    /// Network error
    #[error("network: {0}")]
    Network(String),

    /// Request timeout
    #[error("timeout")]
    Timeout,

    /// Configuration error
    #[error("config: {0}")]
    Config(String),

    /// Writing tabular output failed
    #[error("export: {0}")]
    Export(String),

    /// Other errors
    #[error("other: {0}")]
    Other(String),
}

/// Failure to produce an API token for a new client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A prompt was required but no interactive terminal is attached
    #[error("no API token available and no interactive terminal to prompt on")]
    NonInteractive,

    /// The supplied token was empty
    #[error("API token must not be empty")]
    Empty,

    /// The credential store backend failed
    #[error("credential store: {0}")]
    Store(String),

    /// Reading from the terminal failed
    #[error("prompt: {0}")]
    Prompt(String),
}

/// Error categories used to branch on failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Token resolution failed
    Credential,
    /// Non-2xx HTTP status
    Request,
    /// Network, DNS, or timeout failure
    Transport,
    /// Unexpected response body
    Parse,
    /// Invalid client configuration
    Config,
    /// Tabular output could not be written
    Export,
    /// Other/unknown error
    Other,
}

impl Error {
    /// Get the error kind for categorization
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Credential(_) => ErrorKind::Credential,
            Error::Http { .. } => ErrorKind::Request,
            Error::Network(_) | Error::Timeout => ErrorKind::Transport,
            Error::Deserialize(_) => ErrorKind::Parse,
            Error::Config(_) => ErrorKind::Config,
            Error::Export(_) => ErrorKind::Export,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Check if retrying the same call could succeed
    ///
    /// The SDK never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            Error::Network(_) => true,
            Error::Timeout => true,
            _ => false,
        }
    }

    /// Get the HTTP status code if this is an HTTP error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the request ID if available
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Http { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// True for a 404 response
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Error body returned by the API (`{"detail": "..."}`)
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub detail: String,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() || err.is_request() {
            Error::Network(err.to_string())
        } else if err.is_decode() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialize(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Export(err.to_string())
    }
}
