//! Authorization header construction
//!
//! The Mainstay API authenticates every request with a static API token sent
//! as `Authorization: APIToken <token>`. The header name and scheme prefix are
//! configuration, so a deployment behind a gateway that expects something else
//! (for example `Bearer`) only needs a different [`AuthScheme`].
//!
//! # Examples
//!
//! ```
//! use mainstay_sdk::AuthScheme;
//!
//! // Default Mainstay scheme
//! let scheme = AuthScheme::default();
//! assert_eq!(scheme.header_name(), "Authorization");
//! assert_eq!(scheme.prefix(), Some("APIToken"));
//!
//! // Bare token in a custom header
//! let scheme = AuthScheme::new("X-API-Key", None::<String>);
//! ```

use crate::errors::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Header name and value prefix used to present the API token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScheme {
    header: String,
    prefix: Option<String>,
}

impl AuthScheme {
    /// Create a scheme sending `<header>: <prefix> <token>`, or just the token
    /// when `prefix` is `None`
    pub fn new(header: impl Into<String>, prefix: Option<impl Into<String>>) -> Self {
        Self {
            header: header.into(),
            prefix: prefix.map(Into::into),
        }
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer() -> Self {
        Self::new("Authorization", Some("Bearer"))
    }

    /// Header the token is sent in
    pub fn header_name(&self) -> &str {
        &self.header
    }

    /// Scheme word placed before the token, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl Default for AuthScheme {
    fn default() -> Self {
        Self::new("Authorization", Some("APIToken"))
    }
}

/// A resolved API token bound to the scheme it is presented with
///
/// # Security
///
/// The token is stored as a [`SecretString`] so it never shows up in debug
/// output, and the generated header value is flagged sensitive.
#[derive(Clone)]
pub(crate) struct Auth {
    scheme: AuthScheme,
    token: SecretString,
}

impl Auth {
    pub(crate) fn new(scheme: AuthScheme, token: SecretString) -> Self {
        Self { scheme, token }
    }

    /// Get the authorization header name and value
    ///
    /// Fails when the configured header name or the token contains bytes that
    /// are not allowed in an HTTP header.
    pub(crate) fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        let name = HeaderName::from_bytes(self.scheme.header.as_bytes()).map_err(|_| {
            Error::Config(format!(
                "'{}' is not a valid header name",
                self.scheme.header
            ))
        })?;

        let raw = match &self.scheme.prefix {
            Some(prefix) => format!("{} {}", prefix, self.token.expose_secret()),
            None => self.token.expose_secret().clone(),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            Error::Config("API token contains characters not allowed in a header".to_string())
        })?;
        value.set_sensitive(true);

        Ok((name, value))
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Auth({}: ****)", self.scheme.header)
    }
}
