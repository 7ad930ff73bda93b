//! Mainstay SDK for Rust
//!
//! A blocking client for the Mainstay (formerly AdmitHub) REST API, used to
//! pull contacts, campaigns, and messages out of a Mainstay organization for
//! reporting and analysis.
//!
//! # Features
//!
//! - API token resolved once per client: explicit token, then the OS keyring,
//!   then an interactive prompt that can save what was entered
//! - One method per endpoint, each a single HTTP round-trip
//! - Failures returned as [`Error`] values; a failed call leaves the client
//!   usable
//! - JSON listings flattened into a [`Table`] with first-seen column order,
//!   exportable as CSV
//! - Optional OpenTelemetry metrics (`metrics` feature) and a ready-made
//!   `tracing` subscriber (`logging` feature)
//!
//! # Example
//!
//! ```no_run
//! use mainstay_sdk::{ClientBuilder, MessageFilters};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new("https://api.admithub.com/")
//!         .token("your-api-token")
//!         .build()?;
//!
//!     let page = client.get_messages(&MessageFilters {
//!         since: Some("2024-08-26T00:00:00Z".to_string()),
//!         ..Default::default()
//!     })?;
//!     page.to_table().save_csv("messages.csv")?;
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs, missing_debug_implementations, unsafe_code)]
#![warn(unused_results)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod auth;
mod client;
mod config;
mod credentials;
mod endpoints;
mod errors;
/// Tracing subscriber setup for applications
#[cfg(feature = "logging")]
pub mod logging;
mod models;
mod table;
/// Telemetry and observability support
#[cfg(feature = "metrics")]
pub mod telemetry;

#[cfg(not(feature = "metrics"))]
mod telemetry;
mod util;

pub use auth::AuthScheme;
pub use client::Client;
pub use config::{
    ClientBuilder, ClientConfig, ENV_API_TOKEN, ENV_BASE_URL, ENV_SERVICE_NAME, ENV_TIMEOUT_MS,
};
pub use credentials::{
    CredentialResolver, CredentialStore, FixedPrompter, KeyringStore, MemoryStore, Prompter,
    TerminalPrompter,
};
pub use errors::{CredentialError, Error, ErrorKind, Result};
pub use models::*;
pub use table::Table;
pub use telemetry::TelemetryConfig;
pub use util::daily_windows;

// Re-export commonly used types
pub use secrecy::SecretString;

/// SDK version, matches Cargo.toml version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.admithub.com/";

/// Default timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Credential store service name used when none is configured
pub const DEFAULT_SERVICE_NAME: &str = "MainstayConnector";

/// Credential store account name used when none is configured
pub const DEFAULT_ACCOUNT_NAME: &str = "api_token";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_base_url_is_https() {
        assert!(DEFAULT_BASE_URL.starts_with("https://"));
    }
}
