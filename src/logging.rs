//! Tracing subscriber initialization.
//!
//! The SDK itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init`] to print them to stderr,
//! which keeps stdout free for exported data.

use crate::errors::{Error, Result};

/// Install a stderr subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_directive` (e.g. `"mainstay_sdk=info"`) when
/// `RUST_LOG` is unset or invalid.
///
/// # Errors
///
/// `Error::Config` if the directive is invalid or a global subscriber is
/// already installed.
pub fn init(default_directive: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| Error::Config(format!("Invalid log directive: {}", e)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|_| Error::Config("Tracing subscriber already initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Another test in this binary may have installed one first
        let _ = init("mainstay_sdk=debug");
        assert!(matches!(init("mainstay_sdk=debug"), Err(Error::Config(_))));
    }
}
