use crate::{
    auth::AuthScheme,
    credentials::{CredentialResolver, CredentialStore, KeyringStore, Prompter, TerminalPrompter},
    errors::Result,
    telemetry::TelemetryConfig,
    Error,
};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "MAINSTAY_BASE_URL";
/// Environment variable holding an explicit API token
pub const ENV_API_TOKEN: &str = "MAINSTAY_API_TOKEN";
/// Environment variable overriding the request timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "MAINSTAY_TIMEOUT_MS";
/// Environment variable overriding the credential store service name
pub const ENV_SERVICE_NAME: &str = "MAINSTAY_SERVICE_NAME";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Mainstay API
    pub base_url: String,
    /// How the token is presented
    pub auth_scheme: AuthScheme,
    /// Request timeout
    pub timeout: Duration,
    /// User agent suffix
    pub user_agent_suffix: Option<String>,
    /// Allow plain HTTP base URLs
    pub allow_insecure_http: bool,
    /// Credential store service name
    pub service_name: String,
    /// Credential store account name
    pub account_name: String,
    /// Telemetry configuration
    pub telemetry_config: TelemetryConfig,
}

/// Builder for creating a configured Client
///
/// Building resolves the API token; see [`CredentialResolver`] for the order
/// in which sources are tried.
pub struct ClientBuilder {
    base_url: String,
    token: Option<SecretString>,
    auth_scheme: AuthScheme,
    timeout_ms: u64,
    user_agent_suffix: Option<String>,
    allow_insecure_http: bool,
    service_name: String,
    account_name: String,
    store: Option<Arc<dyn CredentialStore>>,
    prompter: Option<Arc<dyn Prompter>>,
    telemetry_config: TelemetryConfig,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "****"))
            .field("auth_scheme", &self.auth_scheme)
            .field("timeout_ms", &self.timeout_ms)
            .field("service_name", &self.service_name)
            .field("account_name", &self.account_name)
            .finish()
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BASE_URL)
    }
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Mainstay API (e.g., `"https://api.admithub.com/"`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            auth_scheme: AuthScheme::default(),
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            user_agent_suffix: None,
            allow_insecure_http: false,
            service_name: crate::DEFAULT_SERVICE_NAME.to_string(),
            account_name: crate::DEFAULT_ACCOUNT_NAME.to_string(),
            store: None,
            prompter: None,
            telemetry_config: TelemetryConfig::default(),
        }
    }

    /// Create a builder from `MAINSTAY_*` environment variables
    ///
    /// `MAINSTAY_API_TOKEN` is treated as an explicit token, so the credential
    /// store and prompt are skipped when it is set.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new(
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| crate::DEFAULT_BASE_URL.to_string()),
        );

        if let Ok(token) = std::env::var(ENV_API_TOKEN) {
            builder = builder.token(token);
        }
        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_MS) {
            let timeout_ms = timeout.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be a number of milliseconds", ENV_TIMEOUT_MS))
            })?;
            builder = builder.timeout_ms(timeout_ms);
        }
        if let Ok(service) = std::env::var(ENV_SERVICE_NAME) {
            builder = builder.service_name(service);
        }

        Ok(builder)
    }

    /// Use this token instead of the credential store
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::new(token.into()));
        self
    }

    /// Set how the token is presented (default `Authorization: APIToken <token>`)
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Set the request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Add a custom user agent suffix
    pub fn user_agent_extra(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Allow a plain `http://` base URL, for local mock servers
    pub fn allow_insecure_http(mut self) -> Self {
        self.allow_insecure_http = true;
        self
    }

    /// Credential store service name (default `MainstayConnector`)
    pub fn service_name(mut self, service: impl Into<String>) -> Self {
        self.service_name = service.into();
        self
    }

    /// Credential store account name (default `api_token`)
    pub fn account_name(mut self, account: impl Into<String>) -> Self {
        self.account_name = account.into();
        self
    }

    /// Use a different credential store (default: the OS keyring)
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a different prompter (default: the terminal)
    pub fn prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Configure telemetry/metrics
    #[cfg(feature = "metrics")]
    pub fn with_telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry_config = config;
        self
    }

    /// Enable telemetry with default settings
    #[cfg(feature = "metrics")]
    pub fn enable_telemetry(mut self) -> Self {
        self.telemetry_config.enabled = true;
        self
    }

    /// Build the client, resolving the API token
    ///
    /// # Errors
    ///
    /// * `Error::Config` for an invalid base URL
    /// * `Error::Credential` if no token could be resolved; no client exists
    ///   without a token
    pub fn build(self) -> Result<crate::Client> {
        let url = self.base_url.trim_end_matches('/');

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }
        if url.starts_with("http://") && !self.allow_insecure_http {
            return Err(Error::Config(
                "HTTP URLs are not allowed. Use .allow_insecure_http() for local testing".to_string(),
            ));
        }
        if self.service_name.is_empty() || self.account_name.is_empty() {
            return Err(Error::Config(
                "Credential store service and account names must not be empty".to_string(),
            ));
        }

        let resolver = CredentialResolver::new(
            self.service_name.clone(),
            self.account_name.clone(),
            self.store
                .unwrap_or_else(|| Arc::new(KeyringStore::new()) as Arc<dyn CredentialStore>),
            self.prompter
                .unwrap_or_else(|| Arc::new(TerminalPrompter::new()) as Arc<dyn Prompter>),
        );
        let token = resolver.resolve(self.token)?;

        let config = ClientConfig {
            base_url: url.to_string(),
            auth_scheme: self.auth_scheme,
            timeout: Duration::from_millis(self.timeout_ms),
            user_agent_suffix: self.user_agent_suffix,
            allow_insecure_http: self.allow_insecure_http,
            service_name: self.service_name,
            account_name: self.account_name,
            telemetry_config: self.telemetry_config,
        };

        crate::client::Client::new(config, token, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{FixedPrompter, MemoryStore};
    use crate::errors::CredentialError;
    use serial_test::serial;

    fn offline_builder(url: &str) -> ClientBuilder {
        ClientBuilder::new(url)
            .credential_store(Arc::new(MemoryStore::new()))
            .prompter(Arc::new(FixedPrompter::unanswered()))
    }

    #[test]
    fn test_builder_validates_url() {
        let result = offline_builder("not-a-url").token("token").build();
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_builder_rejects_http() {
        let result = offline_builder("http://example.com").token("token").build();
        assert!(matches!(result.unwrap_err(), Error::Config(_)));

        let result = offline_builder("http://localhost:8080")
            .token("token")
            .allow_insecure_http()
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_without_token_source_fails() {
        let result = offline_builder("https://api.admithub.com/").build();
        assert!(matches!(
            result.unwrap_err(),
            Error::Credential(CredentialError::NonInteractive)
        ));
    }

    #[test]
    fn test_builder_debug_hides_token() {
        let builder = ClientBuilder::default().token("super-secret");
        let debug_str = format!("{:?}", builder);
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("****"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_BASE_URL, "https://mainstay.example.edu/");
        std::env::set_var(ENV_API_TOKEN, "env-token");
        std::env::set_var(ENV_TIMEOUT_MS, "1500");
        std::env::set_var(ENV_SERVICE_NAME, "GsuMainstay");

        let builder = ClientBuilder::from_env().unwrap();

        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_API_TOKEN);
        std::env::remove_var(ENV_TIMEOUT_MS);
        std::env::remove_var(ENV_SERVICE_NAME);

        assert_eq!(builder.base_url, "https://mainstay.example.edu/");
        assert!(builder.token.is_some());
        assert_eq!(builder.timeout_ms, 1500);
        assert_eq!(builder.service_name, "GsuMainstay");

        let client = builder
            .credential_store(Arc::new(MemoryStore::new()))
            .build()
            .unwrap();
        assert_eq!(client.config().base_url, "https://mainstay.example.edu");
    }

    #[test]
    #[serial]
    fn test_from_env_bad_timeout() {
        std::env::set_var(ENV_TIMEOUT_MS, "soon");
        let result = ClientBuilder::from_env();
        std::env::remove_var(ENV_TIMEOUT_MS);

        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }
}
