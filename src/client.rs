//! Mainstay API Client Implementation
//!
//! This module contains the main `Client` struct that issues authenticated
//! requests to the Mainstay API.
//!
//! # Architecture
//!
//! - **Credentials**: the API token is resolved once by
//!   [`ClientBuilder::build`](crate::ClientBuilder::build) and cached on the
//!   client for its whole lifetime; it is never refreshed or swapped
//! - **HTTP Layer**: a blocking `reqwest` client with a fixed timeout; every
//!   method is exactly one round-trip
//! - **Responses**: JSON bodies are returned as [`serde_json::Value`] or
//!   narrowed to [`Record`] / [`Page`]; failures come back as [`Error`] values
//!   and leave the client usable for the next call
//! - **Telemetry**: optional OpenTelemetry counters behind the `metrics` feature
//!
//! # Examples
//!
//! ```no_run
//! use mainstay_sdk::{ClientBuilder, ContactFilters};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Token comes from the OS keyring, or a prompt on first use
//! let client = ClientBuilder::default().build()?;
//!
//! let check = client.test_connection();
//! println!("Connected: {} (org {:?})", check.ok, check.org_id);
//!
//! let contact = client.get_contact("4045551234", &ContactFilters::default())?;
//! println!("First name: {:?}", contact.get("first_name"));
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::Auth,
    config::ClientConfig,
    credentials::CredentialResolver,
    endpoints::Endpoints,
    errors::{Error, ErrorResponse, Result},
    models::*,
    telemetry::Metrics,
    util::{generate_request_id, header_str},
};

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::{Method, Url};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT_PREFIX: &str = "mainstay-sdk-rust";

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Mainstay API client
///
/// Holds one resolved API token for its lifetime. Cloning is cheap and the
/// clone shares the token and connection pool.
#[derive(Clone)]
pub struct Client {
    pub(crate) config: ClientConfig,
    http: HttpClient,
    endpoints: Endpoints,
    auth: Auth,
    resolver: CredentialResolver,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("auth", &self.auth)
            .finish()
    }
}

impl Client {
    /// Create a new client with the given configuration and resolved token
    pub(crate) fn new(
        config: ClientConfig,
        token: SecretString,
        resolver: CredentialResolver,
    ) -> Result<Self> {
        // Build user agent
        let user_agent = if let Some(suffix) = &config.user_agent_suffix {
            format!("{}/{} {}", USER_AGENT_PREFIX, crate::VERSION, suffix)
        } else {
            format!("{}/{}", USER_AGENT_PREFIX, crate::VERSION)
        };

        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .pool_idle_timeout(Duration::from_secs(90))
            .https_only(!config.allow_insecure_http)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let metrics = Arc::new(Metrics::new(&config.telemetry_config));

        Ok(Self {
            endpoints: Endpoints::new(&config.base_url),
            auth: Auth::new(config.auth_scheme.clone(), token),
            http,
            resolver,
            metrics,
            config,
        })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check that the API is reachable and accepts the token
    ///
    /// Calls the lightweight `auth_valid` endpoint. This never returns an
    /// error: HTTP and transport failures are reported as `ok == false`, with
    /// the cause in [`ConnectionTest::error`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mainstay_sdk::Client;
    /// # fn example(client: &Client) {
    /// let check = client.test_connection();
    /// if !check.ok {
    ///     eprintln!("Connection failed: {:?}", check.error);
    /// }
    /// # }
    /// ```
    pub fn test_connection(&self) -> ConnectionTest {
        let url = self.endpoints.auth_valid();
        let outcome = self
            .build_request(Method::GET, &url)
            .and_then(|request| self.execute(request))
            .and_then(|response| {
                let status = response.status().as_u16();
                let body: Value = Self::parse_json_response(response)?;
                Ok((status, body))
            });

        match outcome {
            Ok((status, body)) => ConnectionTest::from_response(status, &body),
            Err(e) => {
                warn!(error = %e, "Connection test failed");
                ConnectionTest::failed(e)
            }
        }
    }

    /// Get a single contact
    ///
    /// # Arguments
    ///
    /// * `id` - CRM ID, phone number, or AdmitHub ID of the contact
    /// * `filters` - Optional filters applied to the lookup
    ///
    /// # Errors
    ///
    /// * `Error::Http` with status 404 if no contact matches
    /// * `Error::Deserialize` if the response is not a JSON object
    pub fn get_contact(&self, id: &str, filters: &ContactFilters) -> Result<Record> {
        let url = self.endpoints.contact(id);
        self.get_json(&url, filters)
    }

    /// List contacts
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mainstay_sdk::{Client, ContactFilters};
    /// # fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let filters = ContactFilters {
    ///     custom: Some("Campus ID|campusid1".to_string()),
    ///     page: Some(1),
    ///     ..Default::default()
    /// };
    /// let page = client.get_contacts(&filters)?;
    /// for contact in &page.results {
    ///     println!("{:?}", contact.get("admithub_id"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_contacts(&self, filters: &ContactFilters) -> Result<Page> {
        let url = self.endpoints.contacts();
        self.get_json(&url, filters)
    }

    /// List the names of all custom contact fields
    pub fn get_custom_fields(&self) -> Result<Vec<String>> {
        let url = self.endpoints.custom_fields();
        let body: CustomFieldsResponse = self.get_json(&url, &Query::new())?;
        Ok(body.custom_fields)
    }

    /// List the distinct values stored in a custom field
    ///
    /// # Errors
    ///
    /// * `Error::Http` with status 400 if the field does not exist
    pub fn get_custom_values(&self, field: &str) -> Result<Vec<Value>> {
        let url = self.endpoints.custom_values();
        let body: CustomValuesResponse = self.get_json(&url, &Query::new().param("field", field))?;
        Ok(body.values)
    }

    /// Describe the built-in (non-custom) contact fields
    pub fn get_default_fields(&self) -> Result<Value> {
        let url = self.endpoints.default_fields();
        self.get_json(&url, &Query::new())
    }

    /// List campaigns
    pub fn get_campaign_list(&self, filters: &CampaignFilters) -> Result<Page> {
        let url = self.endpoints.campaigns();
        self.get_json(&url, filters)
    }

    /// Get a single campaign
    pub fn get_campaign(&self, id: &str) -> Result<Record> {
        let url = self.endpoints.campaign(id);
        self.get_json(&url, &Query::new())
    }

    /// List messages
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mainstay_sdk::{Client, MessageFilters};
    /// # fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let filters = MessageFilters {
    ///     admithub_contact_id: Some("ahd2b33d72814c61b".to_string()),
    ///     ..Default::default()
    /// };
    /// let messages = client.get_messages(&filters)?;
    /// println!("{} messages", messages.results.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_messages(&self, filters: &MessageFilters) -> Result<Page> {
        let url = self.endpoints.messages();
        self.get_json(&url, filters)
    }

    /// Call any endpoint relative to the base URL and return the raw JSON
    ///
    /// ```no_run
    /// # use mainstay_sdk::{Client, Query};
    /// # fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let body = client.get_raw("messages/", &Query::new().param("page", 3))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_raw(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.endpoints.url(path);
        self.get_json(&url, query)
    }

    /// Fetch the page after `page`, or `None` on the last page
    ///
    /// # Errors
    ///
    /// * `Error::Config` if the `next` link points at a different host than
    ///   the base URL; the token is never sent there
    pub fn next_page(&self, page: &Page) -> Result<Option<Page>> {
        let Some(next) = page.next.as_deref().filter(|next| !next.is_empty()) else {
            return Ok(None);
        };
        self.ensure_same_origin(next)?;
        self.get_json(next, &Query::new()).map(Some)
    }

    /// Prompt for a new API token and store it in the credential store
    ///
    /// This client keeps using the token it was built with; build a new
    /// client to pick up the replacement.
    pub fn reset_token(&self) -> Result<()> {
        self.resolver.reset().map_err(Error::from)
    }

    // Helper methods

    /// Build a request with common headers
    fn build_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let (name, value) = self.auth.header()?;
        let request_id = generate_request_id();

        Ok(self
            .http
            .request(method, url)
            .header(name, value)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-Request-ID", request_id))
    }

    /// GET `url` with `query` and parse the JSON body
    fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.build_request(Method::GET, url)?.query(query);
        let response = self.execute(request)?;
        Self::parse_json_response(response)
    }

    /// Send a request once; non-2xx statuses become `Error::Http`
    fn execute(&self, request_builder: RequestBuilder) -> Result<Response> {
        let request = request_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build request: {}", e)))?;

        let method = request.method().to_string();
        let path = request.url().path().to_string();
        let request_id = header_str(request.headers(), "x-request-id");
        let start_time = Instant::now();

        match self.http.execute(request) {
            Ok(response) => {
                let status = response.status();
                let elapsed = start_time.elapsed();
                debug!(%method, %path, status = status.as_u16(), ?elapsed, "Request completed");
                self.metrics
                    .record_request(&method, &path, status.as_u16(), elapsed.as_secs_f64());

                if status.is_success() {
                    Ok(response)
                } else {
                    let error = Self::parse_error_response(response, request_id);
                    warn!(%method, %path, error = %error, "Request failed");
                    Err(error)
                }
            }
            Err(e) => {
                let error = Error::from(e);
                warn!(%method, %path, error = %error, "Request failed before a response");
                self.metrics.record_transport_error(&method, &path);
                Err(error)
            }
        }
    }

    /// Parse error response from server
    fn parse_error_response(response: Response, request_id: Option<String>) -> Error {
        let status = response.status().as_u16();
        let request_id = header_str(response.headers(), "x-request-id").or(request_id);
        let body = response.text().unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error_resp) => error_resp.detail,
            Err(_) if !body.trim().is_empty() => truncate(body.trim(), MAX_ERROR_BODY),
            Err(_) => format!("HTTP error {}", status),
        };

        Error::Http {
            status,
            message,
            request_id,
        }
    }

    /// Parse JSON response
    fn parse_json_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().map_err(Error::from)?;
        serde_json::from_str(&body).map_err(Error::from)
    }

    fn ensure_same_origin(&self, url: &str) -> Result<()> {
        let parse = |u: &str| {
            Url::parse(u).map_err(|e| Error::Config(format!("Invalid URL '{}': {}", u, e)))
        };
        let base = parse(self.endpoints.base_url())?;
        let next = parse(url)?;

        if base.origin() == next.origin() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "Refusing to follow pagination link to another host: {}",
                next.origin().ascii_serialization()
            )))
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
