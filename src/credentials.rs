//! API token resolution
//!
//! A [`Client`](crate::Client) obtains its token exactly once, when it is
//! built, by walking an ordered fallback:
//!
//! 1. **Explicit token** passed to the builder, used as-is
//! 2. **Credential store** entry under `(service, account)`
//! 3. **Interactive prompt**, with an offer to save the answer to the store
//!
//! The first source that yields a non-empty token wins. Both the store and the
//! prompt are traits so tests can swap in [`MemoryStore`] and
//! [`FixedPrompter`] instead of touching the OS keyring or reading stdin.
//!
//! # Example
//!
//! ```
//! use mainstay_sdk::{CredentialResolver, FixedPrompter, MemoryStore};
//! use secrecy::ExposeSecret;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert("MainstayConnector", "api_token", "abc123");
//!
//! let resolver = CredentialResolver::new(
//!     "MainstayConnector",
//!     "api_token",
//!     store.clone(),
//!     Arc::new(FixedPrompter::unanswered()),
//! );
//! let token = resolver.resolve(None).unwrap();
//! assert_eq!(token.expose_secret(), "abc123");
//! ```

use crate::errors::CredentialError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Secret storage addressed by a `(service, account)` pair
pub trait CredentialStore: Send + Sync {
    /// Look up a secret; `Ok(None)` when no entry exists
    fn get(&self, service: &str, account: &str) -> CredentialResult<Option<SecretString>>;

    /// Create or overwrite a secret
    fn set(&self, service: &str, account: &str, secret: &SecretString) -> CredentialResult<()>;
}

/// Source of interactively entered values
pub trait Prompter: Send + Sync {
    /// Ask for a secret without echoing it
    ///
    /// Returns `Ok(None)` when no input could be obtained.
    fn read_secret(&self, prompt: &str) -> CredentialResult<Option<String>>;

    /// Ask a yes/no question
    fn confirm(&self, prompt: &str) -> CredentialResult<bool>;
}

/// The platform credential store (macOS Keychain, Windows Credential
/// Manager, Secret Service on Linux) via the `keyring` crate
///
/// Entries persist across logins and reboots.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl KeyringStore {
    /// Create a handle to the platform store
    pub fn new() -> Self {
        Self
    }

    fn entry(service: &str, account: &str) -> CredentialResult<keyring::Entry> {
        keyring::Entry::new(service, account).map_err(|e| CredentialError::Store(e.to_string()))
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, service: &str, account: &str) -> CredentialResult<Option<SecretString>> {
        match Self::entry(service, account)?.get_password() {
            Ok(secret) => Ok(Some(SecretString::new(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Store(e.to_string())),
        }
    }

    fn set(&self, service: &str, account: &str, secret: &SecretString) -> CredentialResult<()> {
        Self::entry(service, account)?
            .set_password(secret.expose_secret())
            .map_err(|e| CredentialError::Store(e.to_string()))
    }
}

/// In-process credential store
///
/// Counts reads and writes so tests can assert which resolution steps ran.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without counting it as a write
    pub fn insert(&self, service: &str, account: &str, secret: &str) {
        let _ = self
            .lock()
            .insert((service.to_string(), account.to_string()), secret.to_string());
    }

    /// Current value of an entry, exposed for assertions
    pub fn peek(&self, service: &str, account: &str) -> Option<String> {
        self.lock()
            .get(&(service.to_string(), account.to_string()))
            .cloned()
    }

    /// Number of `get` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, service: &str, account: &str) -> CredentialResult<Option<SecretString>> {
        let _ = self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.peek(service, account).map(SecretString::new))
    }

    fn set(&self, service: &str, account: &str, secret: &SecretString) -> CredentialResult<()> {
        let _ = self.writes.fetch_add(1, Ordering::Relaxed);
        self.insert(service, account, secret.expose_secret());
        Ok(())
    }
}

/// Prompts on the controlling terminal using `dialoguer`
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a terminal prompter
    pub fn new() -> Self {
        Self
    }

    fn ensure_terminal() -> CredentialResult<()> {
        if std::io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(CredentialError::NonInteractive)
        }
    }
}

impl Prompter for TerminalPrompter {
    fn read_secret(&self, prompt: &str) -> CredentialResult<Option<String>> {
        Self::ensure_terminal()?;
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Some)
            .map_err(|e| CredentialError::Prompt(e.to_string()))
    }

    fn confirm(&self, prompt: &str) -> CredentialResult<bool> {
        Self::ensure_terminal()?;
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(|e| CredentialError::Prompt(e.to_string()))
    }
}

/// Prompter with canned answers, for tests and unattended jobs
#[derive(Debug)]
pub struct FixedPrompter {
    answer: Option<String>,
    save: bool,
    prompts: AtomicUsize,
}

impl FixedPrompter {
    /// Answer every secret prompt with `answer` and every confirmation with `save`
    pub fn new(answer: impl Into<String>, save: bool) -> Self {
        Self {
            answer: Some(answer.into()),
            save,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Behave like a session with no terminal attached
    pub fn unanswered() -> Self {
        Self {
            answer: None,
            save: false,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Number of secret prompts issued so far
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::Relaxed)
    }
}

impl Prompter for FixedPrompter {
    fn read_secret(&self, _prompt: &str) -> CredentialResult<Option<String>> {
        let _ = self.prompts.fetch_add(1, Ordering::Relaxed);
        match &self.answer {
            Some(answer) => Ok(Some(answer.clone())),
            None => Err(CredentialError::NonInteractive),
        }
    }

    fn confirm(&self, _prompt: &str) -> CredentialResult<bool> {
        Ok(self.save)
    }
}

/// Resolves the API token for a new client
#[derive(Clone)]
pub struct CredentialResolver {
    service: String,
    account: String,
    store: Arc<dyn CredentialStore>,
    prompter: Arc<dyn Prompter>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("service", &self.service)
            .field("account", &self.account)
            .finish()
    }
}

impl CredentialResolver {
    /// Create a resolver reading and writing `(service, account)` in `store`
    pub fn new(
        service: impl Into<String>,
        account: impl Into<String>,
        store: Arc<dyn CredentialStore>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
            store,
            prompter,
        }
    }

    /// Produce a non-empty token, trying `explicit`, then the store, then the prompt
    ///
    /// # Errors
    ///
    /// * `CredentialError::Empty` if the explicit or entered token is empty
    /// * `CredentialError::NonInteractive` if a prompt was needed but no input
    ///   could be obtained
    pub fn resolve(&self, explicit: Option<SecretString>) -> CredentialResult<SecretString> {
        if let Some(token) = explicit {
            if token.expose_secret().is_empty() {
                return Err(CredentialError::Empty);
            }
            debug!("Using explicitly supplied API token");
            return Ok(token);
        }

        match self.store.get(&self.service, &self.account) {
            Ok(Some(token)) if !token.expose_secret().is_empty() => {
                debug!(service = %self.service, "Using API token from credential store");
                return Ok(token);
            }
            Ok(_) => {
                debug!(service = %self.service, "No API token in credential store");
            }
            Err(e) => {
                warn!(service = %self.service, error = %e, "Credential store lookup failed");
            }
        }

        let token = self.prompt_token("Enter the API token")?;

        match self
            .prompter
            .confirm("Save this token to the system credential store?")
        {
            Ok(true) => self.save(&token),
            Ok(false) => debug!("Not saving API token"),
            Err(e) => warn!(error = %e, "Save prompt failed, not saving API token"),
        }

        Ok(token)
    }

    /// Prompt for a replacement token and overwrite the stored entry
    ///
    /// Clients that already exist keep the token they were built with.
    pub fn reset(&self) -> CredentialResult<()> {
        let token = self.prompt_token("Enter the new API token")?;
        self.store.set(&self.service, &self.account, &token)?;
        info!(service = %self.service, "API token has been reset");
        Ok(())
    }

    fn prompt_token(&self, prompt: &str) -> CredentialResult<SecretString> {
        let entered = self
            .prompter
            .read_secret(prompt)?
            .ok_or(CredentialError::NonInteractive)?;
        let entered = entered.trim();
        if entered.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(SecretString::new(entered.to_string()))
    }

    fn save(&self, token: &SecretString) {
        match self.store.set(&self.service, &self.account, token) {
            Ok(()) => info!(service = %self.service, "Saved API token to credential store"),
            Err(e) => warn!(service = %self.service, error = %e, "Could not save API token"),
        }
    }
}
