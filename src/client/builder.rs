use std::sync::Arc;
use std::time::Duration;

use super::api::BriqClient;
use crate::auth::{CredentialStore, Credentials};
use crate::config::{ClientConfig, EnvManager};
use crate::error::{BriqError, BriqResult};

/// Builder for [`BriqClient`]
///
/// Without explicit credentials the client runs in API-key mode and reads the
/// key from `BRIQ_API_KEY` (a local `.env` file is loaded first).
#[derive(Debug, Default)]
pub struct BriqClientBuilder {
    base_url: Option<String>,
    api_version: Option<String>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    detect_invalid_token_in_body: Option<bool>,
}

impl BriqClientBuilder {
    /// Empty builder: API-key mode, environment fallbacks, default timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// API host, e.g. `https://karibu.briq.tz`.
    ///
    /// Falls back to `BRIQ_BASE_URL`, then the built-in default host. A
    /// trailing `/` is stripped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Version segment for resource paths (`v1` by default, empty for none)
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Static key sent as `X-API-Key` on every request.
    ///
    /// Falls back to `BRIQ_API_KEY` when blank. Replaces any username/password
    /// set earlier.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::api_key(Some(key.into())));
        self
    }

    /// Username/password login with a cached bearer token.
    ///
    /// The login runs on the first request, not here. Replaces any API key
    /// set earlier.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::username_password(username, password));
        self
    }

    /// Total time allowed per HTTP request (30 s by default)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Time allowed to open the TCP connection (5 s by default)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Treat a 2xx response whose error field reads `Invalid token` as a
    /// rejected credential (on by default).
    ///
    /// HTTP 401 is always treated as rejected regardless of this switch.
    pub fn detect_invalid_token_in_body(mut self, enabled: bool) -> Self {
        self.detect_invalid_token_in_body = Some(enabled);
        self
    }

    /// Resolves credentials and base URL, then builds the HTTP client.
    ///
    /// A missing API key is not an error here; it surfaces as
    /// [`BriqError::Config`] on the first request.
    ///
    /// # Errors
    ///
    /// [`BriqError::Config`] if the underlying HTTP client cannot be created.
    pub fn build(self) -> BriqResult<BriqClient> {
        let credentials = match self.credentials {
            Some(creds @ Credentials::UsernamePassword { .. }) => creds,
            Some(Credentials::ApiKey(key)) => {
                EnvManager::load_dotenv();
                Credentials::api_key(EnvManager::resolve_api_key(key))
            }
            None => {
                EnvManager::load_dotenv();
                Credentials::api_key(EnvManager::resolve_api_key(None))
            }
        };

        let mut config = ClientConfig::new(self.base_url);
        if let Some(version) = self.api_version {
            config.set_api_version(version);
        }
        if let Some(timeout) = self.timeout {
            config.set_timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config.set_connect_timeout(timeout);
        }
        if let Some(enabled) = self.detect_invalid_token_in_body {
            config.set_detect_invalid_token_in_body(enabled);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| BriqError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(BriqClient::from_parts(
            http,
            config,
            Arc::new(CredentialStore::new(credentials)),
        ))
    }
}
