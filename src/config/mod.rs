//! Client configuration
//!
//! Base URL, API version segment and transport timeouts. The base URL is
//! resolved once when the client is built (explicit value, then
//! `BRIQ_BASE_URL`, then the default host) and only changes through the
//! explicit setters below.

pub mod env;

use std::time::Duration;

pub use env::{EnvManager, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};

/// Version segment placed between the base URL and every resource path
pub const DEFAULT_API_VERSION: &str = "v1";

/// Login endpoint, relative to the base URL (not versioned)
pub const LOGIN_PATH: &str = "auth/login";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    api_version: String,
    timeout: Duration,
    connect_timeout: Duration,
    detect_invalid_token_in_body: bool,
}

impl ClientConfig {
    /// Resolves the base URL from `base_url`, the environment, or the default.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: normalize_base_url(&EnvManager::resolve_base_url(base_url)),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            detect_invalid_token_in_body: true,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = normalize_base_url(&base_url.into());
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.api_version = version.into().trim_matches('/').to_string();
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    /// Whether a 2xx body mentioning "invalid token" counts as unauthorized.
    ///
    /// HTTP 401 is always authoritative; this is a fallback for servers that
    /// report expired tokens in the body.
    pub fn detect_invalid_token_in_body(&self) -> bool {
        self.detect_invalid_token_in_body
    }

    pub fn set_detect_invalid_token_in_body(&mut self, enabled: bool) {
        self.detect_invalid_token_in_body = enabled;
    }

    /// `{base}/{version}/{endpoint}`
    pub fn api_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        if self.api_version.is_empty() {
            format!("{}/{}", self.base_url, endpoint)
        } else {
            format!("{}/{}/{}", self.base_url, self.api_version, endpoint)
        }
    }

    /// `{base}/auth/login`
    pub fn login_url(&self) -> String {
        format!("{}/{}", self.base_url, LOGIN_PATH)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
