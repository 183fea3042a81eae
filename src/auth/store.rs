//! Credential store
//!
//! Produces the auth headers for the next outgoing request. In bearer mode the
//! login exchange happens lazily on the first request and the resulting token
//! is cached until a request using it is rejected.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::credentials::Credentials;
use super::token::{AccessToken, TokenResponse};
use crate::error::{BriqError, BriqResult};
use crate::utils::logging::*;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Headers for one request, plus the bearer token they were built from
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub headers: HeaderMap,
    pub token: Option<AccessToken>,
}

#[derive(Debug)]
struct StoreState {
    credentials: Credentials,
    token: Option<AccessToken>,
    // Bumped on every credential change so an in-flight login for old
    // credentials cannot repopulate the cache.
    generation: u64,
}

/// Holds credentials and the cached bearer token.
///
/// The token cache is behind a lock that is never held across an `.await`,
/// so `(access_token, token_type)` is always read and replaced as one unit.
#[derive(Debug)]
pub struct CredentialStore {
    state: RwLock<StoreState>,
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            state: RwLock::new(StoreState {
                credentials,
                token: None,
                generation: 0,
            }),
        }
    }

    pub fn is_bearer(&self) -> bool {
        self.read().credentials.is_bearer()
    }

    /// Only bearer credentials can obtain a different token on retry.
    pub fn can_reauthenticate(&self) -> bool {
        self.is_bearer()
    }

    pub fn credentials(&self) -> Credentials {
        self.read().credentials.clone()
    }

    pub fn cached_token(&self) -> Option<AccessToken> {
        self.read().token.clone()
    }

    pub fn has_token(&self) -> bool {
        self.read().token.is_some()
    }

    /// Replaces the API key. Switches a bearer store to API-key mode.
    pub fn set_api_key(&self, key: impl Into<String>) {
        self.replace_credentials(Credentials::api_key(Some(key.into())));
    }

    /// Replaces the login credentials. The next request logs in again.
    pub fn set_credentials(&self, username: impl Into<String>, password: impl Into<String>) {
        self.replace_credentials(Credentials::username_password(username, password));
    }

    fn replace_credentials(&self, credentials: Credentials) {
        let mut state = self.write();
        state.credentials = credentials;
        state.token = None;
        state.generation += 1;
    }

    /// Drops the cached token. No-op in API-key mode.
    pub fn invalidate(&self) {
        let mut state = self.write();
        if state.token.take().is_some() {
            log_token_invalidated();
        }
    }

    /// Drops the cached token only if it is still `rejected`.
    ///
    /// Returns false when another caller already replaced it.
    pub fn invalidate_if(&self, rejected: &AccessToken) -> bool {
        let mut state = self.write();
        match &state.token {
            Some(current) if current.same_token(rejected) => {
                state.token = None;
                log_token_invalidated();
                true
            }
            _ => false,
        }
    }

    /// Auth headers for the next request, logging in first if needed.
    pub async fn headers(
        &self,
        http: &reqwest::Client,
        login_url: &str,
    ) -> BriqResult<HeaderMap> {
        Ok(self.authorize(http, login_url).await?.headers)
    }

    /// Forces a login exchange now and caches the token.
    ///
    /// Fails with [`BriqError::Authentication`] when the credentials are
    /// replaced while the exchange is in flight; the token it produced
    /// belongs to the old credentials and is discarded.
    pub async fn authenticate(
        &self,
        http: &reqwest::Client,
        login_url: &str,
    ) -> BriqResult<AccessToken> {
        self.login_current(http, login_url).await?.ok_or_else(|| {
            BriqError::authentication("credentials changed during login. Retry the request.")
        })
    }

    /// Logs in with the current credentials.
    ///
    /// `Ok(None)` when the credentials changed before the exchange finished.
    async fn login_current(
        &self,
        http: &reqwest::Client,
        login_url: &str,
    ) -> BriqResult<Option<AccessToken>> {
        let (username, password, generation) = {
            let state = self.read();
            match &state.credentials {
                Credentials::UsernamePassword { username, password } => {
                    (username.clone(), password.clone(), state.generation)
                }
                Credentials::ApiKey(_) => {
                    return Err(BriqError::config(
                        "Login is only available for username/password credentials",
                    ))
                }
            }
        };

        let token = login(http, login_url, &username, &password).await?;

        let mut state = self.write();
        if state.generation != generation {
            log_login_discarded();
            return Ok(None);
        }
        state.token = Some(token.clone());
        Ok(Some(token))
    }

    pub(crate) async fn authorize(
        &self,
        http: &reqwest::Client,
        login_url: &str,
    ) -> BriqResult<AuthContext> {
        // One extra pass picks up credentials swapped during a login.
        for _ in 0..2 {
            let (credentials, cached) = {
                let state = self.read();
                (state.credentials.clone(), state.token.clone())
            };

            let token = match credentials {
                Credentials::ApiKey(key) => return api_key_context(key),
                Credentials::UsernamePassword { .. } => match cached {
                    Some(token) => token,
                    None => match self.login_current(http, login_url).await? {
                        Some(token) => token,
                        None => continue,
                    },
                },
            };

            let mut headers = json_headers();
            headers.insert(
                AUTHORIZATION,
                header_value(&token.authorization_header(), "access token")?,
            );
            return Ok(AuthContext {
                headers,
                token: Some(token),
            });
        }

        Err(BriqError::authentication(
            "credentials changed during login. Retry the request.",
        ))
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn api_key_context(key: Option<String>) -> BriqResult<AuthContext> {
    let key = key.ok_or_else(|| {
        BriqError::config(
            "API key not set. Call set_api_key() or set the BRIQ_API_KEY environment variable.",
        )
    })?;

    let mut headers = json_headers();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value(&key, "API key")?,
    );
    Ok(AuthContext {
        headers,
        token: None,
    })
}

/// `POST {login_url}` with form-encoded credentials
async fn login(
    http: &reqwest::Client,
    login_url: &str,
    username: &str,
    password: &str,
) -> BriqResult<AccessToken> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(BriqError::config("Username and password must not be empty"));
    }

    log_login_attempt(login_url, username);

    let params = [("username", username), ("password", password)];
    let response = http
        .post(login_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| BriqError::authentication(format!("login request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| BriqError::authentication(format!("failed to read login response: {}", e)))?;

    if !status.is_success() {
        log_login_failed(status.as_u16());
        return Err(BriqError::authentication(format!(
            "login rejected (status {}): {}",
            status.as_u16(),
            body.trim()
        )));
    }

    let token_response: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| BriqError::authentication(format!("malformed login response: {}", e)))?;

    log_login_succeeded(username);
    Ok(token_response.into())
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn header_value(value: &str, what: &str) -> BriqResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| BriqError::config(format!("{} contains characters not allowed in HTTP headers", what)))
}
