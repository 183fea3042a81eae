use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::builder::BriqClientBuilder;
use crate::auth::{AccessToken, CredentialStore};
use crate::config::ClientConfig;
use crate::error::{BriqError, BriqResult};
use crate::resources::{CampaignApi, InstantMessage, MessageApi, WorkspaceApi};
use crate::utils::logging::*;

/// Error text some deployments return with a 2xx status instead of a 401
const INVALID_TOKEN_MARKER: &str = "invalid token";

/// Top-level fields of a JSON error body that may carry the marker
const INVALID_TOKEN_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// Query parameters for [`BriqClient::execute`]
pub type QueryParams<'a> = &'a [(&'a str, &'a str)];

/// Client for the Briq API
///
/// Cheap to clone: clones share the HTTP connection pool and the credential
/// store (and therefore the cached token).
#[derive(Debug, Clone)]
pub struct BriqClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Arc<CredentialStore>,
}

impl BriqClient {
    /// API-key client.
    ///
    /// `api_key` falls back to `BRIQ_API_KEY` and `base_url` to `BRIQ_BASE_URL`
    /// (after loading `./.env`). A missing key is reported on the first request.
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> BriqResult<Self> {
        let mut builder = BriqClientBuilder::new();
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        if let Some(url) = base_url {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// API-key client with an explicit key and the environment's base URL.
    pub fn with_api_key(api_key: impl Into<String>) -> BriqResult<Self> {
        BriqClientBuilder::new().api_key(api_key).build()
    }

    /// Username/password client. Logs in lazily on the first request.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> BriqResult<Self> {
        BriqClientBuilder::new().credentials(username, password).build()
    }

    /// Builder for full control over credentials, URL and timeouts.
    pub fn builder() -> BriqClientBuilder {
        BriqClientBuilder::new()
    }

    pub(crate) fn from_parts(
        http: reqwest::Client,
        config: ClientConfig,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    /// Resolved base URL, version prefix and timeouts.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Points this client at another host. Clones keep the old URL.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.config.set_base_url(base_url);
    }

    /// Credential store shared by this client and its clones.
    pub fn credential_store(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Replaces the API key. Takes effect on the next request.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.credentials.set_api_key(api_key);
    }

    /// Replaces the login credentials. The next request logs in again.
    pub fn set_credentials(&self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials.set_credentials(username, password);
    }

    /// Logs in now instead of on the first request (bearer mode only).
    pub async fn authenticate(&self) -> BriqResult<AccessToken> {
        self.credentials
            .authenticate(&self.http, &self.config.login_url())
            .await
    }

    /// Auth headers the next request would carry.
    pub async fn auth_headers(&self) -> BriqResult<HeaderMap> {
        self.credentials
            .headers(&self.http, &self.config.login_url())
            .await
    }

    /// Workspace endpoints.
    pub fn workspace(&self) -> WorkspaceApi<'_> {
        WorkspaceApi::new(self)
    }

    /// Campaign endpoints.
    pub fn campaign(&self) -> CampaignApi<'_> {
        CampaignApi::new(self)
    }

    /// Message endpoints.
    pub fn message(&self) -> MessageApi<'_> {
        MessageApi::new(self)
    }

    /// All workspaces visible to the authenticated user
    pub async fn get_workspaces(&self) -> BriqResult<Value> {
        self.workspace().list().await
    }

    /// Sends an instant message on behalf of a workspace.
    pub async fn send_message(
        &self,
        workspace_id: &str,
        recipients: Vec<String>,
        content: &str,
        sender_id: &str,
    ) -> BriqResult<Value> {
        let message = InstantMessage::new(content, recipients, sender_id).workspace_id(workspace_id);
        self.message().send_instant(message).await
    }

    /// `GET {base}/{version}/{endpoint}` with optional query parameters.
    pub async fn get(&self, endpoint: &str, params: Option<QueryParams<'_>>) -> BriqResult<Value> {
        self.execute(Method::GET, endpoint, None, params).await
    }

    /// `POST` with an optional JSON body.
    pub async fn post(&self, endpoint: &str, body: Option<Value>) -> BriqResult<Value> {
        self.execute(Method::POST, endpoint, body, None).await
    }

    /// `PATCH` with an optional JSON body.
    pub async fn patch(&self, endpoint: &str, body: Option<Value>) -> BriqResult<Value> {
        self.execute(Method::PATCH, endpoint, body, None).await
    }

    /// [`execute`](Self::execute) and deserialize the result into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        params: Option<QueryParams<'_>>,
    ) -> BriqResult<T> {
        let value = self.execute(method, endpoint, body, params).await?;
        serde_json::from_value(value)
            .map_err(|e| BriqError::request(format!("unexpected response shape: {}", e)))
    }

    /// Runs one API call: attach auth headers, send, classify.
    ///
    /// An unauthorized answer on the first attempt drops the token that was
    /// used, logs in again and resends once. A second unauthorized answer is
    /// returned as [`BriqError::Authentication`]. API-key clients are never
    /// retried since the same key would be sent again.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        params: Option<QueryParams<'_>>,
    ) -> BriqResult<Value> {
        let url = self.config.api_url(endpoint);
        let login_url = self.config.login_url();
        let mut attempt: u8 = 1;

        loop {
            let auth = self.credentials.authorize(&self.http, &login_url).await?;

            log_request_sent(method.as_str(), &url, attempt);

            let mut request = self.http.request(method.clone(), &url).headers(auth.headers);
            if let Some(body) = &body {
                request = request.json(body);
            }
            if let Some(params) = params {
                request = request.query(params);
            }

            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;

            log_response_received(method.as_str(), &url, status.as_u16(), text.len());

            if self.is_unauthorized(status, &text) {
                if attempt == 1 && self.credentials.can_reauthenticate() {
                    log_reauthenticating(endpoint);
                    match &auth.token {
                        Some(token) => {
                            self.credentials.invalidate_if(token);
                        }
                        None => self.credentials.invalidate(),
                    }
                    attempt += 1;
                    continue;
                }

                return Err(self.unauthorized_error(&text));
            }

            return parse_response(endpoint, status, &text);
        }
    }

    fn is_unauthorized(&self, status: StatusCode, body: &str) -> bool {
        if status == StatusCode::UNAUTHORIZED {
            return true;
        }

        status.is_success()
            && self.config.detect_invalid_token_in_body()
            && reports_invalid_token(body)
    }

    fn unauthorized_error(&self, body: &str) -> BriqError {
        let hint = if self.credentials.is_bearer() {
            "request rejected after re-authentication. Check your username and password."
        } else {
            "request rejected. Check your API key."
        };

        let body = body.trim();
        if body.is_empty() {
            BriqError::authentication(hint)
        } else {
            BriqError::authentication(format!("{} ({})", hint, body))
        }
    }
}

/// True when the whole body is the invalid-token error and nothing else.
///
/// Matches a bare `Invalid token` text body, a JSON string with that text, or
/// a JSON object whose top-level `detail`, `message` or `error` equals it.
/// Payload data that merely mentions the phrase is left alone.
fn reports_invalid_token(body: &str) -> bool {
    let is_marker = |text: &str| text.trim().eq_ignore_ascii_case(INVALID_TOKEN_MARKER);

    let body = body.trim();
    if is_marker(body) {
        return true;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => is_marker(&text),
        Ok(Value::Object(fields)) => INVALID_TOKEN_FIELDS
            .iter()
            .filter_map(|field| fields.get(*field).and_then(Value::as_str))
            .any(is_marker),
        _ => false,
    }
}

fn parse_response(endpoint: &str, status: StatusCode, text: &str) -> BriqResult<Value> {
    if !status.is_success() {
        let error = BriqError::api(status.as_u16(), text);
        if let BriqError::Api { message, .. } = &error {
            log_api_error(endpoint, status.as_u16(), message);
        }
        return Err(error);
    }

    if text.trim().is_empty() {
        return Ok(json!({}));
    }

    serde_json::from_str(text)
        .map_err(|e| BriqError::request(format!("malformed response from {}: {}", endpoint, e)))
}

/// Serializes a request payload into a JSON body.
pub(crate) fn to_body<T: Serialize>(payload: &T) -> BriqResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| BriqError::request(format!("failed to serialize request body: {}", e)))
}
