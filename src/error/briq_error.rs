use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the Briq client.
///
/// Every failure at the transport or HTTP layer is translated into exactly one
/// of these variants:
///
/// - [`BriqError::Config`] and [`BriqError::Authentication`]: fix your credentials
/// - [`BriqError::Api`]: the request itself was rejected by the API
/// - [`BriqError::Request`]: the service could not be reached or answered garbage
#[derive(Error, Debug)]
pub enum BriqError {
    /// Missing or invalid configuration, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login exchange failed, or a request stayed unauthorized after one retry
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx answer from the API other than an authorization failure
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Transport-level failure or malformed response
    #[error("Request failed: {0}")]
    Request(String),
}

impl BriqError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Builds an [`BriqError::Api`] from a raw error body.
    ///
    /// A JSON body is kept as-is and its `detail`/`error`/`message` field (if
    /// any) becomes the message. A non-JSON body becomes the message verbatim.
    pub fn api(status: u16, raw_body: &str) -> Self {
        let trimmed = raw_body.trim();
        if trimmed.is_empty() {
            return Self::Api {
                status,
                message: generic_status_message(status).to_string(),
                body: None,
            };
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => {
                let message = json
                    .get("detail")
                    .or_else(|| json.get("error"))
                    .or_else(|| json.get("message"))
                    .map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    })
                    .unwrap_or_else(|| json.to_string());

                Self::Api {
                    status,
                    message,
                    body: Some(json),
                }
            }
            Err(_) => Self::Api {
                status,
                message: trimmed.to_string(),
                body: None,
            },
        }
    }

    /// True for the "fix your credentials" family.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Authentication(_))
    }

    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed JSON error payload returned by the API, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BriqError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection error"
        } else if err.is_decode() {
            "malformed response"
        } else {
            "transport error"
        };
        Self::Request(format!("{}: {}", kind, err))
    }
}

fn generic_status_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        403 => "Access denied",
        404 => "Resource not found",
        422 => "Unprocessable entity",
        429 => "Too many requests",
        500..=599 => "Briq server error",
        _ => "Unexpected API response",
    }
}

/// Default result type for client operations
pub type BriqResult<T> = Result<T, BriqError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_error_display_messages() {
        let config = BriqError::config("API key not set");
        assert_eq!(config.to_string(), "Configuration error: API key not set");

        let auth = BriqError::authentication("bad credentials");
        assert_eq!(auth.to_string(), "Authentication failed: bad credentials");

        let request = BriqError::request("connection refused");
        assert_eq!(request.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn test_api_error_keeps_json_body() {
        let error = BriqError::api(400, r#"{"error": "Bad request"}"#);

        assert_eq!(error.status(), Some(400));
        assert_eq!(error.body(), Some(&json!({"error": "Bad request"})));
        assert_eq!(error.to_string(), "API error (status 400): Bad request");
    }

    #[test]
    fn test_api_error_uses_detail_field() {
        let error = BriqError::api(422, r#"{"detail": [{"loc": ["body", "name"]}]}"#);

        match error {
            BriqError::Api { status, message, body } => {
                assert_eq!(status, 422);
                assert!(message.contains("loc"));
                assert!(body.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_with_plain_text_body() {
        let error = BriqError::api(404, "Not Found");
        assert_eq!(error.to_string(), "API error (status 404): Not Found");
        assert!(error.body().is_none());
    }

    #[test]
    fn test_api_error_with_empty_body_uses_generic_message() {
        let error = BriqError::api(400, "");
        assert_eq!(error.to_string(), "API error (status 400): Bad request");

        let error = BriqError::api(503, "   ");
        assert_eq!(error.to_string(), "API error (status 503): Briq server error");
    }

    #[test]
    fn test_auth_error_family() {
        assert!(BriqError::config("x").is_auth_error());
        assert!(BriqError::authentication("x").is_auth_error());
        assert!(!BriqError::request("x").is_auth_error());
        assert!(!BriqError::api(400, "").is_auth_error());
    }

    #[test]
    fn test_result_type() {
        fn fails() -> BriqResult<()> {
            Err(BriqError::authentication("expired"))
        }

        assert!(matches!(fails().unwrap_err(), BriqError::Authentication(_)));
    }
}
