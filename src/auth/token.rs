use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::utils::logging::mask_secret;

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Bearer token obtained from the login exchange
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    access_token: String,
    token_type: String,
    obtained_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        let token_type = token_type.into();
        let token_type = if token_type.trim().is_empty() {
            DEFAULT_TOKEN_TYPE.to_string()
        } else {
            token_type.trim().to_string()
        };

        Self {
            access_token: access_token.into(),
            token_type,
            obtained_at: Utc::now(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Value for the `Authorization` header: `<token_type> <access_token>`
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// Same token string, regardless of when each copy was obtained.
    pub(crate) fn same_token(&self, other: &AccessToken) -> bool {
        self.access_token == other.access_token && self.token_type == other.token_type
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &mask_secret(&self.access_token))
            .field("token_type", &self.token_type)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.token_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let token = AccessToken::new("T", "Bearer");
        assert_eq!(token.authorization_header(), "Bearer T");
    }

    #[test]
    fn test_blank_token_type_defaults_to_bearer() {
        let token = AccessToken::new("T", "  ");
        assert_eq!(token.token_type(), "Bearer");
    }

    #[test]
    fn test_token_response_conversion() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        let token = AccessToken::from(response);

        assert_eq!(token.access_token(), "abc");
        assert_eq!(token.authorization_header(), "bearer abc");
    }

    #[test]
    fn test_token_response_requires_both_fields() {
        let result: Result<TokenResponse, _> = serde_json::from_str(r#"{"access_token": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AccessToken::new("super-secret-access-token", "Bearer");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret-access-token"));
    }

    #[test]
    fn test_same_token_ignores_timestamp() {
        let a = AccessToken::new("T", "Bearer");
        let b = AccessToken::new("T", "Bearer");
        let c = AccessToken::new("U", "Bearer");

        assert!(a.same_token(&b));
        assert!(!a.same_token(&c));
    }
}
