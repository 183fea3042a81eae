use std::fmt;

use crate::utils::logging::mask_secret;

/// How the client proves its identity to the API.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Exchanged for a bearer token at `POST /auth/login`
    UsernamePassword { username: String, password: String },
    /// Sent as `X-API-Key` on every request. `None` until a key is set.
    ApiKey(Option<String>),
}

impl Credentials {
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::UsernamePassword {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn api_key(key: Option<String>) -> Self {
        Self::ApiKey(key.filter(|k| !k.trim().is_empty()))
    }

    pub fn is_bearer(&self) -> bool {
        matches!(self, Self::UsernamePassword { .. })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::ApiKey(key) => f
                .debug_tuple("ApiKey")
                .field(&key.as_deref().map(mask_secret))
                .finish(),
        }
    }
}
