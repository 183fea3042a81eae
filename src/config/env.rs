use std::env;
use std::path::Path;

/// Environment variable holding the API key for the static-key client
pub const API_KEY_ENV: &str = "BRIQ_API_KEY";

/// Environment variable overriding the default base URL
pub const BASE_URL_ENV: &str = "BRIQ_BASE_URL";

/// Host used when neither an explicit URL nor `BRIQ_BASE_URL` is given
pub const DEFAULT_BASE_URL: &str = "http://143.198.159.135:8000";

/// Reads Briq settings from the process environment.
pub struct EnvManager;

impl EnvManager {
    /// Loads `./.env` into the process environment if the file exists.
    ///
    /// Variables already set in the environment win over the file. Skipped in
    /// unit tests, which set their variables directly.
    pub fn load_dotenv() {
        if cfg!(test) {
            return;
        }

        if Path::new(".env").exists() {
            match dotenvy::dotenv() {
                Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
                Err(e) => tracing::warn!("Failed to load .env file: {}", e),
            }
        }
    }

    /// Explicit argument, then `BRIQ_BASE_URL`, then [`DEFAULT_BASE_URL`].
    pub fn resolve_base_url(explicit: Option<String>) -> String {
        non_blank(explicit)
            .or_else(|| Self::get_var(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Explicit argument, then `BRIQ_API_KEY`. `None` when neither is set.
    pub fn resolve_api_key(explicit: Option<String>) -> Option<String> {
        non_blank(explicit).or_else(|| Self::get_var(API_KEY_ENV))
    }

    fn get_var(key: &str) -> Option<String> {
        non_blank(env::var(key).ok())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
