use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG` (default `briq=info`).
///
/// Meant for binaries and tests embedding the client; does nothing if a
/// global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("briq=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Short preview of a secret for logs: `abcd...wxyz`, or `***` when short.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

pub fn log_request_sent(method: &str, url: &str, attempt: u8) {
    debug!("{} {} (attempt {})", method, url, attempt);
}

pub fn log_response_received(method: &str, url: &str, status: u16, body_len: usize) {
    debug!("{} {} -> {} ({} bytes)", method, url, status, body_len);
}

pub fn log_reauthenticating(endpoint: &str) {
    warn!("Token rejected on {}, re-authenticating once", endpoint);
}

pub fn log_api_error(endpoint: &str, status: u16, message: &str) {
    warn!("Briq API error: {} - Status: {} - Error: {}", endpoint, status, message);
}

pub fn log_login_attempt(login_url: &str, username: &str) {
    debug!("Logging in to {} as {}", login_url, username);
}

pub fn log_login_succeeded(username: &str) {
    info!("Authenticated with Briq as {}", username);
}

pub fn log_login_failed(status: u16) {
    warn!("Briq login rejected with status {}", status);
}

pub fn log_token_invalidated() {
    debug!("Cached access token invalidated");
}

pub fn log_login_discarded() {
    warn!("Credentials changed during login, discarding the new token");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
