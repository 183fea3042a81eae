//! Authentication
//!
//! - `credentials.rs`: username/password or static API key
//! - `token.rs`: cached bearer token and the login response
//! - `store.rs`: credential store producing per-request auth headers

pub mod credentials;
pub mod store;
pub mod token;

pub use credentials::Credentials;
pub use store::{AuthContext, CredentialStore, API_KEY_HEADER};
pub use token::{AccessToken, TokenResponse};
