//! # Briq Rust client
//!
//! Async client for the Briq messaging platform API.
//!
//! ## Features
//!
//! - API-key or username/password authentication
//! - Lazy login with a cached bearer token, re-authenticated once when rejected
//! - Workspace, campaign and message endpoints
//! - Typed errors separating credential problems, API rejections and
//!   transport failures
//!
//! ## Example
//!
//! ```no_run
//! use briq::{BriqClient, resources::{InstantMessage, CampaignUpdate}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), briq::BriqError> {
//!     // Reads BRIQ_API_KEY / BRIQ_BASE_URL (and ./.env) when not given explicitly
//!     let client = BriqClient::new(None, None)?;
//!
//!     let workspace = client.workspace().create("Acme").await?;
//!     println!("created: {}", workspace);
//!
//!     client
//!         .campaign()
//!         .update("c1", CampaignUpdate::new().description("new"))
//!         .await?;
//!
//!     let message = InstantMessage::new("Hello!", vec!["255788344348".into()], "BRIQ");
//!     client.message().send_instant(message).await?;
//!     Ok(())
//! }
//! ```

/// Credentials, bearer token cache and auth headers
pub mod auth;

/// Client and authenticated request pipeline
pub mod client;

/// Base URL, version prefix and timeouts
pub mod config;

/// Error taxonomy
pub mod error;

/// Workspace, campaign and message endpoints
pub mod resources;

pub mod utils;

pub use auth::{AccessToken, CredentialStore, Credentials};
pub use client::{BriqClient, BriqClientBuilder};
pub use config::ClientConfig;
pub use error::{BriqError, BriqResult};
