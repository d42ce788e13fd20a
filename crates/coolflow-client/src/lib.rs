//! Coolify API client for CoolFlow
//!
//! Thin, typed access to the Coolify REST API (v1).
//!
//! # Features
//!
//! - Bearer token authentication
//! - Status based error classification (401, 404, everything else)
//! - TTL cache for GET responses, cleared on every write
//! - Fixed-count retry for transient failures
//! - One repository per resource type
//!
//! # Example
//!
//! ```ignore
//! use coolflow_client::{ClientConfig, CoolifyClient};
//!
//! let client = CoolifyClient::new(ClientConfig::new("https://coolify.example.com", token))?;
//!
//! for app in client.applications().all().await? {
//!     println!("{} {}", app.name, app.status_str());
//! }
//!
//! // Skip the cache when stale data is not acceptable
//! let live = client.fresh().applications().all().await?;
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod resources;

pub use cache::TtlCache;
pub use client::{ClientConfig, CoolifyClient, normalize_base_url};
pub use error::{ApiError, Result};
pub use models::*;
pub use resources::{Created, DeleteOptions, EnvVarInput};
