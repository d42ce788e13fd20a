//! Kick introspection proxy for CoolFlow
//!
//! Kick is an optional endpoint inside a deployed application
//! (health, stats, logs, queue, artisan). Its URL and token are
//! discovered from the application itself through the Coolify API.
//!
//! ```ignore
//! use coolflow_kick::{KickClient, KickOptions};
//!
//! let kick = KickClient::new(coolify_client, KickOptions::default())?;
//! if let Some(health) = kick.health(&app_uuid).await {
//!     println!("{}", health);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{KickClient, KickOptions};
pub use config::KickConfig;
pub use error::{KickError, Result};
