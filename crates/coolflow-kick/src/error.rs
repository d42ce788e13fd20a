//! Kick error types
//!
//! Only construction can fail. Every Kick call degrades to `None`
//! instead of returning an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KickError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, KickError>;
