//! Runtime settings read from the process environment
//!
//! Precedence for resource UUIDs: command-line flag > environment variable >
//! default bookmark > discovery. Flags are applied by the CLI, discovery by
//! `coolflow-core`; this module covers the two layers in between.

use crate::bookmarks::EnvironmentBookmark;
use crate::error::{ConfigError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENVIRONMENT: &str = "production";

pub const ENV_URL: &str = "COOLIFY_URL";
pub const ENV_TOKEN: &str = "COOLIFY_TOKEN";
pub const ENV_TEAM_ID: &str = "COOLIFY_TEAM_ID";
pub const ENV_PROJECT_UUID: &str = "COOLIFY_PROJECT_UUID";
pub const ENV_ENVIRONMENT: &str = "COOLIFY_ENVIRONMENT";
pub const ENV_APPLICATION_UUID: &str = "COOLIFY_APPLICATION_UUID";
pub const ENV_DATABASE_UUID: &str = "COOLIFY_DATABASE_UUID";
pub const ENV_REDIS_UUID: &str = "COOLIFY_REDIS_UUID";
pub const ENV_SERVER_UUID: &str = "COOLIFY_SERVER_UUID";
const ENV_CACHE_TTL: &str = "COOLIFY_CACHE_TTL";
const ENV_TIMEOUT: &str = "COOLIFY_TIMEOUT";
const ENV_RETRY_TIMES: &str = "COOLIFY_RETRY_TIMES";
const ENV_RETRY_SLEEP_MS: &str = "COOLIFY_RETRY_SLEEP_MS";
const ENV_KICK_CACHE_TTL: &str = "COOLIFY_KICK_CACHE_TTL";
const ENV_KICK_TIMEOUT: &str = "COOLIFY_KICK_TIMEOUT";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub team_id: Option<String>,
    pub project_uuid: Option<String>,
    environment: Option<String>,
    pub application_uuid: Option<String>,
    pub database_uuid: Option<String>,
    pub redis_uuid: Option<String>,
    pub server_uuid: Option<String>,
    /// Seconds; zero or negative disables the response cache
    pub cache_ttl_secs: i64,
    pub timeout: Duration,
    pub retry_times: usize,
    pub retry_sleep: Duration,
    pub kick_cache_ttl_secs: i64,
    pub kick_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            team_id: None,
            project_uuid: None,
            environment: None,
            application_uuid: None,
            database_uuid: None,
            redis_uuid: None,
            server_uuid: None,
            cache_ttl_secs: 30,
            timeout: Duration::from_secs(30),
            retry_times: 3,
            retry_sleep: Duration::from_millis(100),
            kick_cache_ttl_secs: 60,
            kick_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            url: get(ENV_URL),
            token: get(ENV_TOKEN),
            team_id: get(ENV_TEAM_ID),
            project_uuid: get(ENV_PROJECT_UUID),
            environment: get(ENV_ENVIRONMENT),
            application_uuid: get(ENV_APPLICATION_UUID),
            database_uuid: get(ENV_DATABASE_UUID),
            redis_uuid: get(ENV_REDIS_UUID),
            server_uuid: get(ENV_SERVER_UUID),
            cache_ttl_secs: parse_or(ENV_CACHE_TTL, get(ENV_CACHE_TTL), defaults.cache_ttl_secs)?,
            timeout: Duration::from_secs(parse_or(
                ENV_TIMEOUT,
                get(ENV_TIMEOUT),
                defaults.timeout.as_secs(),
            )?),
            retry_times: parse_or(ENV_RETRY_TIMES, get(ENV_RETRY_TIMES), defaults.retry_times)?,
            retry_sleep: Duration::from_millis(parse_or(
                ENV_RETRY_SLEEP_MS,
                get(ENV_RETRY_SLEEP_MS),
                100,
            )?),
            kick_cache_ttl_secs: parse_or(
                ENV_KICK_CACHE_TTL,
                get(ENV_KICK_CACHE_TTL),
                defaults.kick_cache_ttl_secs,
            )?,
            kick_timeout: Duration::from_secs(parse_or(
                ENV_KICK_TIMEOUT,
                get(ENV_KICK_TIMEOUT),
                defaults.kick_timeout.as_secs(),
            )?),
        })
    }

    /// Environment name, `production` unless configured
    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn set_environment(&mut self, name: impl Into<String>) {
        self.environment = Some(name.into());
    }

    /// Fill every value the environment left unset from a bookmark
    pub fn apply_bookmark(&mut self, bookmark: &EnvironmentBookmark) {
        fill(&mut self.project_uuid, &bookmark.project_uuid);
        fill(&mut self.server_uuid, &bookmark.server_uuid);
        fill(&mut self.application_uuid, &bookmark.application_uuid);
        fill(&mut self.database_uuid, &bookmark.database_uuid);
        fill(&mut self.redis_uuid, &bookmark.redis_uuid);
        if self.environment.is_none() && !bookmark.environment.is_empty() {
            self.environment = Some(bookmark.environment.clone());
        }
    }

    /// Instance URL and API token, both required for any API command
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self.url.as_deref().ok_or(ConfigError::MissingVar(ENV_URL))?;
        let token = self
            .token
            .as_deref()
            .ok_or(ConfigError::MissingVar(ENV_TOKEN))?;
        Ok((url, token))
    }

    pub fn require_project(&self) -> Result<&str> {
        self.project_uuid
            .as_deref()
            .ok_or(ConfigError::MissingVar(ENV_PROJECT_UUID))
    }
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none()
        && let Some(v) = value.as_deref().filter(|v| !v.is_empty())
    {
        *slot = Some(v.to_string());
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

/// Load `.env` from the working directory without overriding variables
/// already set in the process.
///
/// Returns the loaded path, or `None` when there is no `.env`.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded {}", path.display());
            Ok(Some(path))
        }
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
