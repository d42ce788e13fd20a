//! Kick endpoint discovery
//!
//! An application exposes Kick when its own environment carries
//! `KICK_ENABLED` (truthy) and `KICK_TOKEN`. `KICK_PREFIX` moves the
//! endpoint away from the default `/kick`.

use coolflow_client::{Application, EnvironmentVariable};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "kick";

const TOKEN_KEY: &str = "KICK_TOKEN";
const ENABLED_KEY: &str = "KICK_ENABLED";
const PREFIX_KEY: &str = "KICK_PREFIX";

/// Resolved Kick endpoint of one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickConfig {
    /// Application URL, e.g. `https://app.example.com`
    pub base_url: String,

    /// Path segment, without slashes
    pub prefix: String,

    /// Per-application Bearer token
    pub token: String,
}

impl KickConfig {
    /// Build from the application's first domain and its environment variables.
    ///
    /// Returns `None` when Kick is disabled, the token is missing, or the
    /// application has no domain. Preview variables are ignored.
    pub fn resolve(app: &Application, vars: &[EnvironmentVariable]) -> Option<Self> {
        let lookup = |key: &str| {
            vars.iter()
                .filter(|v| !v.is_preview && v.key == key)
                .find_map(|v| v.value.as_deref())
                .map(|v| unquote(v.trim()).to_string())
        };

        if !lookup(ENABLED_KEY).is_some_and(|v| is_truthy(&v)) {
            return None;
        }
        let token = lookup(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let base_url = app.urls().into_iter().next()?;
        let prefix = lookup(PREFIX_KEY)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Some(Self {
            base_url,
            prefix,
            token,
        })
    }

    /// Full URL of a Kick endpoint
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/{}", self.base_url, self.prefix)
        } else {
            format!("{}/{}/{}", self.base_url, self.prefix, path)
        }
    }

    /// Endpoint URL built from raw path segments, each one percent-encoded
    pub fn endpoint_url(&self, segments: &[&str]) -> Option<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint("")).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(key: &str, value: &str) -> EnvironmentVariable {
        EnvironmentVariable {
            key: key.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn app(fqdn: &str) -> Application {
        Application {
            uuid: "a1".into(),
            fqdn: Some(fqdn.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_enabled() {
        let config = KickConfig::resolve(
            &app("https://shop.example.com,https://www.shop.example.com"),
            &[var("KICK_ENABLED", "true"), var("KICK_TOKEN", "secret")],
        )
        .unwrap();
        assert_eq!(config.base_url, "https://shop.example.com");
        assert_eq!(config.prefix, "kick");
        assert_eq!(config.endpoint("health"), "https://shop.example.com/kick/health");
    }

    #[test]
    fn test_custom_prefix_and_quotes() {
        let config = KickConfig::resolve(
            &app("https://shop.example.com"),
            &[
                var("KICK_ENABLED", "\"1\""),
                var("KICK_TOKEN", "\"secret\""),
                var("KICK_PREFIX", "/_internal/kick/"),
            ],
        )
        .unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(
            config.endpoint("/queue"),
            "https://shop.example.com/_internal/kick/queue"
        );
        assert_eq!(
            config
                .endpoint_url(&["logs", "app log?.txt"])
                .unwrap()
                .as_str(),
            "https://shop.example.com/_internal/kick/logs/app%20log%3F.txt"
        );
    }

    #[test]
    fn test_disabled_or_incomplete() {
        let app = app("https://shop.example.com");
        assert!(KickConfig::resolve(&app, &[var("KICK_TOKEN", "secret")]).is_none());
        assert!(
            KickConfig::resolve(
                &app,
                &[var("KICK_ENABLED", "false"), var("KICK_TOKEN", "secret")]
            )
            .is_none()
        );
        assert!(KickConfig::resolve(&app, &[var("KICK_ENABLED", "on")]).is_none());
        assert!(
            KickConfig::resolve(
                &Application::default(),
                &[var("KICK_ENABLED", "yes"), var("KICK_TOKEN", "secret")]
            )
            .is_none()
        );
    }

    #[test]
    fn test_preview_variables_are_ignored() {
        let mut preview_token = var("KICK_TOKEN", "preview");
        preview_token.is_preview = true;
        let config = KickConfig::resolve(
            &app("https://shop.example.com"),
            &[
                preview_token,
                var("KICK_ENABLED", "true"),
                var("KICK_TOKEN", "live"),
            ],
        )
        .unwrap();
        assert_eq!(config.token, "live");
    }
}
