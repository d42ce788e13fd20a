//! Kick proxy client
//!
//! Talks to the introspection endpoint a deployed application may expose.
//! The endpoint is optional by nature: a missing configuration, an
//! unreachable application or a non-2xx answer all yield `None`.

use crate::config::KickConfig;
use crate::error::Result;
use coolflow_client::{CoolifyClient, TtlCache};
use serde_json::{Value, json};
use std::time::Duration;

/// Tuning for [`KickClient`]
#[derive(Debug, Clone)]
pub struct KickOptions {
    pub timeout: Duration,
    /// Lifetime of resolved per-application configs; zero disables caching
    pub cache_ttl: Duration,
}

impl Default for KickOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(60),
        }
    }
}

pub struct KickClient {
    coolify: CoolifyClient,
    http: reqwest::Client,
    configs: TtlCache<Option<KickConfig>>,
}

impl KickClient {
    pub fn new(coolify: CoolifyClient, options: KickOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            coolify,
            http,
            configs: TtlCache::new(options.cache_ttl),
        })
    }

    /// Resolve (and cache) the Kick endpoint of an application
    pub async fn config_for(&self, app_uuid: &str) -> Option<KickConfig> {
        if let Some(cached) = self.configs.get(app_uuid) {
            return cached;
        }

        let resolved = self.discover(app_uuid).await;
        self.configs.insert(app_uuid, resolved.clone());
        resolved
    }

    async fn discover(&self, app_uuid: &str) -> Option<KickConfig> {
        let app = match self.coolify.applications().get(app_uuid).await {
            Ok(app) => app,
            Err(e) => {
                tracing::warn!("Kick discovery: cannot load application {}: {}", app_uuid, e);
                return None;
            }
        };
        let vars = match self.coolify.applications().envs(app_uuid).await {
            Ok(vars) => vars,
            Err(e) => {
                tracing::warn!("Kick discovery: cannot load envs of {}: {}", app_uuid, e);
                return None;
            }
        };

        let config = KickConfig::resolve(&app, &vars);
        if config.is_none() {
            tracing::debug!("Kick is not enabled for application {}", app_uuid);
        }
        config
    }

    pub fn clear_cache(&self) {
        self.configs.clear();
    }

    pub async fn is_available(&self, app_uuid: &str) -> bool {
        self.config_for(app_uuid).await.is_some()
    }

    pub async fn health(&self, app_uuid: &str) -> Option<Value> {
        self.get(app_uuid, &["health"], &[]).await
    }

    pub async fn stats(&self, app_uuid: &str) -> Option<Value> {
        self.get(app_uuid, &["stats"], &[]).await
    }

    /// Available log files
    pub async fn logs(&self, app_uuid: &str) -> Option<Value> {
        self.get(app_uuid, &["logs"], &[]).await
    }

    pub async fn log_lines(
        &self,
        app_uuid: &str,
        file: &str,
        lines: usize,
        search: Option<&str>,
    ) -> Option<Value> {
        let mut query = vec![("lines", lines.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        self.get(app_uuid, &["logs", file], &query).await
    }

    pub async fn queue(&self, app_uuid: &str) -> Option<Value> {
        self.get(app_uuid, &["queue"], &[]).await
    }

    pub async fn queue_failed(&self, app_uuid: &str, limit: usize) -> Option<Value> {
        self.get(app_uuid, &["queue", "failed"], &[("limit", limit.to_string())])
            .await
    }

    /// Artisan commands the application allows to run remotely
    pub async fn artisan_commands(&self, app_uuid: &str) -> Option<Value> {
        self.get(app_uuid, &["artisan"], &[]).await
    }

    pub async fn run_artisan(&self, app_uuid: &str, command: &str) -> Option<Value> {
        let config = self.config_for(app_uuid).await?;
        let request = self
            .http
            .post(config.endpoint("artisan"))
            .bearer_auth(&config.token)
            .json(&json!({ "command": command }));
        send(request, "artisan").await
    }

    async fn get(
        &self,
        app_uuid: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Option<Value> {
        let config = self.config_for(app_uuid).await?;
        let what = segments.join("/");
        let Some(url) = config.endpoint_url(segments) else {
            tracing::warn!("Kick {}: invalid endpoint URL under {}", what, config.base_url);
            return None;
        };
        let mut request = self.http.get(url).bearer_auth(&config.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        send(request, &what).await
    }
}

async fn send(request: reqwest::RequestBuilder, what: &str) -> Option<Value> {
    let response = match request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Kick {} unreachable: {}", what, e);
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Kick {} answered {}", what, status);
        return None;
    }

    match response.json::<Value>().await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Kick {} returned non-JSON body: {}", what, e);
            None
        }
    }
}
