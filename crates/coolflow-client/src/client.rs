//! Authenticated HTTP client for the Coolify REST API (v1)
//!
//! Every request carries the Bearer token. GET responses go through a
//! [`TtlCache`] keyed by path and query; any successful write clears it.

use crate::cache::TtlCache;
use crate::error::{ApiError, Result};
use crate::resources::{
    Applications, Databases, Deployments, GitHubApps, Projects, SecurityKeys, Servers, Services,
    Teams,
};
use backon::{ConstantBuilder, Retryable};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const API_PREFIX: &str = "/api/v1";

/// Connection settings for [`CoolifyClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coolify base URL, with or without the `/api/v1` suffix
    pub base_url: String,

    /// API token (Bearer)
    pub token: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Extra attempts for transient failures
    pub retry_times: usize,

    /// Fixed delay between retries
    pub retry_sleep: Duration,

    /// GET response cache lifetime; zero disables caching
    pub cache_ttl: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(30),
            retry_times: 3,
            retry_sleep: Duration::from_millis(100),
            cache_ttl: Duration::from_secs(30),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_retry(mut self, times: usize, sleep: Duration) -> Self {
        self.retry_times = times;
        self.retry_sleep = sleep;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Normalize a Coolify URL to `<scheme>://<host>[/path]/api/v1`
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with(API_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_PREFIX)
    }
}

/// Coolify API client
///
/// Cloning is cheap: the connection pool and the response cache are shared.
#[derive(Debug, Clone)]
pub struct CoolifyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry_times: usize,
    retry_sleep: Duration,
    cache: Arc<TtlCache<Value>>,
    bypass_cache: bool,
}

impl CoolifyClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "Coolify API token is empty (COOLIFY_TOKEN)".to_string(),
            ));
        }
        if config.base_url.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "Coolify URL is empty (COOLIFY_URL)".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("coolflow/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url),
            token: config.token,
            retry_times: config.retry_times,
            retry_sleep: config.retry_sleep,
            cache: Arc::new(TtlCache::new(config.cache_ttl)),
            bypass_cache: false,
        })
    }

    /// The normalized `.../api/v1` base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Coolify instance URL without the API prefix
    pub fn instance_url(&self) -> &str {
        self.base_url
            .strip_suffix(API_PREFIX)
            .unwrap_or(&self.base_url)
    }

    /// A client that skips cached reads but shares pool and cache.
    ///
    /// Used wherever stale data would be wrong: re-fetching before a
    /// destructive action and polling for eventual consistency.
    pub fn fresh(&self) -> Self {
        Self {
            bypass_cache: true,
            ..self.clone()
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Cleared Coolify response cache");
    }

    pub fn applications(&self) -> Applications<'_> {
        Applications::new(self)
    }

    pub fn databases(&self) -> Databases<'_> {
        Databases::new(self)
    }

    pub fn deployments(&self) -> Deployments<'_> {
        Deployments::new(self)
    }

    pub fn servers(&self) -> Servers<'_> {
        Servers::new(self)
    }

    pub fn services(&self) -> Services<'_> {
        Services::new(self)
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(self)
    }

    pub fn github_apps(&self) -> GitHubApps<'_> {
        GitHubApps::new(self)
    }

    pub fn security_keys(&self) -> SecurityKeys<'_> {
        SecurityKeys::new(self)
    }

    /// Coolify version string (`GET /version` answers plain text)
    pub async fn version(&self) -> Result<String> {
        let value = self.get("version").await?;
        Ok(match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// True when the API answers an authenticated request
    pub async fn health_check(&self) -> bool {
        match self.fresh().version().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Coolify health check failed: {}", e);
                false
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let key = cache_key(path, query);
        if !self.bypass_cache
            && let Some(hit) = self.cache.get(&key)
        {
            tracing::debug!(path = %key, "Coolify cache hit");
            return Ok(hit);
        }

        let value = self.request(Method::GET, path, query, None).await?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.write(Method::POST, path, &[], Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.write(Method::PATCH, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.write(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.delete_with_query(path, &[]).await
    }

    pub async fn delete_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.write(Method::DELETE, path, query, None).await
    }

    /// Non-GET request without body, e.g. start/stop/restart actions
    pub async fn action(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.write(Method::POST, path, query, None).await
    }

    /// GET endpoint with side effects (`/deploy`, server validation).
    ///
    /// Never served from or stored in the cache, and invalidates it like a write.
    pub async fn trigger(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.write(Method::GET, path, query, None).await
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let value = self.request(method.clone(), path, query, body).await?;
        self.cache.clear();
        tracing::info!(%method, path, "Coolify write succeeded, cache invalidated");
        Ok(value)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(path);
        let policy = ConstantBuilder::default()
            .with_delay(self.retry_sleep)
            .with_max_times(self.retry_times);

        (|| self.send_once(method.clone(), &url, query, body))
            .retry(policy)
            .when(ApiError::is_transient)
            .notify(|err: &ApiError, after: Duration| {
                tracing::warn!("Coolify request {} failed ({}), retrying in {:?}", url, err, after);
            })
            .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!(%method, url, "Coolify request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        parse_body(&text)
    }
}

fn cache_key(path: &str, query: &[(&str, String)]) -> String {
    let path = path.trim_start_matches('/');
    if query.is_empty() {
        return path.to_string();
    }
    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", path, pairs.join("&"))
}

/// Decode a success body; empty bodies become `null`, non-JSON becomes a string.
fn parse_body(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(trimmed.to_string())),
    }
}

/// Extract the user-facing message from an error body
fn error_message(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        for field in ["message", "error"] {
            if let Some(msg) = value.get(field).and_then(Value::as_str) {
                return Some(msg.to_string());
            }
        }
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, ttl: Duration) -> CoolifyClient {
        let config = ClientConfig::new(server.uri(), "test-token")
            .with_cache_ttl(ttl)
            .with_retry(2, Duration::from_millis(1));
        CoolifyClient::new(config).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://coolify.example.com"),
            "https://coolify.example.com/api/v1"
        );
        assert_eq!(
            normalize_base_url("https://coolify.example.com/"),
            "https://coolify.example.com/api/v1"
        );
        assert_eq!(
            normalize_base_url("https://coolify.example.com/api/v1/"),
            "https://coolify.example.com/api/v1"
        );
    }

    #[test]
    fn test_instance_url_drops_api_prefix() {
        let client =
            CoolifyClient::new(ClientConfig::new("https://c.example.com/coolify/", "t")).unwrap();
        assert_eq!(client.base_url(), "https://c.example.com/coolify/api/v1");
        assert_eq!(client.instance_url(), "https://c.example.com/coolify");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let result = CoolifyClient::new(ClientConfig::new("https://c.example.com", " "));
        assert!(matches!(result, Err(ApiError::InvalidConfig(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Unauthenticated."}"#).as_deref(),
            Some("Unauthenticated.")
        );
        assert_eq!(
            error_message(r#"{"error":"Server not found"}"#).as_deref(),
            Some("Server not found")
        );
        assert_eq!(error_message("plain failure").as_deref(), Some("plain failure"));
        assert_eq!(error_message("  "), None);
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "p1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let value = client.get("projects").await.unwrap();
        assert_eq!(value[0]["uuid"], "p1");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/applications/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"message": "Application not found."})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/projects"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({"message": "The name field is required."})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);

        let err = client.get("applications/missing").await.unwrap_err();
        assert!(err.is_not_found());

        let err = client.get("servers").await.unwrap_err();
        assert!(matches!(err, ApiError::Authentication(ref m) if m == "Unauthenticated."));

        let err = client.post("projects", &json!({})).await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "The name field is required.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_is_cached_until_write() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/projects"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": "new"})))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(60));
        client.get("projects").await.unwrap();
        client.get("projects").await.unwrap();

        client.post("projects", &json!({"name": "demo"})).await.unwrap();
        client.get("projects").await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_client_bypasses_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(60));
        client.get("applications").await.unwrap();
        client.fresh().get("applications").await.unwrap();
        client.fresh().get("applications").await.unwrap();
        // still cached for the regular client
        client.get("applications").await.unwrap();
    }

    #[tokio::test]
    async fn test_query_is_part_of_cache_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/applications/a1/logs"))
            .and(query_param("lines", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": "ten"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/applications/a1/logs"))
            .and(query_param("lines", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": "twenty"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(60));
        let ten = client
            .get_with_query("applications/a1/logs", &[("lines", "10".into())])
            .await
            .unwrap();
        let twenty = client
            .get_with_query("applications/a1/logs", &[("lines", "20".into())])
            .await
            .unwrap();
        client
            .get_with_query("applications/a1/logs", &[("lines", "10".into())])
            .await
            .unwrap();

        assert_eq!(ten["logs"], "ten");
        assert_eq!(twenty["logs"], "twenty");
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "s1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let value = client.get("servers").await.unwrap();
        assert_eq!(value[0]["uuid"], "s1");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers/nope"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let err = client.get("servers/nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_version_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/version"))
            .respond_with(ResponseTemplate::new(200).set_body_string("4.0.0-beta.420"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        assert_eq!(client.version().await.unwrap(), "4.0.0-beta.420");
        assert!(client.health_check().await);
    }
}
