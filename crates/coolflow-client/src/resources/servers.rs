use super::{Created, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::Server;
use serde_json::Value;

/// `/servers` endpoints
pub struct Servers<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Servers<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Server>> {
        decode_list(self.client.get("servers").await?, "servers")
    }

    pub async fn get(&self, uuid: &str) -> Result<Server> {
        decode(self.client.get(&format!("servers/{}", uuid)).await?)
    }

    pub async fn create(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("servers", payload).await?)
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("servers/{}", uuid), payload)
            .await
    }

    pub async fn delete(&self, uuid: &str) -> Result<()> {
        self.client.delete(&format!("servers/{}", uuid)).await?;
        Ok(())
    }

    /// Every resource running on the server, as raw payloads
    pub async fn resources(&self, uuid: &str) -> Result<Vec<Value>> {
        decode_list(
            self.client
                .get(&format!("servers/{}/resources", uuid))
                .await?,
            "resources",
        )
    }

    pub async fn domains(&self, uuid: &str) -> Result<Vec<Value>> {
        decode_list(
            self.client
                .get(&format!("servers/{}/domains", uuid))
                .await?,
            "domains",
        )
    }

    /// Kick off connection validation on the Coolify side
    pub async fn validate(&self, uuid: &str) -> Result<Value> {
        self.client
            .trigger(&format!("servers/{}/validate", uuid), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{ClientConfig, CoolifyClient};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> CoolifyClient {
        CoolifyClient::new(
            ClientConfig::new(server.uri(), "t")
                .with_cache_ttl(Duration::from_secs(60))
                .with_retry(0, Duration::ZERO),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_all_get_and_resources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"uuid": "srv1", "name": "main", "ip": "10.0.0.2", "port": 22}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers/srv1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "srv1", "name": "main", "is_reachable": true, "is_usable": true
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers/srv1/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"uuid": "a1", "type": "application"},
                {"uuid": "d1", "type": "standalone-postgresql"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers/srv1/domains"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"ip": "10.0.0.2", "domains": ["app.example.com"]}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let servers = client.servers().all().await.unwrap();
        assert_eq!(servers[0].port, Some(22));

        let srv = client.servers().get("srv1").await.unwrap();
        assert_eq!(srv.is_reachable, Some(true));

        let resources = client.servers().resources("srv1").await.unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1]["type"], "standalone-postgresql");

        let domains = client.servers().domains("srv1").await.unwrap();
        assert_eq!(domains[0]["domains"][0], "app.example.com");
    }

    #[tokio::test]
    async fn test_validate_is_never_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/servers/srv1/validate"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Validation started."})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        client.servers().validate("srv1").await.unwrap();
        client.servers().validate("srv1").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/servers"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": "srv2"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/servers/srv2"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": "srv2"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/servers/srv2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let created = client
            .servers()
            .create(&json!({"name": "edge", "ip": "10.0.0.3", "private_key_uuid": "k1"}))
            .await
            .unwrap();
        assert_eq!(created.uuid, "srv2");
        client
            .servers()
            .update("srv2", &json!({"name": "edge-1"}))
            .await
            .unwrap();
        client.servers().delete("srv2").await.unwrap();
    }
}
