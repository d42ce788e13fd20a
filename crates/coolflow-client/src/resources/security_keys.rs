use super::{Created, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::SecurityKey;
use serde_json::{Value, json};

/// `/security/keys` endpoints (private keys used to reach servers)
pub struct SecurityKeys<'a> {
    client: &'a CoolifyClient,
}

impl<'a> SecurityKeys<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<SecurityKey>> {
        decode_list(self.client.get("security/keys").await?, "keys")
    }

    pub async fn get(&self, uuid: &str) -> Result<SecurityKey> {
        decode(self.client.get(&format!("security/keys/{}", uuid)).await?)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        private_key: &str,
    ) -> Result<Created> {
        let body = json!({
            "name": name,
            "description": description,
            "private_key": private_key,
        });
        decode(self.client.post("security/keys", &body).await?)
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("security/keys/{}", uuid), payload)
            .await
    }

    pub async fn delete(&self, uuid: &str) -> Result<()> {
        self.client
            .delete(&format!("security/keys/{}", uuid))
            .await?;
        Ok(())
    }
}
