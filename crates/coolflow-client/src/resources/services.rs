use super::{Created, DeleteOptions, EnvVarInput, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{EnvironmentVariable, Service};
use serde_json::{Value, json};

/// `/services` endpoints (one-click services and compose stacks)
pub struct Services<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Services<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Service>> {
        decode_list(self.client.get("services").await?, "services")
    }

    pub async fn get(&self, uuid: &str) -> Result<Service> {
        decode(self.client.get(&format!("services/{}", uuid)).await?)
    }

    pub async fn create(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("services", payload).await?)
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("services/{}", uuid), payload)
            .await
    }

    pub async fn delete(&self, uuid: &str, options: DeleteOptions) -> Result<()> {
        self.client
            .delete_with_query(&format!("services/{}", uuid), &options.query())
            .await?;
        Ok(())
    }

    pub async fn start(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("services/{}/start", uuid), &[])
            .await
    }

    pub async fn stop(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("services/{}/stop", uuid), &[])
            .await
    }

    pub async fn restart(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("services/{}/restart", uuid), &[])
            .await
    }

    pub async fn envs(&self, uuid: &str) -> Result<Vec<EnvironmentVariable>> {
        decode_list(
            self.client.get(&format!("services/{}/envs", uuid)).await?,
            "data",
        )
    }

    pub async fn create_env(&self, uuid: &str, env: &EnvVarInput) -> Result<Created> {
        decode(
            self.client
                .post(&format!("services/{}/envs", uuid), &json!(env))
                .await?,
        )
    }

    pub async fn update_envs_bulk(&self, uuid: &str, envs: &[EnvVarInput]) -> Result<Value> {
        self.client
            .patch(
                &format!("services/{}/envs/bulk", uuid),
                &json!({ "data": envs }),
            )
            .await
    }

    pub async fn delete_env(&self, uuid: &str, env_uuid: &str) -> Result<()> {
        self.client
            .delete(&format!("services/{}/envs/{}", uuid, env_uuid))
            .await?;
        Ok(())
    }
}
