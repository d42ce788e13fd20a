use super::{Created, DeleteOptions, EnvVarInput, decode, decode_list, flag};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{Application, EnvironmentVariable};
use serde_json::{Value, json};

/// `/applications` endpoints
pub struct Applications<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Applications<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Application>> {
        decode_list(self.client.get("applications").await?, "applications")
    }

    pub async fn get(&self, uuid: &str) -> Result<Application> {
        decode(self.client.get(&format!("applications/{}", uuid)).await?)
    }

    /// Public git repository
    pub async fn create_public(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("applications/public", payload).await?)
    }

    /// Private repository through a GitHub App
    pub async fn create_private_github_app(&self, payload: &Value) -> Result<Created> {
        decode(
            self.client
                .post("applications/private-github-app", payload)
                .await?,
        )
    }

    /// Private repository through a deploy key
    pub async fn create_private_deploy_key(&self, payload: &Value) -> Result<Created> {
        decode(
            self.client
                .post("applications/private-deploy-key", payload)
                .await?,
        )
    }

    pub async fn create_dockerfile(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("applications/dockerfile", payload).await?)
    }

    pub async fn create_docker_image(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("applications/dockerimage", payload).await?)
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("applications/{}", uuid), payload)
            .await
    }

    pub async fn delete(&self, uuid: &str, options: DeleteOptions) -> Result<()> {
        self.client
            .delete_with_query(&format!("applications/{}", uuid), &options.query())
            .await?;
        Ok(())
    }

    pub async fn start(&self, uuid: &str, force: bool, instant_deploy: bool) -> Result<Value> {
        self.client
            .action(
                &format!("applications/{}/start", uuid),
                &[
                    ("force", flag(force)),
                    ("instant_deploy", flag(instant_deploy)),
                ],
            )
            .await
    }

    pub async fn stop(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("applications/{}/stop", uuid), &[])
            .await
    }

    pub async fn restart(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("applications/{}/restart", uuid), &[])
            .await
    }

    /// Container logs, newest `lines` lines
    pub async fn logs(&self, uuid: &str, lines: usize) -> Result<String> {
        let value = self
            .client
            .get_with_query(
                &format!("applications/{}/logs", uuid),
                &[("lines", lines.to_string())],
            )
            .await?;
        Ok(match value {
            Value::String(s) => s,
            Value::Object(map) => map
                .get("logs")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        })
    }

    pub async fn envs(&self, uuid: &str) -> Result<Vec<EnvironmentVariable>> {
        decode_list(
            self.client
                .get(&format!("applications/{}/envs", uuid))
                .await?,
            "data",
        )
    }

    pub async fn create_env(&self, uuid: &str, env: &EnvVarInput) -> Result<Created> {
        decode(
            self.client
                .post(&format!("applications/{}/envs", uuid), &json!(env))
                .await?,
        )
    }

    pub async fn update_env(&self, uuid: &str, env: &EnvVarInput) -> Result<Value> {
        self.client
            .patch(&format!("applications/{}/envs", uuid), &json!(env))
            .await
    }

    /// Create or update many variables in one call
    pub async fn update_envs_bulk(&self, uuid: &str, envs: &[EnvVarInput]) -> Result<Value> {
        self.client
            .patch(
                &format!("applications/{}/envs/bulk", uuid),
                &json!({ "data": envs }),
            )
            .await
    }

    pub async fn delete_env(&self, uuid: &str, env_uuid: &str) -> Result<()> {
        self.client
            .delete(&format!("applications/{}/envs/{}", uuid, env_uuid))
            .await?;
        Ok(())
    }
}
