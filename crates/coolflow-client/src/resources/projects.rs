use super::{Created, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{Environment, EnvironmentResources, Project};
use serde_json::{Value, json};

/// `/projects` endpoints and their environments
pub struct Projects<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Projects<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Project>> {
        decode_list(self.client.get("projects").await?, "projects")
    }

    /// Project with its environments
    pub async fn get(&self, uuid: &str) -> Result<Project> {
        decode(self.client.get(&format!("projects/{}", uuid)).await?)
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Created> {
        let mut body = json!({ "name": name });
        if let Some(desc) = description {
            body["description"] = json!(desc);
        }
        decode(self.client.post("projects", &body).await?)
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("projects/{}", uuid), payload)
            .await
    }

    /// Fails server-side while the project still owns resources
    pub async fn delete(&self, uuid: &str) -> Result<()> {
        self.client.delete(&format!("projects/{}", uuid)).await?;
        Ok(())
    }

    pub async fn environments(&self, uuid: &str) -> Result<Vec<Environment>> {
        decode_list(
            self.client
                .get(&format!("projects/{}/environments", uuid))
                .await?,
            "environments",
        )
    }

    /// Every resource of one environment (`name_or_uuid` accepts either)
    pub async fn environment(
        &self,
        uuid: &str,
        name_or_uuid: &str,
    ) -> Result<EnvironmentResources> {
        decode(
            self.client
                .get(&format!("projects/{}/{}", uuid, name_or_uuid))
                .await?,
        )
    }

    pub async fn create_environment(&self, uuid: &str, name: &str) -> Result<Created> {
        decode(
            self.client
                .post(
                    &format!("projects/{}/environments", uuid),
                    &json!({ "name": name }),
                )
                .await?,
        )
    }

    pub async fn delete_environment(&self, uuid: &str, name_or_uuid: &str) -> Result<()> {
        self.client
            .delete(&format!("projects/{}/environments/{}", uuid, name_or_uuid))
            .await?;
        Ok(())
    }
}
