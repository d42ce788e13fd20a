use super::{Created, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::GitHubApp;
use serde_json::Value;

/// `/github-apps` endpoints
pub struct GitHubApps<'a> {
    client: &'a CoolifyClient,
}

impl<'a> GitHubApps<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<GitHubApp>> {
        decode_list(self.client.get("github-apps").await?, "github_apps")
    }

    pub async fn create(&self, payload: &Value) -> Result<Created> {
        decode(self.client.post("github-apps", payload).await?)
    }

    pub async fn update(&self, id: u64, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("github-apps/{}", id), payload)
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client.delete(&format!("github-apps/{}", id)).await?;
        Ok(())
    }

    /// Repositories the app installation can access
    pub async fn repositories(&self, id: u64) -> Result<Vec<Value>> {
        decode_list(
            self.client
                .get(&format!("github-apps/{}/repositories", id))
                .await?,
            "repositories",
        )
    }

    pub async fn branches(&self, id: u64, owner: &str, repo: &str) -> Result<Vec<Value>> {
        decode_list(
            self.client
                .get(&format!(
                    "github-apps/{}/repositories/{}/{}/branches",
                    id, owner, repo
                ))
                .await?,
            "branches",
        )
    }
}
