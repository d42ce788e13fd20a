use super::{decode, decode_list, flag};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{DeployTrigger, Deployment};
use serde_json::Value;

/// `/deployments` and `/deploy` endpoints
pub struct Deployments<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Deployments<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    /// Currently running deployments
    pub async fn all(&self) -> Result<Vec<Deployment>> {
        decode_list(self.client.get("deployments").await?, "deployments")
    }

    pub async fn get(&self, uuid: &str) -> Result<Deployment> {
        decode(self.client.get(&format!("deployments/{}", uuid)).await?)
    }

    /// Deployment history of one application, newest first
    pub async fn for_application(
        &self,
        app_uuid: &str,
        skip: usize,
        take: usize,
    ) -> Result<Vec<Deployment>> {
        decode_list(
            self.client
                .get_with_query(
                    &format!("deployments/applications/{}", app_uuid),
                    &[("skip", skip.to_string()), ("take", take.to_string())],
                )
                .await?,
            "deployments",
        )
    }

    /// Queue a deployment for a resource UUID (comma separated for several)
    pub async fn deploy(&self, uuid: &str, force: bool) -> Result<Vec<DeployTrigger>> {
        let value = self
            .client
            .trigger("deploy", &[("uuid", uuid.to_string()), ("force", flag(force))])
            .await?;
        decode_list(value, "deployments")
    }

    /// Queue deployments for every resource carrying `tag`
    pub async fn deploy_tag(&self, tag: &str, force: bool) -> Result<Vec<DeployTrigger>> {
        let value = self
            .client
            .trigger("deploy", &[("tag", tag.to_string()), ("force", flag(force))])
            .await?;
        decode_list(value, "deployments")
    }

    pub async fn cancel(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("deployments/{}/cancel", uuid), &[])
            .await
    }
}
