//! Deployment trigger, wait and rollback

use crate::error::Result;
use crate::poll::PollPolicy;
use coolflow_client::{CoolifyClient, Deployment, DeploymentStatus};
use serde_json::json;
use std::cell::RefCell;

#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// Reached `finished`, `failed` or `cancelled`
    Done(Deployment),
    /// Still running when the policy ran out
    Exhausted {
        attempts: u32,
        last_status: Option<DeploymentStatus>,
    },
}

pub struct DeploymentWatcher<'a> {
    client: &'a CoolifyClient,
}

impl<'a> DeploymentWatcher<'a> {
    pub fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    /// Queue a deployment; returns the deployment UUIDs
    pub async fn trigger(&self, app_uuid: &str, force: bool) -> Result<Vec<String>> {
        let triggers = self.client.deployments().deploy(app_uuid, force).await?;
        tracing::info!("Queued {} deployment(s) for {}", triggers.len(), app_uuid);
        Ok(triggers
            .into_iter()
            .map(|t| t.deployment_uuid)
            .filter(|uuid| !uuid.is_empty())
            .collect())
    }

    /// Queue deployments for every resource tagged `tag`
    pub async fn trigger_tag(&self, tag: &str, force: bool) -> Result<Vec<String>> {
        let triggers = self.client.deployments().deploy_tag(tag, force).await?;
        Ok(triggers
            .into_iter()
            .map(|t| t.deployment_uuid)
            .filter(|uuid| !uuid.is_empty())
            .collect())
    }

    /// Poll a deployment until it reaches a terminal status.
    ///
    /// Transient read failures are logged and count as an attempt.
    pub async fn wait(&self, deployment_uuid: &str, policy: &PollPolicy) -> WaitOutcome {
        let fresh = self.client.fresh();
        let last_status = RefCell::new(None);
        let (client, seen) = (&fresh, &last_status);

        let (outcome, done) = policy
            .find(move |attempt| async move {
                match client.deployments().get(deployment_uuid).await {
                    Ok(deployment) => {
                        tracing::debug!(attempt, status = %deployment.status, "deployment status");
                        *seen.borrow_mut() = Some(deployment.status.clone());
                        deployment.status.is_terminal().then_some(deployment)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read deployment {}: {}", deployment_uuid, e);
                        None
                    }
                }
            })
            .await;

        match done {
            Some(deployment) => WaitOutcome::Done(deployment),
            None => WaitOutcome::Exhausted {
                attempts: outcome.attempts(),
                last_status: last_status.into_inner(),
            },
        }
    }

    /// Pin the application to the commit of `target` and redeploy it
    pub async fn rollback(&self, app_uuid: &str, target: &Deployment) -> Result<Vec<String>> {
        if let Some(commit) = target.commit.as_deref() {
            self.client
                .applications()
                .update(app_uuid, &json!({ "git_commit_sha": commit }))
                .await?;
            tracing::info!("Pinned {} to commit {}", app_uuid, commit);
        }
        self.trigger(app_uuid, true).await
    }
}

/// Most recent finished deployment running a different commit.
///
/// `deployments` is newest first. Without `current_commit`, the commit of
/// the newest finished deployment is taken as the current one.
pub fn rollback_target<'d>(
    deployments: &'d [Deployment],
    current_commit: Option<&str>,
) -> Option<&'d Deployment> {
    let finished = || {
        deployments
            .iter()
            .filter(|d| d.status == DeploymentStatus::Finished)
            .filter(|d| d.commit.as_deref().is_some_and(|c| !c.is_empty()))
    };

    let current = match current_commit {
        Some(commit) => commit,
        None => finished().next()?.commit.as_deref()?,
    };

    finished().find(|d| d.commit.as_deref() != Some(current))
}
