use crate::commands::deploy::wait_all;
use crate::context::AppContext;
use crate::prompt::ask_yes_no;
use colored::Colorize;
use coolflow_core::{DeploymentWatcher, rollback_target};

const HISTORY_SIZE: usize = 20;

pub async fn handle(
    ctx: &AppContext,
    uuid: Option<String>,
    deployment: Option<String>,
    yes: bool,
    wait: bool,
) -> anyhow::Result<()> {
    let app_uuid = ctx.application_uuid(uuid).await?;
    let app = ctx.client.applications().get(&app_uuid).await?;

    let target = match deployment {
        Some(deployment_uuid) => ctx.client.deployments().get(&deployment_uuid).await?,
        None => {
            let history = ctx
                .client
                .deployments()
                .for_application(&app_uuid, 0, HISTORY_SIZE)
                .await?;
            rollback_target(&history, app.git_commit_sha.as_deref().filter(|c| *c != "HEAD"))
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No earlier finished deployment with a different commit in the last {}",
                        HISTORY_SIZE
                    )
                })?
        }
    };

    println!("{}", format!("Rollback of {}", app.name).bold());
    println!("  Deployment: {}", target.deployment_uuid.cyan());
    println!("  Commit:     {}", target.short_commit().cyan());
    if let Some(message) = target.commit_message.as_deref() {
        println!("  Message:    {}", message.lines().next().unwrap_or(""));
    }

    if !yes && !ask_yes_no("Redeploy this commit?") {
        println!("{}", "Rollback cancelled".yellow());
        return Ok(());
    }

    let watcher = DeploymentWatcher::new(&ctx.client);
    let deployments = watcher.rollback(&app_uuid, &target).await?;
    for uuid in &deployments {
        println!("  ✓ Queued deployment {}", uuid.cyan());
    }

    if wait {
        wait_all(&watcher, &deployments).await?;
    }
    Ok(())
}
