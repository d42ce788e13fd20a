use crate::context::AppContext;
use colored::Colorize;
use coolflow_client::DeploymentStatus;
use coolflow_core::{DeploymentWatcher, PollPolicy, WaitOutcome};

pub async fn handle(
    ctx: &AppContext,
    uuid: Option<String>,
    force: bool,
    tag: Option<String>,
    wait: bool,
) -> anyhow::Result<()> {
    let watcher = DeploymentWatcher::new(&ctx.client);

    let deployments = match tag {
        Some(tag) => {
            println!("{}", format!("Deploying resources tagged '{}'...", tag).blue());
            watcher.trigger_tag(&tag, force).await?
        }
        None => {
            let app_uuid = ctx.application_uuid(uuid).await?;
            println!("{}", format!("Deploying {}...", app_uuid).blue());
            watcher.trigger(&app_uuid, force).await?
        }
    };

    if deployments.is_empty() {
        println!("  ⚠ Coolify queued no deployment");
        return Ok(());
    }
    for uuid in &deployments {
        println!("  ✓ Queued deployment {}", uuid.cyan());
    }

    if wait {
        wait_all(&watcher, &deployments).await?;
    }
    Ok(())
}

/// Wait for each deployment; any non-finished end is an error
pub async fn wait_all(
    watcher: &DeploymentWatcher<'_>,
    deployments: &[String],
) -> anyhow::Result<()> {
    let policy = PollPolicy::deployment();
    for uuid in deployments {
        println!();
        println!("{}", format!("Waiting for {}...", uuid).blue());
        match watcher.wait(uuid, &policy).await {
            WaitOutcome::Done(d) if d.status == DeploymentStatus::Finished => {
                println!("  ✓ Deployment finished ({})", d.short_commit());
            }
            WaitOutcome::Done(d) => {
                anyhow::bail!("Deployment {} ended as {}", uuid, d.status);
            }
            WaitOutcome::Exhausted {
                attempts,
                last_status,
            } => {
                let status = last_status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                anyhow::bail!(
                    "Deployment {} still {} after {} checks",
                    uuid,
                    status,
                    attempts
                );
            }
        }
    }
    Ok(())
}
