use crate::context::AppContext;
use crate::utils::{colored_status, or_dash, print_json};
use colored::Colorize;
use coolflow_client::{CoolifyClient, Team};
use coolflow_config::settings::ENV_TEAM_ID;

/// Team named by `COOLIFY_TEAM_ID`
async fn configured_team(client: &CoolifyClient, team_id: &str) -> anyhow::Result<Team> {
    let id: u64 = team_id.trim().parse().map_err(|_| {
        anyhow::anyhow!("{} must be a numeric team id, got '{}'", ENV_TEAM_ID, team_id)
    })?;
    Ok(client.teams().get(id).await?)
}

pub async fn handle(ctx: &AppContext, uuid: Option<String>) -> anyhow::Result<()> {
    if let Some(team_id) = ctx.settings.team_id.as_deref() {
        match configured_team(&ctx.client, team_id).await {
            Ok(team) => println!("{}", format!("Team: {} (#{})", team.name, team.id).dimmed()),
            Err(e) => println!("⚠ {}", e),
        }
    }

    let discovery = ctx.discovery();
    let app_uuid = ctx.application_uuid(uuid).await?;
    let app = ctx.client.applications().get(&app_uuid).await?;

    println!("{}", format!("Application: {}", app.name).bold());
    println!("  UUID:    {}", app.uuid.cyan());
    println!("  Status:  {}", colored_status(app.status_str()));
    println!("  Branch:  {}", or_dash(app.git_branch.as_deref()));
    for url in app.urls() {
        println!("  URL:     {}", url.cyan());
    }

    if let Some(db) = discovery.database().await {
        println!();
        println!("{}", format!("Database: {}", db.name).bold());
        println!("  UUID:    {}", db.uuid.cyan());
        println!("  Type:    {}", or_dash(db.database_type.as_deref()));
        println!("  Status:  {}", colored_status(db.status_str()));
    }

    if let Some(redis_uuid) = discovery.redis_uuid().await {
        match ctx.client.databases().get(&redis_uuid).await {
            Ok(redis) => {
                println!();
                println!("{}", format!("Cache: {}", redis.name).bold());
                println!("  UUID:    {}", redis.uuid.cyan());
                println!("  Status:  {}", colored_status(redis.status_str()));
            }
            Err(e) => tracing::warn!("Failed to load cache {}: {}", redis_uuid, e),
        }
    }

    println!();
    println!("{}", "Recent deployments:".bold());
    match ctx
        .client
        .deployments()
        .for_application(&app_uuid, 0, 5)
        .await
    {
        Ok(deployments) if deployments.is_empty() => println!("  (none)"),
        Ok(deployments) => {
            for d in deployments {
                println!(
                    "  {}  {}  {}  {}",
                    d.deployment_uuid.dimmed(),
                    colored_status(&d.status.to_string()),
                    d.short_commit(),
                    or_dash(d.created_at.as_deref())
                );
            }
        }
        Err(e) => println!("  ⚠ {}", e),
    }

    let kick = ctx.kick()?;
    if let Some(health) = kick.health(&app_uuid).await {
        println!();
        println!("{}", "Kick health:".bold());
        print_json(&health);
    }

    Ok(())
}
