use crate::context::AppContext;
use anyhow::Context as _;
use colored::Colorize;

pub async fn handle(ctx: &AppContext, uuid: Option<String>, database: bool) -> anyhow::Result<()> {
    if database {
        let db_uuid = match uuid {
            Some(uuid) => uuid,
            None => ctx.discovery().database_uuid().await.context(
                "No database found. Pass --uuid or set COOLIFY_DATABASE_UUID",
            )?,
        };
        println!("{}", format!("Restarting database {}...", db_uuid).yellow());
        ctx.client.databases().restart(&db_uuid).await?;
        println!("  ✓ Restart requested");
        return Ok(());
    }

    let app_uuid = ctx.application_uuid(uuid).await?;
    println!("{}", format!("Restarting application {}...", app_uuid).yellow());
    ctx.client.applications().restart(&app_uuid).await?;
    println!("  ✓ Restart requested");
    Ok(())
}
