use crate::context::AppContext;
use colored::Colorize;
use coolflow_client::EnvVarInput;
use coolflow_config::DotEnvFile;
use std::path::PathBuf;

/// Keys holding the CLI's own credentials and ids
const LOCAL_ONLY_PREFIX: &str = "COOLIFY_";

pub async fn handle(
    ctx: &AppContext,
    uuid: Option<String>,
    file: PathBuf,
    only: Vec<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("{} not found", file.display());
    }
    let env_file = DotEnvFile::open(&file)?;
    let envs = select(env_file.entries(), &only);

    if envs.is_empty() {
        println!("{}", "Nothing to sync".yellow());
        return Ok(());
    }

    let app_uuid = ctx.application_uuid(uuid).await?;
    println!(
        "{}",
        format!(
            "Syncing {} variable(s) from {} to {}",
            envs.len(),
            file.display(),
            app_uuid
        )
        .bold()
    );
    for env in &envs {
        println!("  • {}", env.key.cyan());
    }

    if dry_run {
        println!("{}", "Dry run, nothing was sent".dimmed());
        return Ok(());
    }

    ctx.client
        .applications()
        .update_envs_bulk(&app_uuid, &envs)
        .await?;
    println!("{}", "✓ Variables updated, redeploy to apply them".green());
    Ok(())
}

fn select(entries: &[(String, String)], only: &[String]) -> Vec<EnvVarInput> {
    entries
        .iter()
        .filter(|(key, _)| !key.starts_with(LOCAL_ONLY_PREFIX))
        .filter(|(key, _)| only.is_empty() || only.iter().any(|k| k == key))
        .map(|(key, value)| EnvVarInput::new(key, value))
        .collect()
}
