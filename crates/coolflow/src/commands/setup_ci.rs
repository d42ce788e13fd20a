use crate::context::AppContext;
use colored::Colorize;
use coolflow_core::{WorkflowOptions, write_workflow};
use std::path::PathBuf;

pub async fn handle(
    ctx: &AppContext,
    branch: String,
    output: PathBuf,
    force: bool,
) -> anyhow::Result<()> {
    let app_uuid = ctx.application_uuid(None).await?;
    let (url, _) = ctx.settings.credentials()?;

    let mut options = WorkflowOptions::new(url, &app_uuid);
    options.branch = branch;

    let root = std::env::current_dir()?;
    match write_workflow(&root, &output, &options, force)? {
        Some(path) => {
            println!("{}", format!("✓ Wrote {}", path.display()).green());
            println!();
            println!("Add the API token as a repository secret:");
            println!(
                "  {}",
                format!("gh secret set {} --body <token>", options.token_secret).cyan()
            );
            println!(
                "Pushes to '{}' will deploy application {}",
                options.branch,
                app_uuid.cyan()
            );
        }
        None => {
            println!(
                "{}",
                format!(
                    "⚠ {} already exists, use --force to overwrite",
                    output.display()
                )
                .yellow()
            );
        }
    }
    Ok(())
}
