use crate::context::AppContext;
use crate::utils::print_json;
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value;

#[derive(Subcommand)]
pub enum KickCommands {
    /// Application health checks
    Health,
    /// Runtime statistics
    Stats,
    /// List log files, or read one
    Logs {
        /// Log file name
        file: Option<String>,
        /// Number of lines
        #[arg(short = 'n', long, default_value = "100")]
        lines: usize,
        /// Only lines containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Queue status
    Queue {
        /// Show failed jobs
        #[arg(long)]
        failed: bool,
        /// Maximum number of failed jobs
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// List allowed artisan commands, or run one
    Artisan {
        /// Command to run
        command: Option<String>,
    },
}

pub async fn handle(
    ctx: &AppContext,
    uuid: Option<String>,
    command: KickCommands,
) -> anyhow::Result<()> {
    let app_uuid = ctx.application_uuid(uuid).await?;
    let kick = ctx.kick()?;

    if !kick.is_available(&app_uuid).await {
        anyhow::bail!(
            "Kick is not configured for application {} (KICK_ENABLED / KICK_TOKEN)",
            app_uuid
        );
    }

    let result = match command {
        KickCommands::Health => kick.health(&app_uuid).await,
        KickCommands::Stats => kick.stats(&app_uuid).await,
        KickCommands::Logs {
            file: None, ..
        } => kick.logs(&app_uuid).await,
        KickCommands::Logs {
            file: Some(file),
            lines,
            search,
        } => {
            kick.log_lines(&app_uuid, &file, lines, search.as_deref())
                .await
        }
        KickCommands::Queue { failed: false, .. } => kick.queue(&app_uuid).await,
        KickCommands::Queue {
            failed: true,
            limit,
        } => kick.queue_failed(&app_uuid, limit).await,
        KickCommands::Artisan { command: None } => kick.artisan_commands(&app_uuid).await,
        KickCommands::Artisan {
            command: Some(command),
        } => {
            println!("{}", format!("Running `php artisan {}`...", command).dimmed());
            kick.run_artisan(&app_uuid, &command).await
        }
    };

    print_result(result);
    Ok(())
}

fn print_result(result: Option<Value>) {
    match result {
        Some(value) => print_json(&value),
        None => println!(
            "{}",
            "⚠ No response from Kick (run with -v for details)".yellow()
        ),
    }
}
