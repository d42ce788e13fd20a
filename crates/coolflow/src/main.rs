mod commands;
mod context;
mod prompt;
mod utils;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cool")]
#[command(about = "Deploy and operate Coolify applications from the terminal", long_about = None)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the API connection and store credentials in .env
    Install {
        /// Coolify instance URL
        #[arg(long)]
        url: Option<String>,
        /// API token
        #[arg(long)]
        token: Option<String>,
        /// Write credentials even when the API check fails
        #[arg(short, long)]
        force: bool,
    },
    /// Show application, database and deployment status
    Status {
        /// Application UUID (defaults to the discovered application)
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Trigger a deployment
    Deploy {
        /// Application UUID
        #[arg(long)]
        uuid: Option<String>,
        /// Rebuild without cache
        #[arg(short, long)]
        force: bool,
        /// Deploy every resource carrying this tag
        #[arg(long, conflicts_with = "uuid")]
        tag: Option<String>,
        /// Wait until the deployment finishes
        #[arg(short, long)]
        wait: bool,
    },
    /// Restart the application (or its database)
    Restart {
        /// Resource UUID
        #[arg(long)]
        uuid: Option<String>,
        /// Restart the database instead of the application
        #[arg(long)]
        database: bool,
    },
    /// Redeploy a previous commit
    Rollback {
        /// Application UUID
        #[arg(long)]
        uuid: Option<String>,
        /// Deployment to roll back to (defaults to the previous commit)
        #[arg(long)]
        deployment: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Wait until the deployment finishes
        #[arg(short, long)]
        wait: bool,
    },
    /// Show application logs
    Logs {
        /// Application UUID
        #[arg(long)]
        uuid: Option<String>,
        /// Number of lines
        #[arg(short = 'n', long, default_value = "100")]
        lines: usize,
        /// Keep polling for new lines
        #[arg(short, long)]
        follow: bool,
    },
    /// Delete a project and every resource in it
    Destroy {
        /// Project UUID (defaults to COOLIFY_PROJECT_UUID)
        #[arg(long)]
        project: Option<String>,
        /// Skip both confirmation prompts
        #[arg(long)]
        force: bool,
    },
    /// Create project, databases and application on a server
    Provision(commands::provision::ProvisionArgs),
    /// Write a GitHub Actions workflow that deploys on push
    SetupCi {
        /// Branch that triggers deployments
        #[arg(long, default_value = "main")]
        branch: String,
        /// Workflow file path
        #[arg(long, default_value = coolflow_core::ci::DEFAULT_WORKFLOW_PATH)]
        output: PathBuf,
        /// Overwrite an existing workflow
        #[arg(short, long)]
        force: bool,
    },
    /// Push local .env variables to the application
    Sync {
        /// Application UUID
        #[arg(long)]
        uuid: Option<String>,
        /// Source file
        #[arg(long, default_value = ".env")]
        file: PathBuf,
        /// Only these keys (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// Show what would be sent without sending
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage environment bookmarks
    #[command(subcommand)]
    Env(commands::env::EnvCommands),
    /// Query the Kick endpoint of the application
    Kick {
        /// Application UUID
        #[arg(long, global = true)]
        uuid: Option<String>,
        #[command(subcommand)]
        command: commands::kick::KickCommands,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    // commands that need no API configuration
    match command {
        Commands::Version => {
            println!("coolflow {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Install { url, token, force } => {
            return commands::install::handle(url, token, force).await;
        }
        Commands::Env(env_cmd) => {
            return commands::env::handle(env_cmd);
        }
        _ => {}
    }

    let ctx = context::AppContext::load()?;

    match command {
        Commands::Status { uuid } => commands::status::handle(&ctx, uuid).await,
        Commands::Deploy {
            uuid,
            force,
            tag,
            wait,
        } => commands::deploy::handle(&ctx, uuid, force, tag, wait).await,
        Commands::Restart { uuid, database } => {
            commands::restart::handle(&ctx, uuid, database).await
        }
        Commands::Rollback {
            uuid,
            deployment,
            yes,
            wait,
        } => commands::rollback::handle(&ctx, uuid, deployment, yes, wait).await,
        Commands::Logs {
            uuid,
            lines,
            follow,
        } => commands::logs::handle(&ctx, uuid, lines, follow).await,
        Commands::Destroy { project, force } => {
            commands::destroy::handle(&ctx, project, force).await
        }
        Commands::Provision(args) => commands::provision::handle(&ctx, args).await,
        Commands::SetupCi {
            branch,
            output,
            force,
        } => commands::setup_ci::handle(&ctx, branch, output, force).await,
        Commands::Sync {
            uuid,
            file,
            only,
            dry_run,
        } => commands::sync::handle(&ctx, uuid, file, only, dry_run).await,
        Commands::Kick { uuid, command } => commands::kick::handle(&ctx, uuid, command).await,
        Commands::Version | Commands::Install { .. } | Commands::Env(_) => {
            unreachable!("handled before loading the API configuration")
        }
    }
}
