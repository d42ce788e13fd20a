use clap::Subcommand;
use colored::Colorize;
use coolflow_config::{BookmarkStore, EnvironmentBookmark};

#[derive(Subcommand)]
pub enum EnvCommands {
    /// List saved environments
    List,
    /// Save or update an environment bookmark
    Add {
        /// Bookmark name
        name: String,
        /// Coolify environment name
        #[arg(long, default_value = coolflow_config::settings::DEFAULT_ENVIRONMENT)]
        environment: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        application: Option<String>,
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        redis: Option<String>,
        /// Make this the default environment
        #[arg(long)]
        default: bool,
    },
    /// Make an environment the default
    Use { name: String },
    /// Delete an environment bookmark
    Remove { name: String },
}

pub fn handle(command: EnvCommands) -> anyhow::Result<()> {
    let store = BookmarkStore::open_default()?;

    match command {
        EnvCommands::List => {
            let bookmarks = store.list()?;
            if bookmarks.is_empty() {
                println!("No saved environments. Add one with: cool env add <name>");
                return Ok(());
            }
            for bookmark in &bookmarks {
                print_bookmark(bookmark);
            }
        }
        EnvCommands::Add {
            name,
            environment,
            server,
            project,
            application,
            database,
            redis,
            default,
        } => {
            let mut bookmark = EnvironmentBookmark::new(name, environment);
            bookmark.server_uuid = server;
            bookmark.project_uuid = project;
            bookmark.application_uuid = application;
            bookmark.database_uuid = database;
            bookmark.redis_uuid = redis;
            bookmark.is_default = default;

            let saved = store.upsert(bookmark)?;
            println!("{}", format!("✓ Saved environment '{}'", saved.name).green());
            if saved.is_default {
                println!("  ℹ '{}' is the default environment", saved.name);
            }
        }
        EnvCommands::Use { name } => {
            let bookmark = store.set_default(&name)?;
            println!(
                "{}",
                format!("✓ '{}' is now the default environment", bookmark.name).green()
            );
        }
        EnvCommands::Remove { name } => {
            if store.remove(&name)? {
                println!("{}", format!("✓ Removed environment '{}'", name).green());
            } else {
                println!("{}", format!("⚠ No environment named '{}'", name).yellow());
            }
        }
    }
    Ok(())
}

fn print_bookmark(bookmark: &EnvironmentBookmark) {
    let marker = if bookmark.is_default { "*" } else { " " };
    println!(
        "{} {} ({})",
        marker.green().bold(),
        bookmark.name.bold(),
        bookmark.environment
    );
    let fields = [
        ("server", &bookmark.server_uuid),
        ("project", &bookmark.project_uuid),
        ("application", &bookmark.application_uuid),
        ("database", &bookmark.database_uuid),
        ("redis", &bookmark.redis_uuid),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("    {:<12} {}", label, value.dimmed());
        }
    }
}
