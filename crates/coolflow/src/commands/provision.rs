use crate::context::AppContext;
use crate::prompt::ask_yes_no;
use clap::Args;
use colored::Colorize;
use coolflow_config::DotEnvFile;
use coolflow_core::{
    ApplicationSource, ApplicationSpec, CacheKind, CacheSpec, DatabaseSpec, ProjectTarget,
    ProvisionPlan, Provisioner,
};

#[derive(Args)]
pub struct ProvisionArgs {
    /// Server UUID (defaults to COOLIFY_SERVER_UUID)
    #[arg(long)]
    server: Option<String>,
    /// Existing project UUID
    #[arg(long, conflicts_with = "project_name")]
    project: Option<String>,
    /// Create a new project with this name
    #[arg(long)]
    project_name: Option<String>,
    /// Environment name (defaults to COOLIFY_ENVIRONMENT)
    #[arg(long)]
    environment: Option<String>,
    /// Create a Postgres database
    #[arg(long)]
    with_postgres: bool,
    /// Create a Redis cache
    #[arg(long, conflicts_with = "with_dragonfly")]
    with_redis: bool,
    /// Create a Dragonfly cache
    #[arg(long)]
    with_dragonfly: bool,
    /// Git repository URL (public, or owner/repo with --github-app)
    #[arg(long)]
    repository: Option<String>,
    /// Git branch
    #[arg(long, default_value = "main")]
    branch: String,
    /// GitHub App UUID for private repositories
    #[arg(long, requires = "repository")]
    github_app: Option<String>,
    /// Docker image instead of a repository
    #[arg(long, conflicts_with_all = ["repository", "github_app"])]
    image: Option<String>,
    /// Application name
    #[arg(long)]
    name: Option<String>,
    /// Domains (comma separated, with scheme)
    #[arg(long)]
    domain: Option<String>,
    /// Exposed ports
    #[arg(long, default_value = "3000")]
    ports: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl ProvisionArgs {
    fn into_plan(self, ctx: &AppContext) -> anyhow::Result<ProvisionPlan> {
        let server_uuid = self
            .server
            .or_else(|| ctx.settings.server_uuid.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("Server UUID is required: pass --server or set COOLIFY_SERVER_UUID")
            })?;

        let project = match (self.project, self.project_name) {
            (Some(uuid), _) => ProjectTarget::Existing(uuid),
            (None, Some(name)) => ProjectTarget::New {
                name,
                description: None,
            },
            (None, None) => match &ctx.settings.project_uuid {
                Some(uuid) => ProjectTarget::Existing(uuid.clone()),
                None => anyhow::bail!("Pass --project <uuid> or --project-name <name>"),
            },
        };

        let source = match (self.image, self.github_app, self.repository) {
            (Some(image), _, _) => {
                let (image, tag) = split_image(&image);
                ApplicationSource::DockerImage { image, tag }
            }
            (None, Some(github_app_uuid), Some(repository)) => ApplicationSource::GitHubApp {
                github_app_uuid,
                repository,
                branch: self.branch,
            },
            (None, None, Some(repository)) => ApplicationSource::PublicRepository {
                repository,
                branch: self.branch,
            },
            _ => anyhow::bail!("Pass --repository or --image"),
        };

        let cache = if self.with_redis {
            Some(CacheKind::Redis)
        } else if self.with_dragonfly {
            Some(CacheKind::Dragonfly)
        } else {
            None
        };

        let mut application = ApplicationSpec::new(source);
        application.name = self.name;
        application.domains = self.domain;
        application.ports_exposes = self.ports;

        Ok(ProvisionPlan {
            server_uuid,
            project,
            environment: self
                .environment
                .unwrap_or_else(|| ctx.settings.environment().to_string()),
            destination_uuid: None,
            database: self.with_postgres.then(DatabaseSpec::default),
            cache: cache.map(|kind| CacheSpec { kind, name: None }),
            application,
        })
    }
}

/// `image:tag` → (image, tag); a port in the registry host is not a tag
fn split_image(reference: &str) -> (String, Option<String>) {
    match reference.rsplit_once(':') {
        Some((image, tag)) if !tag.contains('/') => (image.to_string(), Some(tag.to_string())),
        _ => (reference.to_string(), None),
    }
}

pub async fn handle(ctx: &AppContext, args: ProvisionArgs) -> anyhow::Result<()> {
    let yes = args.yes;
    let plan = args.into_plan(ctx)?;

    println!("{}", "Provisioning plan".bold());
    println!("  Server:      {}", plan.server_uuid.cyan());
    match &plan.project {
        ProjectTarget::Existing(uuid) => println!("  Project:     {}", uuid.cyan()),
        ProjectTarget::New { name, .. } => println!("  Project:     {} (new)", name.cyan()),
    }
    println!("  Environment: {}", plan.environment.cyan());
    if plan.database.is_some() {
        println!("  Database:    postgresql");
    }
    if let Some(cache) = &plan.cache {
        println!("  Cache:       {}", cache.kind.database_kind().as_str());
    }
    match &plan.application.source {
        ApplicationSource::PublicRepository { repository, branch }
        | ApplicationSource::GitHubApp {
            repository, branch, ..
        } => println!("  Application: {}@{}", repository.cyan(), branch),
        ApplicationSource::DockerImage { image, tag } => println!(
            "  Application: {}:{}",
            image.cyan(),
            tag.as_deref().unwrap_or("latest")
        ),
    }
    println!();

    if !yes && !ask_yes_no("Create these resources?") {
        println!("{}", "Provisioning cancelled".yellow());
        return Ok(());
    }

    let mut env_file = DotEnvFile::open(".env")?;
    let report = Provisioner::new(&ctx.client)
        .run(&plan, Some(&mut env_file))
        .await?;

    if report.project_created {
        println!("  ✓ Created project {}", report.project_uuid.cyan());
    }
    if report.environment_created {
        println!("  ✓ Created environment {}", report.environment.cyan());
    }
    if let Some(db) = &report.database {
        println!("  ✓ Created database {}", db.uuid.cyan());
    }
    if let Some(cache) = &report.cache {
        println!("  ✓ Created cache {}", cache.uuid.cyan());
    }
    println!("  ✓ Created application {}", report.application.uuid.cyan());
    if let Some(domains) = &report.application.domains {
        println!("    {}", domains);
    }

    println!();
    for key in &report.written_keys {
        println!("  ✓ {} written to .env", key.cyan());
    }
    for key in &report.skipped_keys {
        println!("  ℹ {} already in .env, kept as is", key.cyan());
    }

    println!();
    println!("{}", "Next: cool deploy --wait".bold());
    Ok(())
}
