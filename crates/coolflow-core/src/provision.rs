//! Infrastructure provisioning
//!
//! Creates a project environment with an optional Postgres database, an
//! optional Redis-compatible cache and one application, then records the
//! created UUIDs in the local `.env`. Nothing is polled; Coolify builds and
//! starts the resources in the background.

use crate::error::{CoreError, Result};
use coolflow_client::{CoolifyClient, Created, DatabaseKind};
use coolflow_config::DotEnvFile;
use coolflow_config::settings::{
    ENV_APPLICATION_UUID, ENV_DATABASE_UUID, ENV_ENVIRONMENT, ENV_PROJECT_UUID, ENV_REDIS_UUID,
    ENV_SERVER_UUID,
};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectTarget {
    Existing(String),
    New {
        name: String,
        description: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseSpec {
    pub name: Option<String>,
    pub image: Option<String>,
    pub is_public: bool,
    pub public_port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Redis,
    Dragonfly,
}

impl CacheKind {
    pub fn database_kind(&self) -> DatabaseKind {
        match self {
            CacheKind::Redis => DatabaseKind::Redis,
            CacheKind::Dragonfly => DatabaseKind::Dragonfly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSpec {
    pub kind: CacheKind,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationSource {
    PublicRepository {
        repository: String,
        branch: String,
    },
    GitHubApp {
        github_app_uuid: String,
        repository: String,
        branch: String,
    },
    DockerImage {
        image: String,
        tag: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSpec {
    pub name: Option<String>,
    pub source: ApplicationSource,
    pub build_pack: String,
    pub ports_exposes: String,
    pub domains: Option<String>,
    pub instant_deploy: bool,
}

impl ApplicationSpec {
    pub fn new(source: ApplicationSource) -> Self {
        Self {
            name: None,
            source,
            build_pack: "nixpacks".to_string(),
            ports_exposes: "3000".to_string(),
            domains: None,
            instant_deploy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionPlan {
    pub server_uuid: String,
    pub project: ProjectTarget,
    pub environment: String,
    pub destination_uuid: Option<String>,
    pub database: Option<DatabaseSpec>,
    pub cache: Option<CacheSpec>,
    pub application: ApplicationSpec,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub project_uuid: String,
    pub project_created: bool,
    pub environment_created: bool,
    pub server_uuid: String,
    pub environment: String,
    pub database: Option<Created>,
    pub cache: Option<Created>,
    pub application: Created,
    pub written_keys: Vec<String>,
    pub skipped_keys: Vec<String>,
}

impl ProvisionReport {
    /// Key/value pairs to record in `.env`
    pub fn env_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (ENV_PROJECT_UUID, self.project_uuid.clone()),
            (ENV_SERVER_UUID, self.server_uuid.clone()),
            (ENV_APPLICATION_UUID, self.application.uuid.clone()),
        ];
        if let Some(db) = &self.database {
            pairs.push((ENV_DATABASE_UUID, db.uuid.clone()));
        }
        if let Some(cache) = &self.cache {
            pairs.push((ENV_REDIS_UUID, cache.uuid.clone()));
        }
        pairs.push((ENV_ENVIRONMENT, self.environment.clone()));
        pairs
    }
}

pub struct Provisioner<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    /// Create everything in `plan`; record the UUIDs in `env_file` when given
    pub async fn run(
        &self,
        plan: &ProvisionPlan,
        env_file: Option<&mut DotEnvFile>,
    ) -> Result<ProvisionReport> {
        validate(plan)?;

        let (project_uuid, project_created) = match &plan.project {
            ProjectTarget::Existing(uuid) => (uuid.clone(), false),
            ProjectTarget::New { name, description } => {
                let created = self
                    .client
                    .projects()
                    .create(name, description.as_deref())
                    .await?;
                tracing::info!("Created project {} ({})", name, created.uuid);
                (created.uuid, true)
            }
        };

        let environment_created = self.ensure_environment(&project_uuid, &plan.environment).await?;

        let database = match &plan.database {
            Some(spec) => Some(self.create_database(plan, &project_uuid, spec).await?),
            None => None,
        };
        let cache = match &plan.cache {
            Some(spec) => Some(self.create_cache(plan, &project_uuid, spec).await?),
            None => None,
        };
        let application = self.create_application(plan, &project_uuid).await?;

        let mut report = ProvisionReport {
            project_uuid,
            project_created,
            environment_created,
            server_uuid: plan.server_uuid.clone(),
            environment: plan.environment.clone(),
            database,
            cache,
            application,
            ..Default::default()
        };

        if let Some(env_file) = env_file {
            let (written, skipped) = env_file.set_missing(&report.env_pairs())?;
            report.written_keys = written;
            report.skipped_keys = skipped;
        }

        Ok(report)
    }

    /// Create the environment unless the project already has it
    async fn ensure_environment(&self, project_uuid: &str, environment: &str) -> Result<bool> {
        let project = self.client.projects().get(project_uuid).await?;
        if project.environment(environment).is_some() {
            return Ok(false);
        }

        self.client
            .projects()
            .create_environment(project_uuid, environment)
            .await?;
        tracing::info!("Created environment {} in project {}", environment, project_uuid);
        Ok(true)
    }

    fn base_payload(&self, plan: &ProvisionPlan, project_uuid: &str) -> Value {
        let mut payload = json!({
            "server_uuid": plan.server_uuid,
            "project_uuid": project_uuid,
            "environment_name": plan.environment,
        });
        if let Some(destination) = &plan.destination_uuid {
            payload["destination_uuid"] = json!(destination);
        }
        payload
    }

    async fn create_database(
        &self,
        plan: &ProvisionPlan,
        project_uuid: &str,
        spec: &DatabaseSpec,
    ) -> Result<Created> {
        let mut payload = self.base_payload(plan, project_uuid);
        payload["instant_deploy"] = json!(true);
        payload["is_public"] = json!(spec.is_public);
        if let Some(name) = &spec.name {
            payload["name"] = json!(name);
        }
        if let Some(image) = &spec.image {
            payload["image"] = json!(image);
        }
        if let Some(port) = spec.public_port {
            payload["public_port"] = json!(port);
        }

        let created = self
            .client
            .databases()
            .create(DatabaseKind::Postgresql, &payload)
            .await?;
        tracing::info!("Created postgresql database {}", created.uuid);
        Ok(created)
    }

    async fn create_cache(
        &self,
        plan: &ProvisionPlan,
        project_uuid: &str,
        spec: &CacheSpec,
    ) -> Result<Created> {
        let mut payload = self.base_payload(plan, project_uuid);
        payload["instant_deploy"] = json!(true);
        if let Some(name) = &spec.name {
            payload["name"] = json!(name);
        }

        let kind = spec.kind.database_kind();
        let created = self.client.databases().create(kind, &payload).await?;
        tracing::info!("Created {} cache {}", kind, created.uuid);
        Ok(created)
    }

    async fn create_application(
        &self,
        plan: &ProvisionPlan,
        project_uuid: &str,
    ) -> Result<Created> {
        let spec = &plan.application;
        let mut payload = self.base_payload(plan, project_uuid);
        payload["ports_exposes"] = json!(spec.ports_exposes);
        payload["instant_deploy"] = json!(spec.instant_deploy);
        if let Some(name) = &spec.name {
            payload["name"] = json!(name);
        }
        if let Some(domains) = &spec.domains {
            payload["domains"] = json!(domains);
        }

        let apps = self.client.applications();
        let created = match &spec.source {
            ApplicationSource::PublicRepository { repository, branch } => {
                payload["git_repository"] = json!(repository);
                payload["git_branch"] = json!(branch);
                payload["build_pack"] = json!(spec.build_pack);
                apps.create_public(&payload).await?
            }
            ApplicationSource::GitHubApp {
                github_app_uuid,
                repository,
                branch,
            } => {
                payload["github_app_uuid"] = json!(github_app_uuid);
                payload["git_repository"] = json!(repository);
                payload["git_branch"] = json!(branch);
                payload["build_pack"] = json!(spec.build_pack);
                apps.create_private_github_app(&payload).await?
            }
            ApplicationSource::DockerImage { image, tag } => {
                payload["docker_registry_image_name"] = json!(image);
                payload["docker_registry_image_tag"] = json!(tag.as_deref().unwrap_or("latest"));
                apps.create_docker_image(&payload).await?
            }
        };
        tracing::info!("Created application {}", created.uuid);
        Ok(created)
    }
}

fn validate(plan: &ProvisionPlan) -> Result<()> {
    if plan.server_uuid.trim().is_empty() {
        return Err(CoreError::InvalidPlan("server UUID is required".into()));
    }
    if plan.environment.trim().is_empty() {
        return Err(CoreError::InvalidPlan("environment name is required".into()));
    }
    match &plan.project {
        ProjectTarget::Existing(uuid) if uuid.trim().is_empty() => {
            return Err(CoreError::InvalidPlan("project UUID is empty".into()));
        }
        ProjectTarget::New { name, .. } if name.trim().is_empty() => {
            return Err(CoreError::InvalidPlan("project name is empty".into()));
        }
        _ => {}
    }
    match &plan.application.source {
        ApplicationSource::PublicRepository { repository, .. }
        | ApplicationSource::GitHubApp { repository, .. }
            if repository.trim().is_empty() =>
        {
            Err(CoreError::InvalidPlan("repository is required".into()))
        }
        ApplicationSource::DockerImage { image, .. } if image.trim().is_empty() => {
            Err(CoreError::InvalidPlan("docker image is required".into()))
        }
        _ => Ok(()),
    }
}
