//! Project discovery
//!
//! Resolves the "current" application, database, redis and server of a
//! project environment. An explicit override always wins and costs no
//! request; otherwise the first matching resource of the environment
//! payload is used.

use crate::error::{CoreError, Result};
use coolflow_client::{
    Application, CoolifyClient, Database, DatabaseKind, EnvironmentResources, TtlCache,
};
use coolflow_config::Settings;
use std::time::Duration;

/// UUIDs pinned by flags or settings; each kind wins independently
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOverrides {
    pub application: Option<String>,
    pub database: Option<String>,
    pub redis: Option<String>,
    pub server: Option<String>,
}

impl DiscoveryOverrides {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            application: settings.application_uuid.clone(),
            database: settings.database_uuid.clone(),
            redis: settings.redis_uuid.clone(),
            server: settings.server_uuid.clone(),
        }
    }
}

const DATABASE_PREFERENCE: [DatabaseKind; 5] = [
    DatabaseKind::Postgresql,
    DatabaseKind::Mysql,
    DatabaseKind::Mariadb,
    DatabaseKind::Mongodb,
    DatabaseKind::Clickhouse,
];

const REDIS_PREFERENCE: [DatabaseKind; 3] = [
    DatabaseKind::Redis,
    DatabaseKind::Dragonfly,
    DatabaseKind::Keydb,
];

pub struct ProjectDiscovery {
    client: CoolifyClient,
    project_uuid: Option<String>,
    environment: String,
    overrides: DiscoveryOverrides,
    cache: TtlCache<EnvironmentResources>,
}

impl ProjectDiscovery {
    /// `cache_ttl` of zero disables caching of the environment payload
    pub fn new(
        client: CoolifyClient,
        project_uuid: Option<String>,
        environment: impl Into<String>,
        overrides: DiscoveryOverrides,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            client,
            project_uuid,
            environment: environment.into(),
            overrides,
            cache: TtlCache::new(cache_ttl),
        }
    }

    pub fn from_settings(client: CoolifyClient, settings: &Settings) -> Self {
        Self {
            client,
            project_uuid: settings.project_uuid.clone(),
            environment: settings.environment().to_string(),
            overrides: DiscoveryOverrides::from_settings(settings),
            cache: TtlCache::from_secs(settings.cache_ttl_secs),
        }
    }

    pub fn project_uuid(&self) -> Option<&str> {
        self.project_uuid.as_deref()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Environment payload, failing when no project is configured
    pub async fn try_environment_resources(&self) -> Result<EnvironmentResources> {
        let project = self
            .project_uuid
            .as_deref()
            .ok_or(CoreError::MissingProject)?;
        let key = format!("{}:{}", project, self.environment);

        let resources = self
            .cache
            .get_or_try_insert_with(&key, || async {
                self.client
                    .projects()
                    .environment(project, &self.environment)
                    .await
            })
            .await?;
        Ok(resources)
    }

    /// Environment payload; failures are logged and yield `None`
    pub async fn environment_resources(&self) -> Option<EnvironmentResources> {
        match self.try_environment_resources().await {
            Ok(resources) => Some(resources),
            Err(e) => {
                tracing::warn!("Project discovery failed: {}", e);
                None
            }
        }
    }

    pub async fn application_uuid(&self) -> Option<String> {
        if let Some(uuid) = &self.overrides.application {
            return Some(uuid.clone());
        }
        let resources = self.environment_resources().await?;
        resources.applications.first().map(|a| a.uuid.clone())
    }

    pub async fn database_uuid(&self) -> Option<String> {
        if let Some(uuid) = &self.overrides.database {
            return Some(uuid.clone());
        }
        let resources = self.environment_resources().await?;
        pick_database(&resources).map(|db| db.uuid)
    }

    pub async fn redis_uuid(&self) -> Option<String> {
        if let Some(uuid) = &self.overrides.redis {
            return Some(uuid.clone());
        }
        let resources = self.environment_resources().await?;
        pick_redis(&resources).map(|db| db.uuid)
    }

    pub async fn server_uuid(&self) -> Option<String> {
        if let Some(uuid) = &self.overrides.server {
            return Some(uuid.clone());
        }
        let resources = self.environment_resources().await?;
        pick_server_uuid(&resources)
    }

    /// Details of the current application
    pub async fn application(&self) -> Option<Application> {
        let uuid = self.application_uuid().await?;
        match self.client.applications().get(&uuid).await {
            Ok(app) => Some(app),
            Err(e) => {
                tracing::warn!("Failed to load application {}: {}", uuid, e);
                None
            }
        }
    }

    /// Details of the current (non-redis) database
    pub async fn database(&self) -> Option<Database> {
        let uuid = self.database_uuid().await?;
        match self.client.databases().get(&uuid).await {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::warn!("Failed to load database {}: {}", uuid, e);
                None
            }
        }
    }
}

/// Relational engines first, then any other non-redis database
pub fn pick_database(resources: &EnvironmentResources) -> Option<Database> {
    DATABASE_PREFERENCE
        .into_iter()
        .find_map(|kind| resources.databases_of(kind).into_iter().next())
}

pub fn pick_redis(resources: &EnvironmentResources) -> Option<Database> {
    REDIS_PREFERENCE
        .into_iter()
        .find_map(|kind| resources.databases_of(kind).into_iter().next())
}

/// Server of the first application, else of the first database
pub fn pick_server_uuid(resources: &EnvironmentResources) -> Option<String> {
    if let Some(uuid) = resources.applications.iter().find_map(|app| app.server_uuid()) {
        return Some(uuid.to_string());
    }
    resources
        .databases()
        .iter()
        .find_map(|db| db.server_uuid().map(str::to_string))
}
