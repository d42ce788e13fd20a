//! Typed views of Coolify API payloads
//!
//! Coolify adds fields between releases, so every model ignores unknown
//! fields and defaults missing ones.

use serde::{Deserialize, Serialize};

/// Server reference nested under a destination
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerRef {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
}

/// Docker network destination a resource is deployed to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Destination {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub server: Option<ServerRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Application {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub fqdn: Option<String>,
    pub status: Option<String>,
    pub git_repository: Option<String>,
    pub git_branch: Option<String>,
    pub git_commit_sha: Option<String>,
    pub build_pack: Option<String>,
    pub ports_exposes: Option<String>,
    pub environment_id: Option<u64>,
    pub destination: Option<Destination>,
}

impl Application {
    /// Configured domains; `fqdn` is a comma separated list
    pub fn urls(&self) -> Vec<String> {
        self.fqdn
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect()
    }

    pub fn server_uuid(&self) -> Option<&str> {
        self.destination
            .as_ref()
            .and_then(|d| d.server.as_ref())
            .map(|s| s.uuid.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }
}

/// Database engines Coolify can provision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Postgresql,
    Mysql,
    Mariadb,
    Mongodb,
    Redis,
    Keydb,
    Dragonfly,
    Clickhouse,
}

impl DatabaseKind {
    pub const ALL: [DatabaseKind; 8] = [
        DatabaseKind::Postgresql,
        DatabaseKind::Mysql,
        DatabaseKind::Mariadb,
        DatabaseKind::Mongodb,
        DatabaseKind::Redis,
        DatabaseKind::Keydb,
        DatabaseKind::Dragonfly,
        DatabaseKind::Clickhouse,
    ];

    /// Path segment used by `POST /databases/{kind}`
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Postgresql => "postgresql",
            DatabaseKind::Mysql => "mysql",
            DatabaseKind::Mariadb => "mariadb",
            DatabaseKind::Mongodb => "mongodb",
            DatabaseKind::Redis => "redis",
            DatabaseKind::Keydb => "keydb",
            DatabaseKind::Dragonfly => "dragonfly",
            DatabaseKind::Clickhouse => "clickhouse",
        }
    }

    /// Parse `standalone-postgresql`, `postgresql`, ...
    pub fn from_type(value: &str) -> Option<Self> {
        let name = value.trim().to_ascii_lowercase();
        let name = name.strip_prefix("standalone-").unwrap_or(&name);
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            DatabaseKind::Postgresql | DatabaseKind::Mysql | DatabaseKind::Mariadb
        )
    }

    pub fn is_redis_like(&self) -> bool {
        matches!(
            self,
            DatabaseKind::Redis | DatabaseKind::Keydb | DatabaseKind::Dragonfly
        )
    }
}

impl std::fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Database {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub database_type: Option<String>,
    pub image: Option<String>,
    pub internal_db_url: Option<String>,
    pub public_port: Option<u16>,
    pub is_public: Option<bool>,
    pub environment_id: Option<u64>,
    pub destination: Option<Destination>,
}

impl Database {
    pub fn kind(&self) -> Option<DatabaseKind> {
        self.database_type.as_deref().and_then(DatabaseKind::from_type)
    }

    pub fn server_uuid(&self) -> Option<&str> {
        self.destination
            .as_ref()
            .and_then(|d| d.server.as_ref())
            .map(|s| s.uuid.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Service {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub environment_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Server {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub ip: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub is_reachable: Option<bool>,
    pub is_usable: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Environment {
    pub id: u64,
    pub uuid: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub environments: Vec<Environment>,
}

impl Project {
    pub fn environment_ids(&self) -> Vec<u64> {
        self.environments.iter().map(|e| e.id).collect()
    }

    pub fn environment(&self, name_or_uuid: &str) -> Option<&Environment> {
        self.environments
            .iter()
            .find(|e| e.name == name_or_uuid || e.uuid.as_deref() == Some(name_or_uuid))
    }
}

/// Payload of `GET /projects/{uuid}/{environment}`: every resource in one environment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentResources {
    pub id: Option<u64>,
    pub uuid: Option<String>,
    pub name: String,
    pub project_id: Option<u64>,
    pub applications: Vec<Application>,
    pub postgresqls: Vec<Database>,
    pub mysqls: Vec<Database>,
    pub mariadbs: Vec<Database>,
    pub mongodbs: Vec<Database>,
    pub redis: Vec<Database>,
    pub keydbs: Vec<Database>,
    pub dragonflies: Vec<Database>,
    pub clickhouses: Vec<Database>,
    pub services: Vec<Service>,
}

impl EnvironmentResources {
    /// Databases of one engine, with `database_type` filled in when the payload omitted it
    pub fn databases_of(&self, kind: DatabaseKind) -> Vec<Database> {
        let list = match kind {
            DatabaseKind::Postgresql => &self.postgresqls,
            DatabaseKind::Mysql => &self.mysqls,
            DatabaseKind::Mariadb => &self.mariadbs,
            DatabaseKind::Mongodb => &self.mongodbs,
            DatabaseKind::Redis => &self.redis,
            DatabaseKind::Keydb => &self.keydbs,
            DatabaseKind::Dragonfly => &self.dragonflies,
            DatabaseKind::Clickhouse => &self.clickhouses,
        };
        list.iter()
            .cloned()
            .map(|mut db| {
                if db.kind().is_none() {
                    db.database_type = Some(format!("standalone-{}", kind.as_str()));
                }
                db
            })
            .collect()
    }

    pub fn databases(&self) -> Vec<Database> {
        DatabaseKind::ALL
            .into_iter()
            .flat_map(|kind| self.databases_of(kind))
            .collect()
    }
}

/// Deployment queue status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeploymentStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "finished")]
    Finished,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "cancelled-by-user", alias = "cancelled")]
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Finished | DeploymentStatus::Failed | DeploymentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Queued => write!(f, "queued"),
            DeploymentStatus::InProgress => write!(f, "in progress"),
            DeploymentStatus::Finished => write!(f, "finished"),
            DeploymentStatus::Failed => write!(f, "failed"),
            DeploymentStatus::Cancelled => write!(f, "cancelled"),
            DeploymentStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Deployment {
    pub id: Option<u64>,
    pub deployment_uuid: String,
    pub application_id: Option<serde_json::Value>,
    pub application_name: Option<String>,
    pub server_name: Option<String>,
    pub status: DeploymentStatus,
    pub commit: Option<String>,
    pub commit_message: Option<String>,
    pub deployment_url: Option<String>,
    pub force_rebuild: Option<bool>,
    pub rollback: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Deployment {
    /// Short commit hash for display
    pub fn short_commit(&self) -> &str {
        match self.commit.as_deref() {
            Some(c) => c.get(..7).unwrap_or(c),
            None => "-",
        }
    }
}

/// One entry of the `GET /deploy` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeployTrigger {
    pub message: String,
    pub resource_uuid: String,
    pub deployment_uuid: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentVariable {
    pub uuid: String,
    pub key: String,
    pub value: Option<String>,
    pub is_preview: bool,
    pub is_literal: bool,
    pub is_multiline: bool,
    pub is_shown_once: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub personal_team: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamMember {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubApp {
    pub id: u64,
    pub uuid: String,
    pub name: String,
    pub organization: Option<String>,
    pub api_url: Option<String>,
    pub html_url: Option<String>,
    pub app_id: Option<u64>,
    pub installation_id: Option<u64>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityKey {
    pub id: Option<u64>,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub public_key: Option<String>,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduledBackup {
    pub id: Option<u64>,
    pub uuid: String,
    pub enabled: bool,
    pub frequency: String,
    pub save_s3: bool,
    pub s3_storage_id: Option<u64>,
    pub database_backup_retention_amount_locally: Option<u32>,
    pub database_backup_retention_days_locally: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackupExecution {
    pub id: Option<u64>,
    pub uuid: String,
    pub status: String,
    pub message: Option<String>,
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub created_at: Option<String>,
}
