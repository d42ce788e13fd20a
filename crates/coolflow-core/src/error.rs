use coolflow_client::ApiError;
use coolflow_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No project configured. Set COOLIFY_PROJECT_UUID or pass --project")]
    MissingProject,

    #[error("Failed to delete project {uuid}: {source}")]
    ProjectDeletion {
        uuid: String,
        #[source]
        source: ApiError,
    },

    #[error("Invalid provision plan: {0}")]
    InvalidPlan(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
