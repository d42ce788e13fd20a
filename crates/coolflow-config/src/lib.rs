pub mod bookmarks;
pub mod dotenv_file;
pub mod error;
pub mod settings;

pub use bookmarks::{BookmarkStore, EnvironmentBookmark};
pub use dotenv_file::DotEnvFile;
pub use error::*;
pub use settings::{Settings, load_dotenv};

use std::path::PathBuf;

const CONFIG_DIR_ENV: &str = "COOLFLOW_CONFIG_DIR";

/// CoolFlow config directory, created on demand.
///
/// `COOLFLOW_CONFIG_DIR` overrides `~/.config/coolflow`.
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join("coolflow"),
    };

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
