//! Environment bookmarks
//!
//! Named sets of Coolify UUIDs stored in `<config_dir>/environments.json`.
//! At most one bookmark is the default one; it fills settings that the
//! environment leaves unset.

use crate::error::{ConfigError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const BOOKMARKS_VERSION: u32 = 1;
pub const BOOKMARKS_FILE: &str = "environments.json";
const BOOKMARKS_BACKUP: &str = "environments.json.backup";
const BOOKMARKS_TMP: &str = "environments.json.tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentBookmark {
    pub name: String,

    /// Coolify environment name inside the project
    pub environment: String,

    #[serde(default)]
    pub server_uuid: Option<String>,
    #[serde(default)]
    pub project_uuid: Option<String>,
    #[serde(default)]
    pub application_uuid: Option<String>,
    #[serde(default)]
    pub database_uuid: Option<String>,
    #[serde(default)]
    pub redis_uuid: Option<String>,

    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnvironmentBookmark {
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            environment: environment.into(),
            server_uuid: None,
            project_uuid: None,
            application_uuid: None,
            database_uuid: None,
            redis_uuid: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BookmarkFile {
    version: u32,
    updated_at: DateTime<Utc>,
    environments: Vec<EnvironmentBookmark>,
}

/// Reads and writes the bookmarks file.
///
/// Every mutating call is a full load → modify → save cycle.
pub struct BookmarkStore {
    dir: PathBuf,
}

impl BookmarkStore {
    /// Store inside `dir` (the file is `dir/environments.json`)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store inside the CoolFlow config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::get_config_dir()?))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(BOOKMARKS_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.dir.join(BOOKMARKS_BACKUP)
    }

    /// Load all bookmarks; a missing file is an empty list.
    ///
    /// When the file marks several defaults, only the first one is kept.
    pub fn load(&self) -> Result<Vec<EnvironmentBookmark>> {
        let path = self.path();
        if !path.exists() {
            tracing::debug!("Bookmark file not found, returning empty list");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let file: BookmarkFile = serde_json::from_str(&content)?;
        if file.version > BOOKMARKS_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: BOOKMARKS_VERSION,
            });
        }

        let mut bookmarks = file.environments;
        let mut seen_default = false;
        for bookmark in &mut bookmarks {
            if bookmark.is_default {
                if seen_default {
                    tracing::warn!("Ignoring extra default bookmark '{}'", bookmark.name);
                    bookmark.is_default = false;
                }
                seen_default = true;
            }
        }

        tracing::debug!("Loaded {} bookmarks", bookmarks.len());
        Ok(bookmarks)
    }

    pub fn save(&self, bookmarks: &[EnvironmentBookmark]) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path();
        if path.exists() {
            fs::copy(&path, self.backup_path())?;
        }

        let file = BookmarkFile {
            version: BOOKMARKS_VERSION,
            updated_at: Utc::now(),
            environments: bookmarks.to_vec(),
        };
        // the live file is only ever replaced whole
        let tmp = self.dir.join(BOOKMARKS_TMP);
        fs::write(&tmp, serde_json::to_string_pretty(&file)?)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Saved {} bookmarks", bookmarks.len());
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<EnvironmentBookmark>> {
        self.load()
    }

    pub fn get(&self, name: &str) -> Result<Option<EnvironmentBookmark>> {
        Ok(self.load()?.into_iter().find(|b| b.name == name))
    }

    pub fn default(&self) -> Result<Option<EnvironmentBookmark>> {
        Ok(self.load()?.into_iter().find(|b| b.is_default))
    }

    /// Insert or replace a bookmark by name.
    ///
    /// The first bookmark becomes the default. Replacing keeps the stored
    /// default flag and creation time unless the new one asks to be default.
    pub fn upsert(&self, mut bookmark: EnvironmentBookmark) -> Result<EnvironmentBookmark> {
        let mut bookmarks = self.load()?;
        bookmark.updated_at = Utc::now();

        match bookmarks.iter().position(|b| b.name == bookmark.name) {
            Some(index) => {
                let existing = &bookmarks[index];
                bookmark.created_at = existing.created_at;
                bookmark.is_default |= existing.is_default;
                bookmarks[index] = bookmark.clone();
            }
            None => {
                if bookmarks.is_empty() {
                    bookmark.is_default = true;
                }
                bookmarks.push(bookmark.clone());
            }
        }

        if bookmark.is_default {
            for b in bookmarks.iter_mut().filter(|b| b.name != bookmark.name) {
                b.is_default = false;
            }
        }

        self.save(&bookmarks)?;
        Ok(bookmark)
    }

    /// Remove a bookmark; returns whether it existed.
    ///
    /// Removing the default leaves no default.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut bookmarks = self.load()?;
        let before = bookmarks.len();
        bookmarks.retain(|b| b.name != name);
        if bookmarks.len() == before {
            return Ok(false);
        }
        self.save(&bookmarks)?;
        Ok(true)
    }

    /// Make `name` the only default bookmark
    pub fn set_default(&self, name: &str) -> Result<EnvironmentBookmark> {
        let mut bookmarks = self.load()?;
        if !bookmarks.iter().any(|b| b.name == name) {
            return Err(ConfigError::BookmarkNotFound(name.to_string()));
        }

        for b in &mut bookmarks {
            b.is_default = false;
        }
        let mut selected = None;
        for b in &mut bookmarks {
            if b.name == name {
                b.is_default = true;
                b.updated_at = Utc::now();
                selected = Some(b.clone());
            }
        }

        self.save(&bookmarks)?;
        selected.ok_or_else(|| ConfigError::BookmarkNotFound(name.to_string()))
    }
}
