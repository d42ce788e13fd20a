//! Append-only access to a project `.env` file
//!
//! Existing keys are never overwritten; new keys are appended at the end
//! of the file.

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DotEnvFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl DotEnvFile {
    /// Read the file; a missing file is treated as empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries = Vec::new();
        if path.exists() {
            for item in dotenvy::from_path_iter(&path)? {
                entries.push(item?);
            }
        }
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in file order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append the pairs whose key is not in the file yet.
    ///
    /// Returns `(written, skipped)` key lists.
    pub fn set_missing<K, V>(&mut self, pairs: &[(K, V)]) -> Result<(Vec<String>, Vec<String>)>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut written = Vec::new();
        let mut skipped = Vec::new();
        let mut block = String::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if self.contains(key) || written.iter().any(|k| k == key) {
                skipped.push(key.to_string());
                continue;
            }
            block.push_str(&format!("{}={}\n", key, quote(value)));
            written.push(key.to_string());
            self.entries.push((key.to_string(), value.to_string()));
        }

        if !block.is_empty() {
            let needs_newline = fs::read_to_string(&self.path)
                .map(|content| !content.is_empty() && !content.ends_with('\n'))
                .unwrap_or(false);
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            if needs_newline {
                file.write_all(b"\n")?;
            }
            file.write_all(block.as_bytes())?;
            tracing::info!("Wrote {} key(s) to {}", written.len(), self.path.display());
        }

        Ok((written, skipped))
    }
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@,+=".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
