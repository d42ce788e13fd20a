//! Resource repositories
//!
//! Each repository is a thin mapping from method calls to Coolify
//! endpoints, borrowed from a [`CoolifyClient`](crate::CoolifyClient).

mod applications;
mod databases;
mod deployments;
mod github_apps;
mod projects;
mod security_keys;
mod servers;
mod services;
mod teams;

pub use applications::Applications;
pub use databases::Databases;
pub use deployments::Deployments;
pub use github_apps::GitHubApps;
pub use projects::Projects;
pub use security_keys::SecurityKeys;
pub use servers::Servers;
pub use services::Services;
pub use teams::Teams;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of a create call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Created {
    pub uuid: String,
    pub domains: Option<String>,
    pub internal_db_url: Option<String>,
}

/// Environment variable create/update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvVarInput {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub is_literal: bool,
    #[serde(default)]
    pub is_multiline: bool,
    #[serde(default)]
    pub is_shown_once: bool,
}

impl EnvVarInput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// Cleanup flags for deleting applications, databases and services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    pub delete_configurations: bool,
    pub delete_volumes: bool,
    pub docker_cleanup: bool,
    pub delete_connected_networks: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            delete_configurations: true,
            delete_volumes: true,
            docker_cleanup: true,
            delete_connected_networks: true,
        }
    }
}

impl DeleteOptions {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("delete_configurations", self.delete_configurations.to_string()),
            ("delete_volumes", self.delete_volumes.to_string()),
            ("docker_cleanup", self.docker_cleanup.to_string()),
            (
                "delete_connected_networks",
                self.delete_connected_networks.to_string(),
            ),
        ]
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Decode a list that Coolify returns either bare or wrapped in `{field: [...]}`
pub(crate) fn decode_list<T: DeserializeOwned>(value: Value, field: &str) -> Result<Vec<T>> {
    match value {
        Value::Array(_) => decode(value),
        Value::Object(mut map) => match map.remove(field) {
            Some(inner) => decode(inner),
            None => Ok(Vec::new()),
        },
        Value::Null => Ok(Vec::new()),
        other => decode(other),
    }
}

pub(crate) fn flag(value: bool) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_shapes() {
        let bare: Vec<u32> = decode_list(json!([1, 2]), "items").unwrap();
        assert_eq!(bare, vec![1, 2]);

        let wrapped: Vec<u32> = decode_list(json!({"count": 1, "items": [3]}), "items").unwrap();
        assert_eq!(wrapped, vec![3]);

        let missing: Vec<u32> = decode_list(json!({"count": 0}), "items").unwrap();
        assert!(missing.is_empty());

        let null: Vec<u32> = decode_list(Value::Null, "items").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_delete_options_query() {
        let query = DeleteOptions {
            delete_volumes: false,
            ..Default::default()
        }
        .query();
        assert!(query.contains(&("delete_volumes", "false".to_string())));
        assert!(query.contains(&("docker_cleanup", "true".to_string())));
    }
}
