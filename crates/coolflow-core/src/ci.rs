//! GitHub Actions workflow generation

use crate::error::{CoreError, Result};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

pub const DEFAULT_WORKFLOW_PATH: &str = ".github/workflows/coolify-deploy.yml";

const WORKFLOW_TEMPLATE: &str = r#"name: Deploy to Coolify

on:
  push:
    branches:
      - {{ branch }}
  workflow_dispatch:

jobs:
  deploy:
    runs-on: ubuntu-latest
    steps:
      - name: Trigger Coolify deployment
        run: |
          curl --fail --silent --show-error \
            -H "Authorization: Bearer ${{ "{{" }} secrets.{{ token_secret }} {{ "}}" }}" \
            "{{ api_url }}/deploy?uuid={{ application_uuid }}&force={{ force }}"
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOptions {
    /// Coolify instance URL, with or without `/api/v1`
    pub coolify_url: String,
    pub application_uuid: String,
    pub branch: String,
    /// Name of the repository secret holding the API token
    pub token_secret: String,
    pub force: bool,
}

impl WorkflowOptions {
    pub fn new(coolify_url: impl Into<String>, application_uuid: impl Into<String>) -> Self {
        Self {
            coolify_url: coolify_url.into(),
            application_uuid: application_uuid.into(),
            branch: "main".to_string(),
            token_secret: "COOLIFY_TOKEN".to_string(),
            force: false,
        }
    }
}

/// Render the deploy workflow
pub fn render_workflow(options: &WorkflowOptions) -> Result<String> {
    if options.application_uuid.trim().is_empty() {
        return Err(CoreError::InvalidPlan(
            "application UUID is required for the CI workflow".into(),
        ));
    }

    let mut context = Context::new();
    context.insert(
        "api_url",
        &coolflow_client::normalize_base_url(&options.coolify_url),
    );
    context.insert("application_uuid", &options.application_uuid);
    context.insert("branch", &options.branch);
    context.insert("token_secret", &options.token_secret);
    context.insert("force", &options.force);

    let rendered = Tera::one_off(WORKFLOW_TEMPLATE, &context, false)?;
    Ok(rendered)
}

/// Write the workflow below `root`; an existing file is kept unless `overwrite`.
///
/// Returns the written path, or `None` when the file was kept.
pub fn write_workflow(
    root: &Path,
    relative: &Path,
    options: &WorkflowOptions,
    overwrite: bool,
) -> Result<Option<PathBuf>> {
    let path = root.join(relative);
    if path.exists() && !overwrite {
        tracing::info!("Workflow {} already exists, keeping it", path.display());
        return Ok(None);
    }

    let content = render_workflow(options)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    tracing::info!("Wrote workflow {}", path.display());
    Ok(Some(path))
}
