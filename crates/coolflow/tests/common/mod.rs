#![allow(deprecated)]

use assert_cmd::Command;
use tempfile::TempDir;

const COOLIFY_VARS: &[&str] = &[
    "COOLIFY_URL",
    "COOLIFY_TOKEN",
    "COOLIFY_TEAM_ID",
    "COOLIFY_PROJECT_UUID",
    "COOLIFY_ENVIRONMENT",
    "COOLIFY_APPLICATION_UUID",
    "COOLIFY_DATABASE_UUID",
    "COOLIFY_REDIS_UUID",
    "COOLIFY_SERVER_UUID",
    "COOLIFY_CACHE_TTL",
    "COOLIFY_TIMEOUT",
    "COOLIFY_RETRY_TIMES",
    "COOLIFY_RETRY_SLEEP_MS",
];

/// Empty working directory plus a private config dir
pub struct TestWorkspace {
    pub workdir: TempDir,
    pub config_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            workdir: tempfile::tempdir().unwrap(),
            config_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// `cool` with no inherited Coolify settings and colours off
    pub fn cool(&self) -> Command {
        let mut cmd = Command::cargo_bin("cool").unwrap();
        cmd.current_dir(self.workdir.path())
            .env("COOLFLOW_CONFIG_DIR", self.config_dir.path())
            .env("NO_COLOR", "1");
        for var in COOLIFY_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Like [`cool`](Self::cool), pointed at a Coolify instance
    #[allow(dead_code)]
    pub fn cool_against(&self, url: &str) -> Command {
        let mut cmd = self.cool();
        cmd.env("COOLIFY_URL", url)
            .env("COOLIFY_TOKEN", "test-token")
            .env("COOLIFY_RETRY_TIMES", "0");
        cmd
    }
}
