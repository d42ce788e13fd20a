use super::{Created, DeleteOptions, decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{BackupExecution, Database, DatabaseKind, ScheduledBackup};
use serde_json::Value;

/// `/databases` endpoints, including scheduled backups
pub struct Databases<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Databases<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Database>> {
        decode_list(self.client.get("databases").await?, "databases")
    }

    pub async fn get(&self, uuid: &str) -> Result<Database> {
        decode(self.client.get(&format!("databases/{}", uuid)).await?)
    }

    /// `POST /databases/{kind}`; payload needs at least server, project and environment
    pub async fn create(&self, kind: DatabaseKind, payload: &Value) -> Result<Created> {
        decode(
            self.client
                .post(&format!("databases/{}", kind.as_str()), payload)
                .await?,
        )
    }

    pub async fn update(&self, uuid: &str, payload: &Value) -> Result<Value> {
        self.client
            .patch(&format!("databases/{}", uuid), payload)
            .await
    }

    pub async fn delete(&self, uuid: &str, options: DeleteOptions) -> Result<()> {
        self.client
            .delete_with_query(&format!("databases/{}", uuid), &options.query())
            .await?;
        Ok(())
    }

    pub async fn start(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("databases/{}/start", uuid), &[])
            .await
    }

    pub async fn stop(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("databases/{}/stop", uuid), &[])
            .await
    }

    pub async fn restart(&self, uuid: &str) -> Result<Value> {
        self.client
            .action(&format!("databases/{}/restart", uuid), &[])
            .await
    }

    pub async fn backups(&self, uuid: &str) -> Result<Vec<ScheduledBackup>> {
        decode_list(
            self.client
                .get(&format!("databases/{}/backups", uuid))
                .await?,
            "backups",
        )
    }

    pub async fn create_backup(&self, uuid: &str, payload: &Value) -> Result<Created> {
        decode(
            self.client
                .post(&format!("databases/{}/backups", uuid), payload)
                .await?,
        )
    }

    pub async fn update_backup(
        &self,
        uuid: &str,
        backup_uuid: &str,
        payload: &Value,
    ) -> Result<Value> {
        self.client
            .patch(
                &format!("databases/{}/backups/{}", uuid, backup_uuid),
                payload,
            )
            .await
    }

    pub async fn delete_backup(&self, uuid: &str, backup_uuid: &str) -> Result<()> {
        self.client
            .delete(&format!("databases/{}/backups/{}", uuid, backup_uuid))
            .await?;
        Ok(())
    }

    pub async fn backup_executions(
        &self,
        uuid: &str,
        backup_uuid: &str,
    ) -> Result<Vec<BackupExecution>> {
        decode_list(
            self.client
                .get(&format!(
                    "databases/{}/backups/{}/executions",
                    uuid, backup_uuid
                ))
                .await?,
            "executions",
        )
    }
}
