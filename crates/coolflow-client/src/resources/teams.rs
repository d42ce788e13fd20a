use super::{decode, decode_list};
use crate::client::CoolifyClient;
use crate::error::Result;
use crate::models::{Team, TeamMember};

/// `/teams` endpoints (read only)
pub struct Teams<'a> {
    client: &'a CoolifyClient,
}

impl<'a> Teams<'a> {
    pub(crate) fn new(client: &'a CoolifyClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Team>> {
        decode_list(self.client.get("teams").await?, "teams")
    }

    pub async fn get(&self, id: u64) -> Result<Team> {
        decode(self.client.get(&format!("teams/{}", id)).await?)
    }

    pub async fn members(&self, id: u64) -> Result<Vec<TeamMember>> {
        decode_list(
            self.client.get(&format!("teams/{}/members", id)).await?,
            "members",
        )
    }

    /// Team the API token belongs to
    pub async fn current(&self) -> Result<Team> {
        decode(self.client.get("teams/current").await?)
    }

    pub async fn current_members(&self) -> Result<Vec<TeamMember>> {
        decode_list(self.client.get("teams/current/members").await?, "members")
    }
}
