use anyhow::Context as _;
use coolflow_client::{ClientConfig, CoolifyClient};
use coolflow_config::{BookmarkStore, Settings};
use coolflow_core::ProjectDiscovery;
use coolflow_kick::{KickClient, KickOptions};
use std::time::Duration;

/// Settings and API client shared by the API commands
pub struct AppContext {
    pub settings: Settings,
    pub client: CoolifyClient,
}

impl AppContext {
    /// `.env` → process env → default bookmark
    pub fn load() -> anyhow::Result<Self> {
        coolflow_config::load_dotenv()?;
        let mut settings = Settings::from_env()?;

        match BookmarkStore::open_default().and_then(|store| store.default()) {
            Ok(Some(bookmark)) => {
                tracing::debug!("Using default environment bookmark '{}'", bookmark.name);
                settings.apply_bookmark(&bookmark);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring environment bookmarks: {}", e),
        }

        let client = client_from(&settings)?;
        Ok(Self { settings, client })
    }

    pub fn discovery(&self) -> ProjectDiscovery {
        ProjectDiscovery::from_settings(self.client.clone(), &self.settings)
    }

    /// Flag value, else the discovered application
    pub async fn application_uuid(&self, flag: Option<String>) -> anyhow::Result<String> {
        if let Some(uuid) = flag {
            return Ok(uuid);
        }
        self.discovery().application_uuid().await.context(concat!(
            "No application found. ",
            "Pass --uuid or set COOLIFY_APPLICATION_UUID / COOLIFY_PROJECT_UUID"
        ))
    }

    pub fn kick(&self) -> anyhow::Result<KickClient> {
        let options = KickOptions {
            timeout: self.settings.kick_timeout,
            cache_ttl: Duration::from_secs(self.settings.kick_cache_ttl_secs.max(0) as u64),
        };
        Ok(KickClient::new(self.client.clone(), options)?)
    }
}

pub fn client_from(settings: &Settings) -> anyhow::Result<CoolifyClient> {
    let (url, token) = settings.credentials()?;
    let config = ClientConfig::new(url, token)
        .with_timeout(settings.timeout)
        .with_retry(settings.retry_times, settings.retry_sleep)
        .with_cache_ttl(Duration::from_secs(settings.cache_ttl_secs.max(0) as u64));
    Ok(CoolifyClient::new(config)?)
}
