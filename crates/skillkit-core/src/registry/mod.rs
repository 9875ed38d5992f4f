//! Curated skill registry: shortcut names that resolve to fetchable locations.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::{Result, SkillError};

/// One registry listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySkill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    /// Repository pointer in `owner/repo[/subpath][#branch]` form.
    pub degit_path: String,
    /// Packaged archive location, preferred over `degit_path` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_path: Option<String>,
}

/// Registry lookups used by source resolution and download tracking.
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    async fn list(&self) -> Result<Vec<RegistrySkill>>;

    async fn get_by_name(&self, name: &str) -> Result<Option<RegistrySkill>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|skill| skill.name == name))
    }

    /// Record a download. Callers ignore failures.
    async fn track_download(&self, name: &str) -> Result<()>;
}

/// HTTP-backed registry client. The listing is fetched at most once per
/// client instance.
#[derive(Debug)]
pub struct RegistryClient {
    base_url: String,
    http: Client,
    listing: OnceCell<Vec<RegistrySkill>>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            listing: OnceCell::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_listing(&self) -> Result<Vec<RegistrySkill>> {
        let url = format!("{}/skills", self.base_url);
        tracing::debug!(%url, "fetching registry listing");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SkillError::Configuration(format!(
                "Registry listing at {url} returned {status}"
            )));
        }
        let mut skills: Vec<RegistrySkill> = response.json().await?;
        for skill in &mut skills {
            if let Some(zip_path) = skill.zip_path.as_mut() {
                *zip_path = self.absolute_url(zip_path);
            }
        }
        Ok(skills)
    }

    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl SkillRegistry for RegistryClient {
    async fn list(&self) -> Result<Vec<RegistrySkill>> {
        let listing = self
            .listing
            .get_or_try_init(|| self.fetch_listing())
            .await?;
        Ok(listing.clone())
    }

    async fn track_download(&self, name: &str) -> Result<()> {
        let url = format!("{}/skills/{}/downloads", self.base_url, name);
        let response = self.http.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SkillError::Configuration(format!(
                "Download tracking for '{name}' returned {status}"
            )));
        }
        Ok(())
    }
}

/// Fixed in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    skills: Vec<RegistrySkill>,
}

impl StaticRegistry {
    pub fn new(skills: Vec<RegistrySkill>) -> Self {
        Self { skills }
    }
}

#[async_trait]
impl SkillRegistry for StaticRegistry {
    async fn list(&self) -> Result<Vec<RegistrySkill>> {
        Ok(self.skills.clone())
    }

    async fn track_download(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}
