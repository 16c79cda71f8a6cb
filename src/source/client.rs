//! HTTP client for the wiki

use super::DocumentSource;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the wiki client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Prefix every page name is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://rosettacode.org/wiki/".to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::VERSION)
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fetches wiki pages over HTTP
pub struct WikiClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl WikiClient {
    /// Create a new wiki client
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Fetch {
                page: config.base_url.clone(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { config, client })
    }

    /// Full URL of a named page
    pub fn page_url(&self, page: &str) -> String {
        format!("{}{}", self.config.base_url, page)
    }
}

#[async_trait::async_trait]
impl DocumentSource for WikiClient {
    async fn fetch(&self, page: &str) -> Result<Vec<u8>> {
        let url = self.page_url(page);
        tracing::info!("Fetching {}", url);

        let fetch_error = |reason: String| Error::Fetch {
            page: page.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(response.status().to_string()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;

        tracing::debug!("Fetched {} ({} bytes)", page, body.len());
        Ok(body.to_vec())
    }
}
