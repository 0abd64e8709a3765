use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::models::ScraperOptions;
use crate::traits::{PageFetcher, SiteConfig};

/// HTTP client bound to one site and one set of run parameters.
#[derive(Clone)]
pub struct FetchClient {
    client: Client,
    base_url: String,
    base_params: Vec<(&'static str, String)>,
}

impl FetchClient {
    pub fn new(site: &SiteConfig, options: &ScraperOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&site.user_agent)
            .timeout(site.timeout)
            .build()
            .map_err(HarvestError::Client)?;

        Ok(Self {
            client,
            base_url: site.base_url.trim_end_matches('/').to_string(),
            base_params: options.base_params(),
        })
    }

    /// Render the absolute request URL for `path`.
    ///
    /// Per-request parameters override shared ones with the same name.
    pub fn build_url(&self, path: &str, params: &[(&'static str, String)]) -> String {
        let mut merged = self.base_params.clone();
        for (key, value) in params {
            match merged.iter_mut().find(|entry| entry.0 == *key) {
                Some(existing) => existing.1.clone_from(value),
                None => merged.push((*key, value.clone())),
            }
        }

        let query = merged
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{}?{}", self.base_url, path, query)
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn fetch(&self, path: &str, params: &[(&'static str, String)]) -> Result<String> {
        let url = self.build_url(path, params);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| HarvestError::Network {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HarvestError::Status {
                url,
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| HarvestError::Network { url, source })
    }
}
