//! Traits and site configuration shared by the harvesting components

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Configuration for the listing site being harvested
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL for the website, without a trailing slash
    pub base_url: String,
    /// Path of the paginated listing endpoint
    pub listing_path: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout handed to the HTTP transport
    pub timeout: Duration,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
}

/// CSS selectors for the parts of a listing page we read
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Result rows carrying an identifying attribute
    pub result_row: String,
    /// Attribute on a result row holding the record id
    pub id_attribute: String,
    /// Data cells within a row, excluding ignorable ones
    pub data_cell: String,
    /// Summary element whose second child holds the total result count
    pub result_summary: String,
    /// Pagination summary holding the total page count
    pub pagination_summary: String,
}

impl SiteConfig {
    /// Second-hand motorcycle listings on sahibinden.com
    pub fn sahibinden() -> Self {
        Self {
            base_url: "https://www.sahibinden.com".to_string(),
            listing_path: "/motosiklet/ikinci-el".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_string(),
            timeout: Duration::from_secs(30),
            selectors: SiteSelectors::default(),
        }
    }
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            result_row: "tr.searchResultsItem[data-id]".to_string(),
            id_attribute: "data-id".to_string(),
            data_cell: "td:not(.ignore-me)".to_string(),
            result_summary: ".result-text".to_string(),
            pagination_summary: ".mbdef".to_string(),
        }
    }
}

/// Source of raw page payloads.
///
/// Implemented by [`FetchClient`](crate::fetch::FetchClient) over HTTP and
/// by scripted fetchers in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `path` with `params` merged over the run's shared parameters
    ///
    /// # Arguments
    /// * `path` - Path relative to the site's base URL
    /// * `params` - Extra query parameters for this request only
    ///
    /// # Returns
    /// * `Result<String>` - Raw response body, or a network error
    async fn fetch(&self, path: &str, params: &[(&'static str, String)]) -> Result<String>;
}

/// Suspends the run for a pacing cooldown.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
