//! Image collaborators.
//!
//! The game core only needs two things from the media side: a URL for the
//! secret entry's cover image, and an obscured preview of it to hand out at
//! session start. Both are async and must never be awaited while a session
//! is locked.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::MediaError;
use crate::types::CatalogEntry;

/// 1x1 transparent GIF, used when there is nothing to obscure
pub const PLACEHOLDER_IMAGE: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

const RAWG_SEARCH_URL: &str = "https://api.rawg.io/api/games";

/// Resolves the cover image URL for an entry
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, entry: &CatalogEntry) -> Option<String>;
}

/// Produces an obscured preview for a session's secret image
#[async_trait]
pub trait ImageObscurer: Send + Sync {
    async fn obscure(&self, session_id: &str, image_url: &str) -> Result<String, MediaError>;
}

fn own_image(entry: &CatalogEntry) -> Option<String> {
    let url = entry.image_url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Uses whatever image the catalog already carries
#[derive(Debug, Default, Clone)]
pub struct CatalogImageResolver;

#[async_trait]
impl ImageResolver for CatalogImageResolver {
    async fn resolve(&self, entry: &CatalogEntry) -> Option<String> {
        own_image(entry)
    }
}

#[derive(Debug, Deserialize)]
struct RawgSearchResponse {
    #[serde(default)]
    results: Vec<RawgSearchResult>,
}

#[derive(Debug, Deserialize)]
struct RawgSearchResult {
    #[serde(default)]
    background_image: Option<String>,
}

/// Falls back to a RAWG name search when the catalog entry has no image
pub struct RawgImageResolver {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl RawgImageResolver {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            timeout: Duration::from_secs(3),
        }
    }

    async fn search(&self, name: &str) -> Result<Option<String>, MediaError> {
        let response = self
            .client
            .get(RAWG_SEARCH_URL)
            .query(&[("key", self.api_key.as_str()), ("search", name), ("page_size", "1")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Request(format!(
                "non-success status {}",
                response.status()
            )));
        }

        let parsed: RawgSearchResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .next()
            .and_then(|r| r.background_image)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()))
    }
}

#[async_trait]
impl ImageResolver for RawgImageResolver {
    async fn resolve(&self, entry: &CatalogEntry) -> Option<String> {
        if let Some(url) = own_image(entry) {
            return Some(url);
        }
        if self.api_key.is_empty() || entry.name.trim().is_empty() {
            return None;
        }

        match self.search(entry.name.trim()).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(entry_id = entry.id, "RAWG image lookup failed: {}", e);
                None
            }
        }
    }
}

/// Hands out the placeholder image instead of a real preview
#[derive(Debug, Default, Clone)]
pub struct PlaceholderObscurer;

#[async_trait]
impl ImageObscurer for PlaceholderObscurer {
    async fn obscure(&self, _session_id: &str, _image_url: &str) -> Result<String, MediaError> {
        Ok(PLACEHOLDER_IMAGE.to_string())
    }
}
