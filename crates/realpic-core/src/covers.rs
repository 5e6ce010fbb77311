//! Cover image lookup over the Unsplash search API

use crate::collaborators::CoverImageSource;
use crate::error::CoverError;
use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Public Unsplash API
pub const UNSPLASH_API: &str = "https://api.unsplash.com";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    urls: ResultUrls,
}

#[derive(Deserialize)]
struct ResultUrls {
    small: String,
}

/// `GET /search/photos?query=..&per_page=1`, first result's small URL
#[derive(Debug, Clone)]
pub struct UnsplashCovers {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashCovers {
    #[must_use]
    pub fn new(access_key: impl Into<String>) -> Self {
        Self::with_base_url(UNSPLASH_API, access_key)
    }

    /// Against another host
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }
}

#[async_trait]
impl CoverImageSource for UnsplashCovers {
    async fn search(&self, query: &str) -> Result<Option<String>, CoverError> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("query", query), ("per_page", "1")])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoverError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().next().map(|r| r.urls.small))
    }
}

/// Memoizes successful lookups by query
#[derive(Clone)]
pub struct CachedCovers {
    inner: Arc<dyn CoverImageSource>,
    cache: Cache<String, Option<String>>,
}

impl CachedCovers {
    #[must_use]
    pub fn new(inner: Arc<dyn CoverImageSource>, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Entries expire after `ttl`
    #[must_use]
    pub fn with_ttl(inner: Arc<dyn CoverImageSource>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl std::fmt::Debug for CachedCovers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCovers")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CoverImageSource for CachedCovers {
    async fn search(&self, query: &str) -> Result<Option<String>, CoverError> {
        let key = query.trim().to_lowercase();
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }
        // Failures are not cached
        let found = self.inner.search(query).await?;
        self.cache.insert(key, found.clone()).await;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MockCoverImageSource;

    #[tokio::test]
    async fn cache_hits_skip_inner_source() {
        let mut inner = MockCoverImageSource::new();
        inner
            .expect_search()
            .times(1)
            .returning(|_| Ok(Some("https://images.example/beach.jpg".into())));

        let covers = CachedCovers::new(Arc::new(inner), 16);
        for query in ["Beach", "beach ", "BEACH"] {
            assert_eq!(
                covers.search(query).await.unwrap().as_deref(),
                Some("https://images.example/beach.jpg")
            );
        }
    }

    #[tokio::test]
    async fn failures_are_retried() {
        let mut inner = MockCoverImageSource::new();
        let mut seq = mockall::Sequence::new();
        inner
            .expect_search()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CoverError::Status(503)));
        inner
            .expect_search()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let covers = CachedCovers::new(Arc::new(inner), 16);
        assert!(covers.search("fog").await.is_err());
        assert_eq!(covers.search("fog").await.unwrap(), None);
    }
}
