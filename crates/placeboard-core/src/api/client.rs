//! HTTP client for the placement analytics backend.
//!
//! This module provides the `ApiClient` struct, which fetches the aggregate
//! resources served by the cache. The bearer token lives in memory only; it
//! is never handed to the durable store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiError, ResourceFetcher};
use crate::kinds::ResourceKind;
use crate::models::ResourceData;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow aggregate queries while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the analytics backend.
/// Clone is cheap - reqwest::Client and the token are both Arc-backed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token: None,
        })
    }

    /// Same client and connection pool, authenticated with `token`
    pub fn with_token(&self, token: impl Into<Arc<str>>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: Arc::clone(&self.base_url),
            token: Some(token.into()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Path of the endpoint serving `kind`
    fn endpoint(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Companies => "/companies",
            ResourceKind::Years => "/years",
            ResourceKind::Students => "/students",
            ResourceKind::AllStudents => "/students/all",
            ResourceKind::AllCompanies => "/companies/all",
            ResourceKind::Rounds => "/rounds",
            ResourceKind::Dashboard => "/dashboard",
        }
    }

    fn url_for(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.base_url, Self::endpoint(kind))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should
    /// retry), or Err for other errors.
    async fn check_response_for_retry(response: reqwest::Response) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response
                        .text()
                        .await
                        .with_context(|| format!("Failed to read response body from {}", url))?;
                    return serde_json::from_str(&text)
                        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl ResourceFetcher for ApiClient {
    async fn fetch(&self, kind: ResourceKind) -> Result<ResourceData> {
        let url = self.url_for(kind);
        debug!(kind = %kind, url = %url, "Fetching resource");

        let data = match kind {
            ResourceKind::Companies => ResourceData::Companies(self.get(&url).await?),
            ResourceKind::Years => ResourceData::Years(self.get(&url).await?),
            ResourceKind::Students => ResourceData::Students(self.get(&url).await?),
            ResourceKind::AllStudents => ResourceData::AllStudents(self.get(&url).await?),
            ResourceKind::AllCompanies => ResourceData::AllCompanies(self.get(&url).await?),
            ResourceKind::Rounds => ResourceData::Rounds(self.get(&url).await?),
            ResourceKind::Dashboard => ResourceData::Dashboard(self.get(&url).await?),
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let api = ApiClient::new("https://placements.example.edu/api/").unwrap();
        assert_eq!(
            api.url_for(ResourceKind::AllStudents),
            "https://placements.example.edu/api/students/all"
        );
        assert_eq!(api.url_for(ResourceKind::Years), "https://placements.example.edu/api/years");
    }

    #[test]
    fn test_every_kind_has_distinct_endpoint() {
        let mut endpoints: Vec<&str> = ResourceKind::ALL.iter().map(|k| ApiClient::endpoint(*k)).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_with_token_sets_auth_header() {
        let api = ApiClient::new("http://localhost:8000").unwrap();
        assert!(!api.has_token());
        assert!(api.auth_headers().unwrap().get(header::AUTHORIZATION).is_none());

        let authed = api.with_token("abc");
        assert!(authed.has_token());
        assert_eq!(
            authed.auth_headers().unwrap().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }
}
