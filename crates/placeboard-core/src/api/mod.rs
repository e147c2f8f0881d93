//! Network access to the placement analytics backend.
//!
//! This module provides the `ResourceFetcher` seam the cache manager pulls
//! through, and `ApiClient`, its HTTP implementation.
//!
//! Retries belong here, not in the cache: the client retries rate-limited
//! requests with exponential backoff and nothing else.

pub mod client;
pub mod error;

use anyhow::Result;
use async_trait::async_trait;

use crate::kinds::ResourceKind;
use crate::models::ResourceData;

pub use client::ApiClient;
pub use error::ApiError;

/// Source of fresh resource data.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + 'static {
    /// Fetch and parse the payload for `kind`
    async fn fetch(&self, kind: ResourceKind) -> Result<ResourceData>;
}
