//! Core library for placeboard.
//!
//! Provides the pieces behind the placement analytics dashboard that do real
//! work outside the views:
//!
//! - `cache`: the resource cache manager (memory, durable store, network)
//! - `guard`: the storage guard that keeps auth material out of durable storage
//! - `store`: the durable key/value store abstraction
//! - `api`: the network resource fetcher
//! - `auth`: OS keychain storage for the bearer token
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod guard;
pub mod kinds;
pub mod models;
pub mod store;

pub use api::{ApiClient, ApiError, ResourceFetcher};
pub use cache::{CacheConfig, CacheError, CacheManager, CacheStatus};
pub use config::Config;
pub use guard::{GuardSink, GuardedStore, SweepReport, TracingSink};
pub use kinds::{InvalidateTarget, ResourceKind, RevalidationPolicy};
pub use models::ResourceData;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
