//! Caller-owned catalog cache with explicit TTL and awaitable refresh.
//!
//! The cache replaces the fire-and-forget background refresh pattern: there
//! is no unsupervised task and no process-global state. Callers construct a
//! [`CatalogCache`] around a [`CatalogSource`], decide when to await
//! [`CatalogCache::refresh`], and read possibly-stale snapshots without
//! blocking on network traffic. An early caller that has never refreshed
//! observes an empty catalog; callers needing freshness call
//! [`CatalogCache::force_refresh`].

use crate::catalog::InMemoryFeatureCatalog;
use crate::descriptor::FeatureDescriptor;
use crate::errors::ResolverResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

/// Default time-to-live for cached catalog data.
pub const DEFAULT_CATALOG_TTL_HOURS: i64 = 24;

/// Seam for loading the full descriptor set from a backing store.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every descriptor the source knows about.
    async fn load_features(&self) -> ResolverResult<Vec<FeatureDescriptor>>;
}

struct CacheState {
    features: Vec<FeatureDescriptor>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Read-mostly catalog cache guarded by a single coarse lock.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use feature_resolver::{
///     CatalogCache, CatalogSource, FeatureCatalog, FeatureDescriptor, ResolverResult,
/// };
///
/// struct StaticSource;
///
/// #[async_trait]
/// impl CatalogSource for StaticSource {
///     async fn load_features(&self) -> ResolverResult<Vec<FeatureDescriptor>> {
///         Ok(vec![FeatureDescriptor::new(
///             "rust",
///             "ghcr.io/devcontainers/features/rust",
///             "1",
///         )])
///     }
/// }
///
/// # async fn example() -> ResolverResult<()> {
/// let cache = CatalogCache::with_default_ttl(Box::new(StaticSource));
///
/// // Before the first refresh the snapshot is empty, not an error.
/// assert!(cache.snapshot().await.is_empty());
///
/// cache.refresh().await?;
/// assert_eq!(cache.snapshot().await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct CatalogCache {
    source: Box<dyn CatalogSource>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl CatalogCache {
    /// Create a cache with an explicit TTL.
    pub fn new(source: Box<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(CacheState {
                features: Vec::new(),
                refreshed_at: None,
            }),
        }
    }

    /// Create a cache with the default 24 hour TTL.
    pub fn with_default_ttl(source: Box<dyn CatalogSource>) -> Self {
        Self::new(source, Duration::hours(DEFAULT_CATALOG_TTL_HOURS))
    }

    /// Whether the cached data has passed its TTL (or was never loaded).
    pub async fn is_expired(&self) -> bool {
        let state = self.state.lock().await;
        match state.refreshed_at {
            None => true,
            Some(refreshed_at) => Utc::now() - refreshed_at >= self.ttl,
        }
    }

    /// Refresh from the source only when the TTL has lapsed.
    pub async fn refresh(&self) -> ResolverResult<()> {
        if self.is_expired().await {
            self.force_refresh().await?;
        } else {
            debug!("Catalog cache still fresh, skipping refresh");
        }
        Ok(())
    }

    /// Refresh from the source regardless of TTL.
    pub async fn force_refresh(&self) -> ResolverResult<()> {
        let features = self.source.load_features().await?;
        info!(count = features.len(), "Refreshed feature catalog cache");
        let mut state = self.state.lock().await;
        state.features = features;
        state.refreshed_at = Some(Utc::now());
        Ok(())
    }

    /// Current descriptors, possibly stale or empty. Never triggers I/O.
    pub async fn snapshot(&self) -> Vec<FeatureDescriptor> {
        self.state.lock().await.features.clone()
    }

    /// Current descriptors wrapped as a queryable catalog.
    pub async fn catalog(&self) -> InMemoryFeatureCatalog {
        InMemoryFeatureCatalog::new(self.snapshot().await)
    }
}
