use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::models::OwnerPreferences;
use crate::services::repository::{OwnerRepository, RepositoryError};

/// In-memory cache in front of an owner repository
///
/// Absent preferences are cached too; lookup errors are not.
pub struct CachedOwnerRepository {
    inner: Arc<dyn OwnerRepository>,
    cache: Cache<String, Option<OwnerPreferences>>,
}

impl CachedOwnerRepository {
    pub fn new(inner: Arc<dyn OwnerRepository>, max_entries: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    pub async fn invalidate(&self, owner_id: &str) {
        self.cache.invalidate(&CacheKey::preferences(owner_id)).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl OwnerRepository for CachedOwnerRepository {
    async fn get_preferences(
        &self,
        owner_id: &str,
    ) -> Result<Option<OwnerPreferences>, RepositoryError> {
        let key = CacheKey::preferences(owner_id);

        if let Some(cached) = self.cache.get(&key).await {
            tracing::trace!("Preferences cache hit: {}", key);
            return Ok(cached);
        }

        let preferences = self.inner.get_preferences(owner_id).await?;
        self.cache.insert(key, preferences.clone()).await;

        Ok(preferences)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for owner preferences
    pub fn preferences(owner_id: &str) -> String {
        format!("prefs:{}", owner_id)
    }
}
