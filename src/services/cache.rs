use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::CacheSettings;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory TTL cache over JSON-serialized values
///
/// Shields the rate-limited public geocoding and Overpass endpoints from
/// repeat lookups. The scoring core never touches this; redundant calls
/// into the core are always safe.
pub struct CacheManager {
    entries: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    /// Get a value from cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(bytes) = self.entries.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from cache
    pub async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Number of live entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

/// One cache per response kind, each with its own TTL
///
/// Geocodes barely change, amenity data drifts slowly, AI analyses go
/// stale fastest.
pub struct Caches {
    pub geocode: CacheManager,
    pub amenities: CacheManager,
    pub analysis: CacheManager,
}

impl Caches {
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self {
            geocode: CacheManager::new(settings.capacity, settings.geocode_ttl_secs),
            amenities: CacheManager::new(settings.capacity, settings.amenities_ttl_secs),
            analysis: CacheManager::new(settings.capacity, settings.analysis_ttl_secs),
        }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a geocoded address
    pub fn geocode(address: &str) -> String {
        format!("geocode:{}", address.trim().to_lowercase())
    }

    /// Build a cache key for an amenity fetch
    pub fn amenities(lat: f64, lng: f64) -> String {
        format!("amenities:{:.5}:{:.5}", lat, lng)
    }

    /// Build a cache key for a site analysis
    pub fn analysis(address: &str) -> String {
        format!("analysis:{}", address.trim().to_lowercase())
    }
}
