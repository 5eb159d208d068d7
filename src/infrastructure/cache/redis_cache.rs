//! # Redis Rate Cache
//!
//! Shared [`RateCache`] backed by Redis. Bundles are written with `SET … EX`
//! so Redis handles expiry; the TTL is rounded down to whole seconds with a
//! floor of one.

use crate::domain::entities::RateBundle;
use crate::infrastructure::cache::traits::{CacheError, CacheResult, RateCache, decode, encode};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::fmt;
use std::time::Duration;

/// Redis implementation of [`RateCache`].
#[derive(Clone)]
pub struct RedisRateCache {
    manager: ConnectionManager,
    url: String,
}

impl RedisRateCache {
    /// Connects to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Backend` if the URL is invalid or the initial
    /// connection fails.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url).map_err(|e| CacheError::backend(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(Self {
            manager,
            url: url.to_string(),
        })
    }
}

/// Whole seconds for a TTL, never zero.
#[must_use]
pub fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl fmt::Debug for RedisRateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisRateCache")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateCache for RedisRateCache {
    async fn get(&self, fingerprint: &str) -> CacheResult<Option<RateBundle>> {
        let mut conn = self.manager.clone();
        let payload: Option<String> = conn
            .get(fingerprint)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        payload.as_deref().map(decode).transpose()
    }

    async fn put(&self, fingerprint: &str, bundle: &RateBundle, ttl: Duration) -> CacheResult<()> {
        let payload = encode(bundle)?;
        let mut conn = self.manager.clone();
        let () = conn
            .set_ex(fingerprint, payload, ttl_seconds(ttl))
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }
}
