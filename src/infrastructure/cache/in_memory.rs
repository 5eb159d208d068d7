//! # In-Memory Rate Cache
//!
//! Process-local [`RateCache`] backed by a `DashMap`. Expired entries are
//! dropped lazily on read, or in bulk with [`InMemoryRateCache::purge_expired`].

use crate::domain::entities::RateBundle;
use crate::infrastructure::cache::traits::{CacheResult, RateCache, decode, encode};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest TTL an entry is kept for, whatever the caller asks.
pub const MAX_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory implementation of [`RateCache`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryRateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.entries.len())
    }

    /// Removes everything.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl RateCache for InMemoryRateCache {
    async fn get(&self, fingerprint: &str) -> CacheResult<Option<RateBundle>> {
        let now = Instant::now();
        let payload = match self.entries.get(fingerprint) {
            Some(entry) if entry.is_fresh(now) => Some(entry.payload.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        match payload {
            Some(payload) => decode(&payload).map(Some),
            None => {
                self.entries
                    .remove_if(fingerprint, |_, entry| !entry.is_fresh(now));
                Ok(None)
            }
        }
    }

    async fn put(&self, fingerprint: &str, bundle: &RateBundle, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let entry = CacheEntry {
            payload: encode(bundle)?,
            expires_at: now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now),
        };
        self.entries.insert(fingerprint.to_string(), entry);
        Ok(())
    }
}
