//! # Rate Cache
//!
//! [`RateCache`] port with in-process and Redis backends.

pub mod in_memory;
pub mod redis_cache;
pub mod traits;

pub use in_memory::InMemoryRateCache;
pub use redis_cache::RedisRateCache;
pub use traits::{CacheError, CacheResult, RateCache};
