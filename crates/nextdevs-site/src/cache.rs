//! In-memory caching of remote API responses with moka.
//!
//! Each entry stores the serialized JSON of a response together with the time
//! it was cached, so repeated page views within the TTL never reach the
//! backend.
//!
//! ## Cache Keys
//!
//! Keys name the endpoint and every parameter that affects the response.
//! Only public data is cached; admin listings are fetched per request with
//! the caller's token.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::SiteError;

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// TTL for the public post listing.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Cache key of the public post listing.
pub const POSTS_KEY: &str = "blog_bulk";

/// Cached response with metadata.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    /// Serialized JSON response.
    pub json: String,
    /// When this entry was cached.
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Type alias for the response cache.
pub type ResponseCache = Cache<String, CachedEntry>;

/// Create a new response cache with default settings.
pub fn new_cache() -> ResponseCache {
    Cache::builder()
        .max_capacity(DEFAULT_CACHE_CAPACITY)
        .time_to_live(DEFAULT_TTL)
        .build()
}

/// Get a cached value or compute and cache it.
///
/// Errors from `compute` are returned as-is and never cached.
pub async fn get_or_compute<T, F, Fut>(
    cache: &ResponseCache,
    key: &str,
    compute: F,
) -> Result<T, SiteError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, SiteError>>,
{
    if let Some(entry) = cache.get(key).await {
        match serde_json::from_str(&entry.json) {
            Ok(value) => {
                tracing::debug!(key = %key, cached_at = %entry.cached_at, "cache hit");
                return Ok(value);
            }
            Err(e) => {
                // Corrupted entry; recompute
                tracing::warn!(key = %key, error = %e, "failed to deserialize cached entry");
            }
        }
    }

    tracing::debug!(key = %key, "cache miss, fetching");
    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(json) => {
            let entry = CachedEntry {
                json,
                cached_at: chrono::Utc::now(),
            };
            cache.insert(key.to_string(), entry).await;
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to serialize for cache");
        }
    }

    Ok(value)
}

/// Drop a cached entry after a mutation made it stale.
pub async fn invalidate(cache: &ResponseCache, key: &str) {
    cache.invalidate(key).await;
    tracing::debug!(key = %key, "cache entry invalidated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_hit() {
        let cache = new_cache();
        let key = "test_key";

        let result: i32 = get_or_compute(&cache, key, || async { Ok(42) })
            .await
            .unwrap();
        assert_eq!(result, 42);

        let result: i32 = get_or_compute(&cache, key, || async {
            panic!("compute should not be called on cache hit")
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let cache = new_cache();

        let err = get_or_compute::<i32, _, _>(&cache, "k", || async {
            Err(SiteError::NotFound("nope".to_string()))
        })
        .await;
        assert!(err.is_err());

        let result: i32 = get_or_compute(&cache, "k", || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let cache = new_cache();

        let _: i32 = get_or_compute(&cache, POSTS_KEY, || async { Ok(1) })
            .await
            .unwrap();
        invalidate(&cache, POSTS_KEY).await;

        let result: i32 = get_or_compute(&cache, POSTS_KEY, || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(result, 2);
    }

    #[tokio::test]
    async fn test_corrupted_entry_recomputed() {
        let cache = new_cache();
        cache
            .insert(
                "bad".to_string(),
                CachedEntry {
                    json: "{not json".to_string(),
                    cached_at: chrono::Utc::now(),
                },
            )
            .await;

        let result: i32 = get_or_compute(&cache, "bad", || async { Ok(5) })
            .await
            .unwrap();
        assert_eq!(result, 5);
    }
}
