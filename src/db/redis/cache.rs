use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::error::AppResult;
use crate::models::{RecommendationSet, UserIdentity};

/// Namespaced cache keys.
///
/// Identities are normalized (lowercased, trimmed) at construction time, so
/// the rendered key is already canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Recommendations(UserIdentity),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recommendations(identity) => write!(f, "recs:{}", identity),
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key/value store for recommendation sets with per-entry expiry.
///
/// The store owns serialization in both directions. `get` is fail-closed:
/// an unreachable store or an entry that no longer deserializes degrades to
/// a miss, never to a caller-visible error. `set` reports its outcome so the
/// caller can decide how much to care; the serving path treats a failed
/// write as a logged non-event.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationCache: Send + Sync {
    /// Look up a cached recommendation set. `None` covers absent, expired,
    /// unreadable and unreachable alike.
    async fn get(&self, key: &CacheKey) -> Option<RecommendationSet>;

    /// Store a recommendation set under `key` for `ttl_secs` seconds. The
    /// value and expiry are written atomically.
    async fn set(&self, key: &CacheKey, value: &RecommendationSet, ttl_secs: u64)
        -> AppResult<()>;
}

/// Recommendation cache backed by Redis.
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
}

impl RedisCache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl RecommendationCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Option<RecommendationSet> {
        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Redis unreachable, treating lookup as cache miss");
                return None;
            }
        };

        let cached: Option<String> = match conn.get(key.to_string()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, %key, "Cache read failed, treating as miss");
                return None;
            }
        };

        match cached {
            Some(json) => match serde_json::from_str(&json) {
                Ok(set) => Some(set),
                Err(e) => {
                    // Poisoned entry: recompute rather than crash. TTL evicts it.
                    tracing::warn!(error = %e, %key, "Corrupt cache entry, treating as miss");
                    None
                }
            },
            None => None,
        }
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: &RecommendationSet,
        ttl_secs: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| crate::error::AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl_secs).await?;

        Ok(())
    }
}
