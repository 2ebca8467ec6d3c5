//! Cache module for the Kitchin application
//!
//! This module provides the key/value store used for the query cache,
//! onboarding drafts, refresh sessions and the token blacklist. Redis is the
//! production backend; an in-process map backs tests and single-node runs.

use crate::error::CacheResult;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Seconds a cached query result stays fresh
    pub query_ttl_seconds: u64,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_QUERY_TTL`: Query cache TTL in seconds (default: 60)
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let query_ttl_seconds = std::env::var("REDIS_QUERY_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        RedisConfig {
            url,
            query_ttl_seconds,
        }
    }
}

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    pub fn new(config: &RedisConfig) -> CacheResult<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { client })
    }

    async fn get_connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    /// Set a key-value pair in Redis with optional TTL
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;

        if let Some(ttl) = ttl_seconds {
            let _: () = conn.set_ex(key, value, ttl).await?;
        } else {
            let _: () = conn.set(key, value).await?;
        }

        Ok(())
    }

    /// Get a value from Redis by key
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(key).await?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[derive(Debug)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

/// In-process store with the same contract as [`RedisPool`]
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        // Keys that are never read again would otherwise stay forever
        entries.retain(|_, entry| entry.expires_at.is_none_or(|at| now < at));
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: ttl_seconds.map(|ttl| now + Duration::from_secs(ttl)),
            },
        );
        Ok(())
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            Some(entry) => entry.expires_at.is_some_and(|at| Instant::now() >= at),
            None => return Ok(None),
        };

        if expired {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Which store a service should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Redis,
    Memory,
}

/// The store a service was configured with
#[derive(Clone)]
pub enum CacheBackend {
    Redis(RedisPool),
    Memory(MemoryCache),
}

impl CacheBackend {
    /// Build the configured store; Redis connections are opened lazily
    pub fn connect(kind: CacheKind, config: &RedisConfig) -> CacheResult<Self> {
        match kind {
            CacheKind::Redis => Ok(CacheBackend::Redis(RedisPool::new(config)?)),
            CacheKind::Memory => {
                warn!("Using the in-process cache store; state is not shared between instances");
                Ok(CacheBackend::Memory(MemoryCache::new()))
            }
        }
    }

    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(pool) => pool.set(key, value, ttl_seconds).await,
            CacheBackend::Memory(cache) => cache.set(key, value, ttl_seconds).await,
        }
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            CacheBackend::Redis(pool) => pool.get(key).await,
            CacheBackend::Memory(cache) => cache.get(key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(pool) => pool.delete(key).await,
            CacheBackend::Memory(cache) => cache.delete(key).await,
        }
    }

    /// Store a value as JSON
    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl_seconds).await
    }

    /// Load a JSON value stored with [`CacheBackend::set_json`]
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn health_check(&self) -> CacheResult<bool> {
        match self {
            CacheBackend::Redis(pool) => pool.health_check().await,
            CacheBackend::Memory(_) => Ok(true),
        }
    }
}

/// Semantic key of a cached read, scoped to the user it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
    UserProfile(Uuid),
    UserPreferences(Uuid),
    RecommendedRecipes(Uuid),
    Goals(Uuid),
    DashboardStats(Uuid),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, user_id) = match self {
            QueryKey::UserProfile(id) => ("user_profile", id),
            QueryKey::UserPreferences(id) => ("user_preferences", id),
            QueryKey::RecommendedRecipes(id) => ("recommended_recipes", id),
            QueryKey::Goals(id) => ("goals", id),
            QueryKey::DashboardStats(id) => ("dashboard_stats", id),
        };
        write!(f, "query:{}:{}", kind, user_id)
    }
}

/// Read-through cache for backend queries
///
/// Cache failures never fail a request: they are logged and the loader is
/// called directly.
#[derive(Clone)]
pub struct QueryCache {
    backend: CacheBackend,
    ttl_seconds: u64,
}

impl QueryCache {
    pub fn new(backend: CacheBackend, ttl_seconds: u64) -> Self {
        Self {
            backend,
            ttl_seconds,
        }
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    /// Return the cached value for `key`, or run `load` and cache its result
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &QueryKey, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cache_key = key.to_string();

        match self.backend.get_json::<T>(&cache_key).await {
            Ok(Some(value)) => {
                debug!("Query cache hit: {}", cache_key);
                return Ok(value);
            }
            Ok(None) => debug!("Query cache miss: {}", cache_key),
            Err(e) => warn!("Query cache read failed for {}: {}", cache_key, e),
        }

        let value = load().await?;

        if let Err(e) = self
            .backend
            .set_json(&cache_key, &value, Some(self.ttl_seconds))
            .await
        {
            warn!("Query cache write failed for {}: {}", cache_key, e);
        }

        Ok(value)
    }

    /// Drop cached results so the next read refetches
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            let cache_key = key.to_string();
            if let Err(e) = self.backend.delete(&cache_key).await {
                warn!("Query cache invalidation failed for {}: {}", cache_key, e);
            }
        }
    }
}
