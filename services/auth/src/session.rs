//! Refresh-token sessions kept in the cache store

use anyhow::Result;
use common::cache::CacheBackend;
use tracing::info;
use uuid::Uuid;

/// Session manager for handling user sessions
///
/// One session per user: the latest refresh token issued to them.
#[derive(Clone)]
pub struct SessionManager {
    cache: CacheBackend,
    ttl_seconds: u64,
}

fn session_key(user_id: Uuid) -> String {
    format!("session:{}", user_id)
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(cache: CacheBackend, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }

    /// Create or replace the session for a user
    pub async fn store_session(&self, user_id: Uuid, refresh_token: &str) -> Result<()> {
        info!("Storing session for user: {}", user_id);

        self.cache
            .set(&session_key(user_id), refresh_token, Some(self.ttl_seconds))
            .await?;

        Ok(())
    }

    /// Delete the session for a user
    pub async fn delete_session(&self, user_id: Uuid) -> Result<()> {
        info!("Deleting session for user: {}", user_id);

        self.cache.delete(&session_key(user_id)).await?;

        Ok(())
    }

    /// Check the refresh token is the one currently on record
    pub async fn is_session_valid(&self, user_id: Uuid, refresh_token: &str) -> Result<bool> {
        let stored_token = self.cache.get(&session_key(user_id)).await?;

        Ok(stored_token.as_deref() == Some(refresh_token))
    }

    /// Get cache health status
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.cache.health_check().await?)
    }
}
