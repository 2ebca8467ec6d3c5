//! Service configuration loaded from `API_*` environment variables

use common::cache::CacheKind;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API service settings
///
/// # Environment Variables
/// - `API_BIND_ADDRESS` (default: "0.0.0.0:3001")
/// - `API_CACHE_BACKEND`: `redis` or `memory` (default: "redis")
/// - `API_ONBOARDING_DRAFT_TTL` in seconds (default: 86400)
///
/// The query cache TTL comes from `REDIS_QUERY_TTL`, shared with the
/// other services through [`common::cache::RedisConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bind_address: String,
    pub cache_backend: CacheKind,
    pub onboarding_draft_ttl: u64,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("cache_backend", "redis")?
            .set_default("onboarding_draft_ttl", 86400_i64)?
            .add_source(Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_config_defaults() {
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3001");
        assert_eq!(config.cache_backend, CacheKind::Redis);
        assert_eq!(config.onboarding_draft_ttl, 86400);
    }

    #[test]
    #[serial]
    fn test_api_config_from_env() {
        unsafe {
            std::env::set_var("API_CACHE_BACKEND", "memory");
            std::env::set_var("API_ONBOARDING_DRAFT_TTL", "600");
        }

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.cache_backend, CacheKind::Memory);
        assert_eq!(config.onboarding_draft_ttl, 600);

        unsafe {
            std::env::remove_var("API_CACHE_BACKEND");
            std::env::remove_var("API_ONBOARDING_DRAFT_TTL");
        }
    }
}
