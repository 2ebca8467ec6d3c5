//! Service configuration loaded from `AUTH_*` environment variables

use common::cache::CacheKind;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

/// Authentication service settings
///
/// # Environment Variables
/// - `AUTH_BIND_ADDRESS` (default: "0.0.0.0:3000")
/// - `AUTH_CACHE_BACKEND`: `redis` or `memory` (default: "redis")
/// - `AUTH_LOGIN_MAX_ATTEMPTS` (default: 5)
/// - `AUTH_LOGIN_WINDOW_SECONDS` (default: 300)
/// - `AUTH_LOGIN_BAN_SECONDS` (default: 3600)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub bind_address: String,
    pub cache_backend: CacheKind,
    pub login_max_attempts: u32,
    pub login_window_seconds: u64,
    pub login_ban_seconds: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = RateLimiterConfig::default();

        Config::builder()
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("cache_backend", "redis")?
            .set_default("login_max_attempts", i64::from(defaults.max_attempts))?
            .set_default("login_window_seconds", defaults.window_seconds as i64)?
            .set_default("login_ban_seconds", defaults.ban_duration_seconds as i64)?
            .add_source(Environment::with_prefix("AUTH").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn rate_limiter(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: self.login_max_attempts,
            window_seconds: self.login_window_seconds,
            ban_duration_seconds: self.login_ban_seconds,
        }
    }
}
