use anyhow::Result;
use tracing::info;

mod config;
mod error;
mod jwt;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod session;
mod validation;

use common::{
    cache::{CacheBackend, RedisConfig},
    database, telemetry,
};
use tokio::net::TcpListener;

use crate::{
    config::AuthConfig, jwt::JwtService, rate_limiter::RateLimiter,
    repositories::UserRepository, session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheBackend,
    pub jwt_service: JwtService,
    pub session_manager: SessionManager,
    pub user_repository: UserRepository,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting authentication service");

    let auth_config = AuthConfig::from_env()?;

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    let redis_config = RedisConfig::from_env();
    let cache = CacheBackend::connect(auth_config.cache_backend, &redis_config)?;

    let session_manager = SessionManager::new(cache.clone(), jwt_service.refresh_token_expiry());
    let rate_limiter = RateLimiter::new(auth_config.rate_limiter());
    info!("Login rate limiter: {:?}", rate_limiter.config());

    let app_state = AppState {
        cache,
        jwt_service,
        session_manager,
        user_repository: UserRepository::new(pool),
        rate_limiter,
    };

    info!("Authentication service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&auth_config.bind_address).await?;
    info!("Authentication service listening on {}", auth_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
