use anyhow::Result;
use tracing::info;

mod config;
mod error;
mod middleware;
mod models;
mod onboarding;
mod pages;
mod repositories;
mod routes;
mod state;

use common::{
    cache::{CacheBackend, QueryCache, RedisConfig},
    database::{DatabaseConfig, init_pool},
    telemetry,
    token::TokenVerifier,
};
use tokio::net::TcpListener;

use crate::{config::ApiConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting API service");

    let api_config = ApiConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let redis_config = RedisConfig::from_env();
    let cache = CacheBackend::connect(api_config.cache_backend, &redis_config)?;
    let query_cache = QueryCache::new(cache, redis_config.query_ttl_seconds);

    let token_verifier = TokenVerifier::from_env()?;

    let app_state = AppState::new(
        pool,
        query_cache,
        token_verifier,
        api_config.onboarding_draft_ttl,
    );

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&api_config.bind_address).await?;
    info!("API service listening on {}", api_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
