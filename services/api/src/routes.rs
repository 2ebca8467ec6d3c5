//! API service routes

mod goals;
mod onboarding;
mod profile;
mod views;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use tracing::error;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    pages,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/profile", get(profile::get_profile))
        .route(
            "/api/preferences",
            get(profile::get_preferences).patch(profile::update_preferences),
        )
        .route("/api/recipes/recommended", get(profile::recommended_recipes))
        .route("/api/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/api/goals/:id",
            patch(goals::update_goal).delete(goals::delete_goal),
        )
        .route("/api/dashboard/stats", get(goals::dashboard_stats))
        .route(
            "/api/onboarding",
            get(onboarding::get_wizard).put(onboarding::update_step),
        )
        .route("/api/onboarding/next", post(onboarding::next_step))
        .route("/api/onboarding/previous", post(onboarding::previous_step))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(api_routes);

    for route in pages::ROUTES {
        router = router.route(route.path, get(views::render_page));
    }

    router.fallback(views::not_found).with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let database_ok = common::database::health_check(&state.db_pool).await?;
    let cache_ok = state
        .query_cache
        .backend()
        .health_check()
        .await
        .unwrap_or(false);

    Ok(Json(json!({
        "status": if database_ok && cache_ok { "ok" } else { "degraded" },
        "service": "api-service"
    })))
}

/// Log a repository failure and hide it behind a generic 500
pub(crate) fn internal(context: &str, err: impl std::fmt::Display) -> ApiError {
    error!("{}: {}", context, err);
    ApiError::InternalServerError
}
