//! Goal management and dashboard counters

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::{cache::QueryKey, token::AuthUser};
use serde_json::json;
use uuid::Uuid;

use super::internal;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{DashboardStats, Goal, NewGoal, UpdateGoal},
};

async fn invalidate_goals(state: &AppState, user_id: Uuid) {
    state
        .query_cache
        .invalidate(&[QueryKey::Goals(user_id), QueryKey::DashboardStats(user_id)])
        .await;
}

/// Goals of the current user, newest first
pub async fn list_goals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Goal>>> {
    let state = &state;
    let user_id = user.id;

    let goals = state
        .query_cache
        .get_or_load(&QueryKey::Goals(user_id), move || async move {
            state
                .goal_repository
                .list(user_id)
                .await
                .map_err(|e| internal("Failed to load goals", e))
        })
        .await?;

    Ok(Json(goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewGoal>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let goal = state
        .goal_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| internal("Failed to create goal", e))?;

    invalidate_goals(&state, user.id).await;

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoal>,
) -> ApiResult<Json<Goal>> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let goal = state
        .goal_repository
        .update(user.id, id, &payload)
        .await
        .map_err(|e| internal("Failed to update goal", e))?
        .ok_or(ApiError::NotFound("Goal"))?;

    invalidate_goals(&state, user.id).await;

    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .goal_repository
        .delete(user.id, id)
        .await
        .map_err(|e| internal("Failed to delete goal", e))?;

    if !deleted {
        return Err(ApiError::NotFound("Goal"));
    }

    invalidate_goals(&state, user.id).await;

    Ok(Json(json!({ "message": "Goal deleted successfully" })))
}

/// Goal counters and achievements, recomputed from the goal statuses
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<DashboardStats>> {
    let state = &state;
    let user_id = user.id;

    let stats = state
        .query_cache
        .get_or_load(&QueryKey::DashboardStats(user_id), move || async move {
            let statuses = state
                .goal_repository
                .statuses(user_id)
                .await
                .map_err(|e| internal("Failed to load goal statuses", e))?;
            Ok::<_, ApiError>(DashboardStats::from_statuses(statuses))
        })
        .await?;

    Ok(Json(stats))
}
