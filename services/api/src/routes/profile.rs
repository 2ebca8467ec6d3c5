//! Profile, preference and recommendation endpoints

use axum::{Extension, Json, extract::State};
use common::{cache::QueryKey, token::AuthUser};
use uuid::Uuid;

use super::internal;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{
        DisplayRecipe, PreferenceUpdate, RecipeQuery, UserPreferences, UserProfile,
        recipe::shape_recipes,
    },
};

async fn load_profile(state: &AppState, user_id: Uuid) -> ApiResult<UserProfile> {
    state
        .query_cache
        .get_or_load(&QueryKey::UserProfile(user_id), move || async move {
            state
                .profile_repository
                .find_by_user(user_id)
                .await
                .map_err(|e| internal("Failed to load profile", e))?
                .ok_or(ApiError::NotFound("Profile"))
        })
        .await
}

async fn load_preferences(state: &AppState, user_id: Uuid) -> ApiResult<UserPreferences> {
    state
        .query_cache
        .get_or_load(&QueryKey::UserPreferences(user_id), move || async move {
            let profile = load_profile(state, user_id).await?;
            Ok::<_, ApiError>(UserPreferences::from_profile(&profile))
        })
        .await
}

fn profile_keys(user_id: Uuid) -> [QueryKey; 3] {
    [
        QueryKey::UserProfile(user_id),
        QueryKey::UserPreferences(user_id),
        QueryKey::RecommendedRecipes(user_id),
    ]
}

/// Invalidate everything derived from the stored profile
pub(crate) async fn invalidate_profile(state: &AppState, user_id: Uuid) {
    state.query_cache.invalidate(&profile_keys(user_id)).await;
}

/// Stored profile of the current user
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(load_profile(&state, user.id).await?))
}

/// Normalized preferences of the current user
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserPreferences>> {
    Ok(Json(load_preferences(&state, user.id).await?))
}

/// Settings edit of the preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PreferenceUpdate>,
) -> ApiResult<Json<UserPreferences>> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let current = state
        .profile_repository
        .find_by_user(user.id)
        .await
        .map_err(|e| internal("Failed to load profile", e))?
        .ok_or(ApiError::NotFound("Profile"))?;

    let update = payload.to_profile_update(&current);
    if update.is_empty() {
        return Ok(Json(UserPreferences::from_profile(&current)));
    }

    let stored = state
        .profile_repository
        .update(user.id, &update)
        .await
        .map_err(|e| internal("Failed to update preferences", e))?
        .ok_or(ApiError::NotFound("Profile"))?;

    invalidate_profile(&state, user.id).await;

    Ok(Json(UserPreferences::from_profile(&stored)))
}

/// Recommendation feed for the current user
pub async fn recommended_recipes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<DisplayRecipe>>> {
    let state = &state;
    let user_id = user.id;

    let recipes = state
        .query_cache
        .get_or_load(&QueryKey::RecommendedRecipes(user_id), move || async move {
            let preferences = load_preferences(state, user_id).await?;
            let rows = state
                .recipe_repository
                .recommended(&RecipeQuery::for_preferences(&preferences))
                .await
                .map_err(|e| internal("Failed to load recipes", e))?;
            Ok::<_, ApiError>(shape_recipes(rows))
        })
        .await?;

    Ok(Json(recipes))
}
