//! Application state shared across handlers

use common::{cache::QueryCache, token::TokenVerifier};
use sqlx::PgPool;

use crate::{
    onboarding::DraftStore,
    repositories::{GoalRepository, ProfileRepository, RecipeRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub query_cache: QueryCache,
    pub token_verifier: TokenVerifier,
    pub drafts: DraftStore,
    pub profile_repository: ProfileRepository,
    pub recipe_repository: RecipeRepository,
    pub goal_repository: GoalRepository,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        query_cache: QueryCache,
        token_verifier: TokenVerifier,
        draft_ttl_seconds: u64,
    ) -> Self {
        Self {
            drafts: DraftStore::new(query_cache.backend().clone(), draft_ttl_seconds),
            profile_repository: ProfileRepository::new(db_pool.clone()),
            recipe_repository: RecipeRepository::new(db_pool.clone()),
            goal_repository: GoalRepository::new(db_pool.clone()),
            db_pool,
            query_cache,
            token_verifier,
        }
    }
}
