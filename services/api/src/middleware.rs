//! Session resolution for page and data routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::token::{AuthUser, TokenType, blacklist_key};
use tracing::{debug, warn};

use crate::{error::ApiError, pages::AuthState, state::AppState};

/// Work out who is calling from an optional bearer token
///
/// Missing, invalid, expired or revoked tokens mean [`AuthState::Anonymous`].
/// When the revocation list cannot be read the state stays
/// [`AuthState::Resolving`].
pub async fn resolve_auth_state(state: &AppState, token: Option<&str>) -> AuthState {
    let Some(token) = token else {
        return AuthState::Anonymous;
    };

    let claims = match state.token_verifier.verify_as(token, TokenType::Access) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Rejected bearer token: {}", e);
            return AuthState::Anonymous;
        }
    };

    match state.query_cache.backend().get(&blacklist_key(token)).await {
        Ok(Some(_)) => {
            debug!("Bearer token has been revoked");
            AuthState::Anonymous
        }
        Ok(None) => AuthState::Authenticated(AuthUser::from(claims)),
        Err(e) => {
            warn!("Failed to read token blacklist: {}", e);
            AuthState::Resolving
        }
    }
}

/// Require an authenticated caller on `/api` routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());

    match resolve_auth_state(&state, token).await {
        AuthState::Authenticated(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        AuthState::Anonymous => Err(ApiError::Unauthorized),
        AuthState::Resolving => Err(ApiError::ServiceUnavailable),
    }
}
