//! Page routes guarded by the session state

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header::RETRY_AFTER},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;

use crate::{
    AppState,
    middleware::resolve_auth_state,
    pages::{GuardOutcome, guard},
};

fn not_found_response(uri: &Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found", "path": uri.path() })),
    )
        .into_response()
}

pub async fn render_page(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    uri: Uri,
) -> Response {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    let auth = resolve_auth_state(&state, token).await;

    match guard(uri.path(), &auth) {
        GuardOutcome::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(RETRY_AFTER, "1")],
            Json(json!({ "status": "loading" })),
        )
            .into_response(),
        GuardOutcome::Redirect(to) => Redirect::temporary(to).into_response(),
        GuardOutcome::Render(manifest) => Json(manifest).into_response(),
        GuardOutcome::NotFound => not_found_response(&uri),
    }
}

/// Fallback for paths outside the route table
pub async fn not_found(uri: Uri) -> Response {
    not_found_response(&uri)
}
