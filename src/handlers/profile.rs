//! Landing page and profile handlers

use crate::config::AppState;
use crate::core::error::{Error, Result};
use crate::core::middleware::token_from_headers;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::models::UserInfo;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub is_owner: bool,
}

/// GET /
///
/// Redirects to the caller's own profile when a valid session accompanies
/// the request, otherwise shows the landing payload.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = token_from_headers(&headers) {
        if let Ok(user) = state.auth.validate_session(&token).await {
            return Ok(Redirect::to(&format!("/{}", user.profile_link)).into_response());
        }
    }

    Ok(Json(json!({
        "app": "linkchat",
        "message": "Register or log in to start chatting"
    }))
    .into_response())
}

/// GET /{link}
///
/// No auth required. `is_owner` is computed from an optional session and
/// only gates UI affordances on the client side.
pub async fn profile(
    Path(link): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>> {
    info!("GET /{}", link);

    let user = state
        .auth
        .find_by_link(&link)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let is_owner = match token_from_headers(&headers) {
        Some(token) => state
            .auth
            .validate_session(&token)
            .await
            .map(|me| me.id == user.id)
            .unwrap_or(false),
        None => false,
    };

    Ok(Json(ProfileResponse {
        user: user.into(),
        is_owner,
    }))
}
