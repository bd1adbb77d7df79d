//! Auth handlers

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::middleware::token_from_headers;
use crate::models::UserInfo;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub profile_link: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub profile_link: String,
}

/// POST /register
///
/// The duplicate checks here and the UNIQUE constraints in the schema are
/// both live; a concurrent duplicate surfaces as a constraint error.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    info!("POST /register - {}", req.username);

    if state.auth.find_by_username(&req.username).await?.is_some() {
        warn!("Registration rejected, username taken: {}", req.username);
        return Err(Error::Conflict("This username is already taken".to_string()));
    }

    if state.auth.find_by_link(&req.profile_link).await?.is_some() {
        warn!("Registration rejected, link taken: {}", req.profile_link);
        return Err(Error::Conflict("This link is already taken".to_string()));
    }

    let (user, session) = state
        .auth
        .register(req.username, req.password, req.profile_link)
        .await?;

    Ok(Json(AuthResponse {
        token: session.token,
        user_id: user.id,
        username: user.username,
        profile_link: user.profile_link,
    }))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    info!("POST /login - {}", req.username);

    match state.auth.login(&req.username, &req.password).await? {
        Some((user, session)) => Ok(Json(AuthResponse {
            token: session.token,
            user_id: user.id,
            username: user.username,
            profile_link: user.profile_link,
        })),
        None => {
            warn!("Login failed for {}", req.username);
            // One message for unknown user and wrong password alike
            Err(Error::LoginFail)
        }
    }
}

/// GET /logout
///
/// Token is optional; clearing a session that does not exist is fine.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    info!("GET /logout");

    if let Some(token) = token_from_headers(&headers) {
        state.auth.logout(&token).await?;
    }

    Ok(StatusCode::OK)
}

/// GET /auth/me
pub async fn me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<UserInfo>> {
    let user = state
        .auth
        .get_user(ctx.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
