//! Chat handlers
//!
//! The chat view is gated on an outgoing contact edge; sending is not.
//! The asymmetry is deliberate and pinned by tests.

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::models::{Message, UserInfo};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub contact: UserInfo,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub redirect: String,
}

/// GET /chat/{link}
///
/// Requires an outgoing edge from the session user to the target. The
/// reverse edge is irrelevant: the target sees this history only after
/// adding the session user themselves.
pub async fn chat_history(
    Path(link): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<ChatResponse>> {
    info!("GET /chat/{}", link);

    let target = state
        .auth
        .find_by_link(&link)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if !state.contacts.is_contact(ctx.user_id(), target.id).await? {
        return Err(Error::Forbidden(
            "This user is not in your contacts".to_string(),
        ));
    }

    let messages = state.chat.history_between(ctx.user_id(), target.id).await?;

    Ok(Json(ChatResponse {
        contact: target.into(),
        messages,
    }))
}

/// POST /send_message/{link}
///
/// No contact check: any resolvable user can be messaged. Empty content
/// is a silent no-op.
pub async fn send_message(
    Path(link): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>> {
    info!("POST /send_message/{}", link);

    let target = state
        .auth
        .find_by_link(&link)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if !req.content.is_empty() {
        state
            .chat
            .send_message(ctx.user_id(), target.id, &req.content)
            .await?;
    }

    Ok(Json(SendMessageResponse {
        redirect: format!("/chat/{}", link),
    }))
}
