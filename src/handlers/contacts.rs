//! Contact handlers

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::models::Contact;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

/// POST /add_contact/{link}
pub async fn add_contact(
    Path(link): Path<String>,
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<StatusResponse>> {
    info!("POST /add_contact/{}", link);

    let target = state
        .auth
        .find_by_link(&link)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let added = state.contacts.add_contact(ctx.user_id(), target.id).await?;

    if !added {
        return Err(Error::Conflict(
            "This user is already in your contacts".to_string(),
        ));
    }

    info!("Contact added: {} -> {}", ctx.user_id(), target.id);

    Ok(Json(StatusResponse {
        message: "Contact added".to_string(),
    }))
}

/// GET /contacts
pub async fn list_contacts(State(state): State<AppState>, ctx: Ctx) -> Result<Json<Vec<Contact>>> {
    info!("GET /contacts");

    let contacts = state.contacts.list_contacts(ctx.user_id()).await?;
    Ok(Json(contacts))
}
