//! HTTP handlers
//!
//! DTOs live next to the handlers that use them; persisted entities are
//! in crate::models.

pub mod auth;
pub mod chat;
pub mod contacts;
pub mod profile;

// Re-export AppState from config
pub use crate::config::AppState;

// Auth handlers
pub use auth::{login, logout, me, register};

// Profile handlers
pub use profile::{index, profile};

// Contact handlers
pub use contacts::{add_contact, list_contacts};

// Chat handlers
pub use chat::{chat_history, send_message};
