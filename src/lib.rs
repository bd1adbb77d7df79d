//! LinkChat Server Library
//!
//! Minimal social-contact and direct-messaging server: users register
//! with a username, password, and vanity profile link, add other users
//! as one-directional contacts, and exchange timestamped messages.

pub mod auth;
pub mod chat;
pub mod config;
pub mod contacts;
pub mod core;
pub mod handlers;
pub mod models;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use auth::AuthManager;
use chat::ChatManager;
use config::{AppState, ServerConfig};
use contacts::ContactManager;
use crate::core::middleware::mw_require_auth;
use handlers::{
    add_contact,
    chat_history,
    // Landing + profile
    index,
    list_contacts,
    login,
    logout,
    me,
    profile,
    // Auth
    register,
    // Chat
    send_message,
};

/// Build the application router.
///
/// Static routes are registered before the `/{link}` catch-all; axum
/// gives them priority. Authenticated routes sit behind
/// `mw_require_auth`, which turns the bearer token into a `Ctx`.
pub fn app_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/contacts", get(list_contacts))
        .route("/add_contact/{link}", post(add_contact))
        .route("/chat/{link}", get(chat_history))
        .route("/send_message/{link}", post(send_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    Router::new()
        .route("/", get(index))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/health", get(health_check))
        .merge(protected)
        .route("/{link}", get(profile))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== LinkChat Server ===");

    let config = ServerConfig::from_env();
    config.ensure_dirs().await?;

    info!("Data directory: {:?}", config.base_dir);

    let auth_manager = Arc::new(AuthManager::new(&config.base_dir).await?);
    info!("Auth Manager initialized");

    let contact_manager = Arc::new(ContactManager::new(&config.base_dir).await?);
    info!("Contact Manager initialized");

    let chat_manager = Arc::new(ChatManager::new(&config.base_dir).await?);
    info!("Chat Manager initialized");

    let app_state = AppState {
        auth: auth_manager,
        contacts: contact_manager,
        chat: chat_manager,
    };

    let app = app_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK - LinkChat Server"
}
