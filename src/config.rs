//! Server configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::chat::ChatManager;
use crate::contacts::ContactManager;

/// Configuration for the LinkChat server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory holding the SQLite database
    pub base_dir: PathBuf,
    /// Port to bind the HTTP listener to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("linkchat_data"),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Build config from LINKCHAT_ROOT / LINKCHAT_PORT env vars
    pub fn from_env() -> Self {
        let base_dir = std::env::var("LINKCHAT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("linkchat_data"));

        let port = std::env::var("LINKCHAT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self { base_dir, port }
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub contacts: Arc<ContactManager>,
    pub chat: Arc<ChatManager>,
}
