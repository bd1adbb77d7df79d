//! Chat Module
//!
//! Direct messages between users. Append-only; history is every message
//! either side sent the other, oldest first.
//! Stored in the same SQLite database as auth (linkchat.sqlite).

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::auth::DB_FILE;
use crate::models::Message;

/// Chat manager handles message storage and history retrieval
pub struct ChatManager {
    db_path: std::path::PathBuf,
}

impl ChatManager {
    /// Create new chat manager
    pub async fn new(base_dir: &Path) -> Result<Self> {
        let db_path = base_dir.join(DB_FILE);

        let manager = Self { db_path };
        manager.init_db().await?;

        info!("[Chat] Initialized");
        Ok(manager)
    }

    /// Get database connection
    async fn get_pool(&self) -> Result<sqlx::SqlitePool> {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite:{}", self.db_path.display()))?
                .create_if_missing(true);
        Ok(SqlitePoolOptions::new().connect_with(options).await?)
    }

    /// Initialize database tables
    async fn init_db(&self) -> Result<()> {
        let pool = self.get_pool().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id INTEGER NOT NULL,
                receiver_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (sender_id) REFERENCES users(id),
                FOREIGN KEY (receiver_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        pool.close().await;
        Ok(())
    }

    /// Append a message with a server-clock timestamp.
    /// No contact check here: only the chat view is gated.
    pub async fn send_message(
        &self,
        sender_id: i64,
        receiver_id: i64,
        content: &str,
    ) -> Result<Message> {
        let timestamp = Utc::now();
        let pool = self.get_pool().await?;

        let result = sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(timestamp.to_rfc3339())
        .execute(&pool)
        .await?;

        let id = result.last_insert_rowid();

        pool.close().await;

        info!("[Chat] Message sent: {} -> {}", sender_id, receiver_id);

        Ok(Message {
            id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            timestamp,
        })
    }

    /// Full history between two users, both directions, oldest first.
    /// The id tiebreak keeps same-instant messages in insertion order.
    pub async fn history_between(&self, user_id: i64, other_id: i64) -> Result<Vec<Message>> {
        let pool = self.get_pool().await?;

        let rows: Vec<(i64, i64, i64, String, String)> = sqlx::query_as(
            r#"
            SELECT id, sender_id, receiver_id, content, timestamp
            FROM messages
            WHERE (sender_id = ? AND receiver_id = ?)
               OR (sender_id = ? AND receiver_id = ?)
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .bind(other_id)
        .bind(user_id)
        .fetch_all(&pool)
        .await?;

        pool.close().await;

        Ok(rows
            .into_iter()
            .map(|(id, sender_id, receiver_id, content, timestamp)| Message {
                id,
                sender_id,
                receiver_id,
                content,
                timestamp: timestamp.parse().unwrap_or_else(|_| Utc::now()),
            })
            .collect())
    }
}
