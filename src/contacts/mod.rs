//! Contacts Module
//!
//! Directed contact edges between users. Adding A -> B does not add
//! B -> A; each side manages its own outgoing edges.
//! Stored in the same SQLite database as auth (linkchat.sqlite).

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::auth::DB_FILE;
use crate::models::Contact;

/// Contact manager handles the directed contact graph
pub struct ContactManager {
    db_path: std::path::PathBuf,
}

impl ContactManager {
    /// Create new contact manager
    pub async fn new(base_dir: &Path) -> Result<Self> {
        let db_path = base_dir.join(DB_FILE);

        let manager = Self { db_path };
        manager.init_db().await?;

        info!("[Contacts] Initialized");
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

    /// Initialize database tables.
    /// No UNIQUE(user_id, contact_id): duplicates are screened at request
    /// time only, and the table accepts them.
    async fn init_db(&self) -> Result<()> {
        let pool = self.get_pool().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                contact_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (contact_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        pool.close().await;
        Ok(())
    }

    /// Whether `user_id` has an outgoing edge to `contact_id`
    pub async fn is_contact(&self, user_id: i64, contact_id: i64) -> Result<bool> {
        let pool = self.get_pool().await?;

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM contacts WHERE user_id = ? AND contact_id = ?")
                .bind(user_id)
                .bind(contact_id)
                .fetch_optional(&pool)
                .await?;

        pool.close().await;
        Ok(existing.is_some())
    }

    /// Append an edge without checking for an existing one
    pub async fn insert_edge(&self, user_id: i64, contact_id: i64) -> Result<()> {
        let pool = self.get_pool().await?;

        sqlx::query("INSERT INTO contacts (user_id, contact_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(contact_id)
            .bind(Utc::now().to_rfc3339())
            .execute(&pool)
            .await?;

        pool.close().await;

        info!("[Contacts] Edge added: {} -> {}", user_id, contact_id);
        Ok(())
    }

    /// Add a contact unless one already exists. Returns false when the
    /// edge was already present. The check and the insert are separate
    /// auto-committed statements; concurrent adds can both pass the check
    /// and leave duplicate edges.
    pub async fn add_contact(&self, user_id: i64, contact_id: i64) -> Result<bool> {
        if self.is_contact(user_id, contact_id).await? {
            return Ok(false);
        }

        self.insert_edge(user_id, contact_id).await?;
        Ok(true)
    }

    /// All edges owned by `user_id`, joined to the target user rows.
    /// No ORDER BY: the list comes back in whatever order the storage
    /// engine returns, which for SQLite is insertion order.
    pub async fn list_contacts(&self, user_id: i64) -> Result<Vec<Contact>> {
        let pool = self.get_pool().await?;

        let rows: Vec<(i64, i64, String, String, String)> = sqlx::query_as(
            r#"
            SELECT c.id, c.contact_id, u.username, u.profile_link, c.created_at
            FROM contacts c
            JOIN users u ON c.contact_id = u.id
            WHERE c.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&pool)
        .await?;

        pool.close().await;

        Ok(rows
            .into_iter()
            .map(|(id, contact_id, username, profile_link, created_at)| Contact {
                id,
                user_id,
                contact_id,
                username,
                profile_link,
                created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
            })
            .collect())
    }
}
