//! Authentication Module
//!
//! Handles registration, login, and session management.
//! User data stored in SQLite database at <base_dir>/linkchat.sqlite

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Session, User, UserInfo};

/// Single database file shared by all managers
pub const DB_FILE: &str = "linkchat.sqlite";

/// Auth manager handles all authentication
pub struct AuthManager {
    db_path: std::path::PathBuf,
    /// In-memory session cache
    sessions: RwLock<HashMap<String, Session>>,
}

impl AuthManager {
    /// Create new auth manager
    pub async fn new(base_dir: &Path) -> Result<Self> {
        let db_path = base_dir.join(DB_FILE);

        let manager = Self {
            db_path,
            sessions: RwLock::new(HashMap::new()),
        };

        manager.init_db().await?;

        info!("[Auth] Initialized at {:?}", manager.db_path);

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

        // Create users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                profile_link TEXT UNIQUE NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        // Create sessions table. No expiry column: sessions live until logout.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        pool.close().await;
        Ok(())
    }

    /// Register a new user and open a session for them.
    /// Uniqueness of username and profile_link is screened by the caller;
    /// the UNIQUE constraints are the final guard.
    pub async fn register(
        &self,
        username: String,
        password: String,
        profile_link: String,
    ) -> Result<(UserInfo, Session)> {
        let pool = self.get_pool().await?;

        let password_hash = hash(&password, DEFAULT_COST).context("Failed to hash password")?;

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, profile_link, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&username)
        .bind(&password_hash)
        .bind(&profile_link)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await?;

        let user_id = result.last_insert_rowid();

        let session = self.create_session(&pool, user_id).await?;

        pool.close().await;

        info!("[Auth] User registered: {} ({})", username, profile_link);

        Ok((
            UserInfo {
                id: user_id,
                username,
                profile_link,
            },
            session,
        ))
    }

    /// Login user and create session.
    /// Returns None for unknown username and for wrong password alike;
    /// callers must not distinguish the two.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<(UserInfo, Session)>> {
        let pool = self.get_pool().await?;

        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, profile_link FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&pool)
        .await?;

        let (user_id, username, password_hash, profile_link) = match row {
            Some(r) => r,
            None => {
                pool.close().await;
                return Ok(None);
            }
        };

        let valid = verify(password, &password_hash).context("Failed to verify password")?;

        if !valid {
            warn!("[Auth] Failed login attempt for {}", username);
            pool.close().await;
            return Ok(None);
        }

        let session = self.create_session(&pool, user_id).await?;

        pool.close().await;

        info!("[Auth] User logged in: {}", username);

        Ok(Some((
            UserInfo {
                id: user_id,
                username,
                profile_link,
            },
            session,
        )))
    }

    /// Create new session
    async fn create_session(&self, pool: &sqlx::SqlitePool, user_id: i64) -> Result<Session> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.created_at.to_rfc3339())
            .execute(pool)
            .await?;

        // Cache session
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        Ok(session)
    }

    /// Validate session token
    pub async fn validate_session(&self, token: &str) -> Result<UserInfo> {
        // Check cache first
        let cached_user_id = {
            let sessions = self.sessions.read().await;
            sessions.get(token).map(|s| s.user_id)
        };

        if let Some(user_id) = cached_user_id {
            if let Some(user) = self.get_user(user_id).await? {
                return Ok(user);
            }
        }

        // Check database
        let pool = self.get_pool().await?;

        let row: Option<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.profile_link
            FROM users u
            JOIN sessions s ON u.id = s.user_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&pool)
        .await?;

        pool.close().await;

        if let Some((id, username, profile_link)) = row {
            return Ok(UserInfo {
                id,
                username,
                profile_link,
            });
        }

        Err(anyhow::anyhow!("Invalid session"))
    }

    /// Logout user (invalidate session)
    pub async fn logout(&self, token: &str) -> Result<()> {
        // Remove from cache
        self.sessions.write().await.remove(token);

        // Remove from database
        let pool = self.get_pool().await?;
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&pool)
            .await?;
        pool.close().await;

        info!("[Auth] Session invalidated");

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserInfo>> {
        let pool = self.get_pool().await?;

        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, username, profile_link FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&pool)
                .await?;

        pool.close().await;

        Ok(row.map(|(id, username, profile_link)| UserInfo {
            id,
            username,
            profile_link,
        }))
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let pool = self.get_pool().await?;

        let row: Option<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, profile_link, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&pool)
        .await?;

        pool.close().await;

        Ok(row.map(Self::row_to_user))
    }

    /// Resolve a vanity profile link to a user
    pub async fn find_by_link(&self, profile_link: &str) -> Result<Option<User>> {
        let pool = self.get_pool().await?;

        let row: Option<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, profile_link, created_at FROM users WHERE profile_link = ?",
        )
        .bind(profile_link)
        .fetch_optional(&pool)
        .await?;

        pool.close().await;

        Ok(row.map(Self::row_to_user))
    }

    fn row_to_user(row: (i64, String, String, String, String)) -> User {
        let (id, username, password_hash, profile_link, created_at) = row;
        User {
            id,
            username,
            password_hash,
            profile_link,
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
        }
    }
}
