use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record stored in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_link: String,
    pub created_at: DateTime<Utc>,
}

/// Public user info (no sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub profile_link: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_link: user.profile_link,
        }
    }
}

/// Directed contact edge, joined to the target user's public fields.
/// A adding B does not add B -> A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub contact_id: i64,
    pub username: String,
    pub profile_link: String,
    pub created_at: DateTime<Utc>,
}

/// A single direct message. Append-only; never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Session token for authenticated requests. Sessions do not expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
