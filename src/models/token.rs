//! Refresh token model for JWT authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single refresh-token slot for a user.
///
/// `user_id` is both primary key and foreign key, so the database enforces
/// at most one stored refresh token per user. Only the argon2 digest of the
/// issued token is stored; the raw token never touches the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TokenInfo {
    /// The user this token was issued to
    pub user_id: Uuid,

    /// Argon2 digest of the issued refresh token
    pub refresh_token: String,

    /// Timestamp when this token was issued
    pub created: DateTime<Utc>,
}
