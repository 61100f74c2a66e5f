//! User model for Google OAuth authenticated users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents a user authenticated via Google OAuth.
///
/// Users are created when they first authenticate with Google and are
/// identified by the provider's subject id (`ext_id`), which never changes
/// once set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique identifier for the user (UUID v4)
    pub id: Uuid,

    /// Google's unique subject identifier
    pub ext_id: String,

    /// Whether the account has been deactivated
    pub disabled: bool,

    /// Whether the account has superuser privileges
    pub superuser: bool,

    /// Timestamp when the user record was created
    pub created: DateTime<Utc>,

    /// Derived username, unique enough for display purposes
    pub username: String,

    /// User's given name(s), as reported by the provider
    pub given_name: Option<String>,

    /// User's family name(s), as reported by the provider
    pub family_name: Option<String>,

    /// User's full display name, as reported by the provider
    pub full_name: Option<String>,
}

impl User {
    /// Creates a new User instance (for testing or manual construction).
    ///
    /// Note: In production, users are created via the upsert in
    /// `services::user`.
    #[allow(dead_code)]
    pub fn new(ext_id: String, username: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            ext_id,
            disabled: false,
            superuser: false,
            created: Utc::now(),
            username,
            given_name: None,
            family_name: None,
            full_name: None,
        }
    }

    /// An account is active unless it has been disabled.
    pub fn active(&self) -> bool {
        !self.disabled
    }
}
