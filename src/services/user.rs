//! User directory database operations.
//!
//! Users are keyed by the identity provider's subject id (`ext_id`). Login
//! goes through a single upsert statement so concurrent logins for the same
//! subject are arbitrated by the unique constraint, not by check-then-act.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::User;

const USER_COLUMNS: &str =
    "id, ext_id, disabled, superuser, created, username, given_name, family_name, full_name";

/// Errors from user directory operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The account exists but has been deactivated
    #[error("inactive user")]
    Inactive,

    /// Database errors from SQLx
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Creates or updates a user from a verified identity assertion.
///
/// If no user with `ext_id` exists, one is created (active, non-superuser).
/// If an active user exists, the mutable name fields are refreshed. If the
/// existing user is disabled the call fails with [`UserError::Inactive`]
/// rather than resurrecting the account.
///
/// The `WHERE NOT disabled` guard on the conflict arm makes the disabled
/// case return no row, which keeps the whole operation a single statement.
pub async fn upsert_by_ext_id(
    pool: &PgPool,
    ext_id: &str,
    username: &str,
    given_name: Option<&str>,
    family_name: Option<&str>,
    full_name: Option<&str>,
) -> Result<User, UserError> {
    let query = format!(
        r#"
        INSERT INTO "user" (id, ext_id, username, given_name, family_name, full_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (ext_id)
        DO UPDATE SET
            username = EXCLUDED.username,
            given_name = EXCLUDED.given_name,
            family_name = EXCLUDED.family_name,
            full_name = EXCLUDED.full_name
        WHERE NOT "user".disabled
        RETURNING {USER_COLUMNS}
        "#
    );

    let user = sqlx::query_as::<_, User>(&query)
        .bind(Uuid::new_v4())
        .bind(ext_id)
        .bind(username)
        .bind(given_name)
        .bind(family_name)
        .bind(full_name)
        .fetch_optional(pool)
        .await?;

    // No row back means the conflict arm was suppressed by the guard:
    // the account exists and is disabled.
    user.ok_or(UserError::Inactive)
}

/// Finds a user by their internal UUID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM "user"
        WHERE id = $1
        "#
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}
