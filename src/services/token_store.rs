//! Single-slot refresh token store.
//!
//! Each user has at most one stored refresh token (enforced by the schema:
//! `user_id` is the primary key of `token_info`). Issuing a new token
//! replaces the old one inside a transaction, so the previous secret stops
//! validating the instant the new one exists and a concurrent verify never
//! observes zero or two records.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::token::TokenInfo;
use crate::services::password::{hash_secret, verify_secret};

/// Errors from token store operations.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Hashing the refresh token failed
    #[error("refresh token hashing failed: {0}")]
    Hash(String),

    /// Database errors from SQLx
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Stores the hash of a freshly issued refresh token, replacing any
/// previous token for the user.
pub async fn issue(
    pool: &PgPool,
    user_id: Uuid,
    refresh_token: &str,
) -> Result<(), TokenStoreError> {
    let digest = hash_secret(refresh_token).map_err(|e| TokenStoreError::Hash(e.to_string()))?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM token_info WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO token_info (user_id, refresh_token) VALUES ($1, $2)")
        .bind(user_id)
        .bind(&digest)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Loads the stored token record for a user, if any.
pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<TokenInfo>, sqlx::Error> {
    sqlx::query_as::<_, TokenInfo>(
        "SELECT user_id, refresh_token, created FROM token_info WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Checks a presented refresh token against the stored hash.
///
/// Returns `false` when the user has no stored token.
pub async fn verify(
    pool: &PgPool,
    user_id: Uuid,
    presented_token: &str,
) -> Result<bool, sqlx::Error> {
    Ok(match find(pool, user_id).await? {
        Some(record) => verify_secret(presented_token, &record.refresh_token),
        None => false,
    })
}

/// Deletes the stored refresh token for a user. No-op if absent.
pub async fn revoke(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM token_info WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    // Issue/verify/revoke semantics against the database are covered by the
    // integration tests in tests/test_auth_flow.rs; the hashing primitives
    // are tested in services::password.
}
