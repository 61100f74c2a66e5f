//! Authentication service: login orchestration and token lifecycle.
//!
//! Each operation is a self-contained request-scoped transition against the
//! shared store; nothing here is retried and no in-process state is kept
//! between calls.

use chrono::Duration;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::Config;
use crate::models::user::User;
use crate::services::google::{self, GoogleOAuthConfig, IdInfo, IdentityError, ProviderError};
use crate::services::token::{TokenCodec, TokenKind};
use crate::services::token_store::{self, TokenStoreError};
use crate::services::user::{self, UserError};

/// Errors surfaced by the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unresolvable user, failed token check, or a masked inactive account
    /// during login
    #[error("could not validate credentials")]
    Credentials,

    /// Disabled account presented at a direct authentication checkpoint
    #[error("inactive user")]
    Inactive,

    /// Identity assertion failed audience/issuer/expiry checks
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Code exchange failed at the identity provider
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Database errors from SQLx
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Token hashing or signing failed
    #[error("token processing failed: {0}")]
    TokenProcessing(String),
}

impl From<TokenStoreError> for AuthError {
    fn from(e: TokenStoreError) -> Self {
        match e {
            TokenStoreError::Hash(msg) => AuthError::TokenProcessing(msg),
            TokenStoreError::Database(e) => AuthError::Database(e),
        }
    }
}

/// The issued access/refresh token pair.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub alg: String,
    pub typ: String,
}

/// Orchestrates provider code exchange, user upsert and token issuance,
/// and validates presented tokens.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    codec: TokenCodec,
    oauth: GoogleOAuthConfig,
    http_client: reqwest::Client,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl AuthService {
    /// Builds the service from loaded configuration.
    pub fn new(pool: PgPool, config: &Config, http_client: reqwest::Client) -> Self {
        Self {
            pool,
            codec: TokenCodec::new(&config.jwt_secret, config.jwt_algorithm),
            oauth: GoogleOAuthConfig {
                client_id: config.google_client_id.clone(),
                client_secret: config.google_client_secret.clone(),
                redirect_uri: config.google_redirect_uri.clone(),
                auth_url: config.google_auth_url.clone(),
                token_url: config.google_token_url.clone(),
            },
            http_client,
            access_token_ttl: Duration::minutes(config.access_token_expire_min),
            refresh_token_ttl: Duration::days(config.refresh_token_expire_days),
        }
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Calls the provider, verifies the returned identity assertion, upserts
    /// the user and issues a fresh pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError> {
        let exchange = google::exchange_code(&self.http_client, &self.oauth, code).await?;
        let id_info = IdInfo::from_id_token(&exchange.id_token)?;
        id_info.verify(&self.oauth.client_id)?;
        self.login(&id_info).await
    }

    /// Upserts the asserted identity and issues a token pair.
    ///
    /// A disabled account is reported as bad credentials here, so a login
    /// attempt cannot be used to probe account state.
    pub async fn login(&self, id_info: &IdInfo) -> Result<TokenPair, AuthError> {
        let user = user::upsert_by_ext_id(
            &self.pool,
            &id_info.sub,
            &id_info.username(),
            id_info.given_name.as_deref(),
            id_info.family_name.as_deref(),
            id_info.name.as_deref(),
        )
        .await
        .map_err(|e| match e {
            UserError::Inactive => AuthError::Credentials,
            UserError::Database(e) => AuthError::Database(e),
        })?;

        self.issue_token_pair(&user).await
    }

    /// Issues a new access/refresh pair for a user.
    ///
    /// Storing the refresh token's hash replaces the user's previous slot,
    /// so the old refresh token stops validating immediately.
    pub async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self
            .codec
            .encode(user.id, &user.username, TokenKind::Access, self.access_token_ttl)
            .map_err(|e| AuthError::TokenProcessing(e.to_string()))?;

        let refresh_token = self
            .codec
            .encode(user.id, &user.username, TokenKind::Refresh, self.refresh_token_ttl)
            .map_err(|e| AuthError::TokenProcessing(e.to_string()))?;

        token_store::issue(&self.pool, user.id, &refresh_token).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            alg: self.codec.algorithm_name().to_string(),
            typ: "JWT".to_string(),
        })
    }

    /// Validates an access token and loads its user.
    pub async fn authenticate_access(&self, token: &str) -> Result<User, AuthError> {
        self.resolve_user(token, TokenKind::Access).await
    }

    /// Validates a refresh token and loads its user.
    ///
    /// On top of the signature/expiry checks the presented token must match
    /// the stored hash, which binds validity to the most recently issued
    /// token even though older ones remain cryptographically intact.
    pub async fn authenticate_refresh(&self, token: &str) -> Result<User, AuthError> {
        let user = self.resolve_user(token, TokenKind::Refresh).await?;
        if !token_store::verify(&self.pool, user.id, token).await? {
            return Err(AuthError::Credentials);
        }
        Ok(user)
    }

    /// Invalidates the user's stored refresh token.
    pub async fn logout(&self, user: &User) -> Result<(), AuthError> {
        token_store::revoke(&self.pool, user.id).await?;
        Ok(())
    }

    async fn resolve_user(&self, token: &str, kind: TokenKind) -> Result<User, AuthError> {
        let claims = self
            .codec
            .decode(token, kind)
            .map_err(|_| AuthError::Credentials)?;
        let user_id = claims.user_id().map_err(|_| AuthError::Credentials)?;

        let user = user::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AuthError::Credentials)?;
        if !user.active() {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }
}
