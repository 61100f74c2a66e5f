//! Authentication handlers for the Google OAuth flow and token lifecycle.
//!
//! This module provides the following endpoints:
//! - `GET /api/v1/login` - Redirects to Google's authorization page
//! - `POST /api/v1/swap_token` - Exchanges an authorization code for a token pair
//! - `POST /api/v1/refresh_access_token` - Rotates a refresh token into a new pair
//! - `GET /api/v1/logout` - Revokes the caller's refresh token
//! - `GET /api/v1/user/info` - Returns the authenticated user

use actix_web::{http::header, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::auth::BearerToken;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::services::google::{authorize_url, GoogleOAuthConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Authentication service
    pub auth: AuthService,
}

/// Query parameters for the login hand-off.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Opaque state the frontend wants echoed back on the callback
    pub state: String,
}

/// Form body for the code exchange endpoint.
#[derive(Debug, Deserialize)]
pub struct SwapTokenForm {
    /// Authorization code from Google
    pub code: String,
}

/// Query parameters for the refresh endpoint.
#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    /// The refresh token to rotate
    pub token: String,
}

/// Explicitly mapped user representation.
///
/// Every exposed field is listed here; nothing is derived from the model by
/// introspection, so the response shape cannot silently grow a field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub ext_id: String,
    pub disabled: bool,
    pub superuser: bool,
    pub created: DateTime<Utc>,
    pub username: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub full_name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            ext_id: user.ext_id,
            disabled: user.disabled,
            superuser: user.superuser,
            created: user.created,
            username: user.username,
            given_name: user.given_name,
            family_name: user.family_name,
            full_name: user.full_name,
        }
    }
}

/// Initiates the Google OAuth flow by redirecting to the authorization page.
///
/// The `state` query parameter is passed through to Google and returns to
/// the frontend on the provider's redirect.
pub async fn login(query: web::Query<LoginQuery>, data: web::Data<AppState>) -> HttpResponse {
    let google_config = GoogleOAuthConfig {
        client_id: data.config.google_client_id.clone(),
        client_secret: data.config.google_client_secret.clone(),
        redirect_uri: data.config.google_redirect_uri.clone(),
        auth_url: data.config.google_auth_url.clone(),
        token_url: data.config.google_token_url.clone(),
    };

    HttpResponse::TemporaryRedirect()
        .append_header((header::LOCATION, authorize_url(&google_config, &query.state)))
        .finish()
}

/// Exchanges a Google authorization code for an access/refresh token pair.
///
/// # Process
/// 1. Exchanges the code at the provider's token endpoint
/// 2. Verifies the returned ID token's audience, issuer and expiry
/// 3. Creates or updates the user record
/// 4. Issues a token pair, replacing any previously stored refresh token
pub async fn swap_token(
    form: web::Form<SwapTokenForm>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let pair = data.auth.exchange_code(&form.code).await.map_err(|e| {
        tracing::error!("Code exchange failed: {:?}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(pair))
}

/// Rotates a valid refresh token into a fresh token pair.
///
/// The presented token must match the stored hash for its user; issuing the
/// new pair invalidates it.
pub async fn refresh_access_token(
    query: web::Query<RefreshQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let user = data.auth.authenticate_refresh(&query.token).await?;
    let pair = data.auth.issue_token_pair(&user).await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// Revokes the caller's refresh token.
///
/// Requires a valid access token. The access token itself remains valid
/// until its expiry; only the refresh slot is cleared.
pub async fn logout(token: BearerToken, data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = data.auth.authenticate_access(token.as_str()).await?;
    data.auth.logout(&user).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Returns the authenticated user's attributes.
pub async fn user_info(token: BearerToken, data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = data.auth.authenticate_access(token.as_str()).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_from_user() {
        let user = User::new("ext-1".to_string(), "alice".to_string());
        let id = user.id;

        let response = UserResponse::from(user);
        assert_eq!(response.id, id);
        assert_eq!(response.ext_id, "ext-1");
        assert_eq!(response.username, "alice");
        assert!(!response.disabled);
    }

    #[test]
    fn test_user_response_serialization_is_flat() {
        let response = UserResponse::from(User::new("ext-2".to_string(), "bob".to_string()));

        let json = serde_json::to_value(&response).expect("Failed to serialize");
        let object = json.as_object().expect("Expected a JSON object");
        // The field list is fixed; a new model field does not leak here
        assert_eq!(object.len(), 9);
        assert_eq!(object["username"], "bob");
    }
}
