//! Google OAuth service for authentication.
//!
//! This module provides functionality for:
//! - Generating Google OAuth authorization URLs
//! - Exchanging authorization codes for tokens at the provider
//! - Verifying the claims of the returned ID token
//!
//! Cryptographic verification of the ID token against Google's public keys
//! is delegated to the provider exchange itself (the token arrives over the
//! code-exchange channel); this module re-checks audience, issuer and expiry
//! on the decoded payload.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Configuration for Google OAuth.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// Google OAuth App Client ID
    pub client_id: String,
    /// Google OAuth App Client Secret
    pub client_secret: String,
    /// Redirect URI registered with Google
    pub redirect_uri: String,
    /// Authorization endpoint
    pub auth_url: String,
    /// Token endpoint
    pub token_url: String,
}

/// Scopes requested during the login hand-off.
const OAUTH_SCOPES: &str = "openid email profile";

/// Successful response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenExchange {
    /// Provider access token
    pub access_token: String,
    /// Signed ID token carrying the identity assertion
    pub id_token: String,
}

/// Errors that can occur while talking to the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse response from Google
    #[error("Invalid response from Google")]
    InvalidResponse,

    /// Google returned an error
    #[error("Google API error: {0}")]
    ApiError(String),
}

/// Errors raised when the identity assertion fails a claim check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("malformed ID token payload")]
    Malformed,

    #[error("ID token audience does not match the configured client")]
    Audience,

    #[error("ID token issued by an unexpected issuer")]
    Issuer,

    #[error("ID token has expired")]
    Expired,
}

/// Verified payload of a Google ID token.
///
/// Field names follow the provider's claim names:
/// <https://developers.google.com/identity/protocols/oauth2/openid-connect#obtainuserinfo>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInfo {
    /// The audience this ID token is intended for
    pub aud: String,
    /// Expiration time, Unix timestamp
    pub exp: i64,
    /// Issued-at time, Unix timestamp
    pub iat: i64,
    /// Issuer identifier
    pub iss: String,
    /// Unique identifier for the user at the provider
    pub sub: String,
    /// Access token hash
    #[serde(default)]
    pub at_hash: Option<String>,
    /// Full display name
    #[serde(default)]
    pub name: Option<String>,
    /// Given name(s)
    #[serde(default)]
    pub given_name: Option<String>,
    /// Family name(s)
    #[serde(default)]
    pub family_name: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub picture: Option<String>,
    /// Locale
    #[serde(default)]
    pub locale: Option<String>,
    /// Email address, if the scope granted it
    #[serde(default)]
    pub email: Option<String>,
}

impl IdInfo {
    /// Decodes the payload segment of an ID token without checking its
    /// signature (delegated, see module docs).
    pub fn from_id_token(id_token: &str) -> Result<Self, IdentityError> {
        let payload = id_token.split('.').nth(1).ok_or(IdentityError::Malformed)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| IdentityError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| IdentityError::Malformed)
    }

    /// Checks audience, issuer and expiry of the assertion.
    pub fn verify(&self, client_id: &str) -> Result<(), IdentityError> {
        if self.aud != client_id {
            return Err(IdentityError::Audience);
        }
        if self.iss != "accounts.google.com" && self.iss != "https://accounts.google.com" {
            return Err(IdentityError::Issuer);
        }
        if self.exp <= Utc::now().timestamp() {
            return Err(IdentityError::Expired);
        }
        Ok(())
    }

    /// Derives a username for the user record.
    ///
    /// Prefers the local part of the email; falls back to the display name
    /// with a random disambiguator, then to a fully generated name.
    pub fn username(&self) -> String {
        if let Some(email) = &self.email {
            if let Some(local) = email.split('@').next() {
                if !local.is_empty() {
                    return local.to_string();
                }
            }
        }
        let suffix = Uuid::new_v4().simple().to_string();
        match &self.name {
            Some(name) => format!("{}-{}", name, &suffix[..8]),
            None => format!("user-{}", &suffix[..8]),
        }
    }
}

/// Generates the Google OAuth authorization URL for the login hand-off.
///
/// The caller-supplied `state` is passed through to the provider and comes
/// back on the redirect.
pub fn authorize_url(config: &GoogleOAuthConfig, state: &str) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&include_granted_scopes=true&state={}",
        config.auth_url,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(OAUTH_SCOPES),
        urlencoding::encode(state)
    )
}

/// Exchanges an authorization code for the provider's token set.
///
/// # Errors
///
/// Returns `ProviderError::RequestFailed` if the HTTP request fails,
/// `ProviderError::ApiError` if Google rejects the code, and
/// `ProviderError::InvalidResponse` if the response cannot be parsed.
pub async fn exchange_code(
    client: &reqwest::Client,
    config: &GoogleOAuthConfig,
    code: &str,
) -> Result<TokenExchange, ProviderError> {
    #[derive(Deserialize)]
    struct TokenResponseWithError {
        access_token: Option<String>,
        id_token: Option<String>,
        error: Option<String>,
        error_description: Option<String>,
    }

    let response = client
        .post(&config.token_url)
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    let token_response: TokenResponseWithError =
        response.json().await.map_err(|_| ProviderError::InvalidResponse)?;

    if let Some(error) = token_response.error {
        let description = token_response
            .error_description
            .unwrap_or_else(|| error.clone());
        return Err(ProviderError::ApiError(description));
    }

    match (token_response.access_token, token_response.id_token) {
        (Some(access_token), Some(id_token)) => Ok(TokenExchange {
            access_token,
            id_token,
        }),
        _ => Err(ProviderError::InvalidResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }

    fn id_info(email: Option<&str>, name: Option<&str>) -> IdInfo {
        IdInfo {
            aud: "test_client_id".to_string(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
            iat: Utc::now().timestamp(),
            iss: "accounts.google.com".to_string(),
            sub: "subject-1".to_string(),
            at_hash: None,
            name: name.map(str::to_string),
            given_name: None,
            family_name: None,
            picture: None,
            locale: None,
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_authorize_url() {
        let url = authorize_url(&config(), "test_state_123");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("state=test_state_123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
    }

    #[test]
    fn test_authorize_url_special_characters() {
        let mut cfg = config();
        cfg.client_id = "client&id=test".to_string();

        let url = authorize_url(&cfg, "state with spaces");

        // Special characters should be URL encoded
        assert!(url.contains("client_id=client%26id%3Dtest"));
        assert!(url.contains("state=state%20with%20spaces"));
    }

    #[test]
    fn test_verify_accepts_valid_assertion() {
        assert!(id_info(Some("a@b.c"), None).verify("test_client_id").is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_audience() {
        let info = id_info(None, None);
        assert_eq!(info.verify("other_client"), Err(IdentityError::Audience));
    }

    #[test]
    fn test_verify_rejects_wrong_issuer() {
        let mut info = id_info(None, None);
        info.iss = "google.com".to_string();
        assert_eq!(info.verify("test_client_id"), Err(IdentityError::Issuer));

        info.iss = "https://accounts.google.com".to_string();
        assert!(info.verify("test_client_id").is_ok());
    }

    #[test]
    fn test_verify_rejects_expired_assertion() {
        let mut info = id_info(None, None);
        info.exp = (Utc::now() - Duration::minutes(1)).timestamp();
        assert_eq!(info.verify("test_client_id"), Err(IdentityError::Expired));
    }

    #[test]
    fn test_username_prefers_email_local_part() {
        assert_eq!(id_info(Some("jeff@mail.ru"), None).username(), "jeff");
    }

    #[test]
    fn test_username_from_name_is_disambiguated() {
        let username = id_info(None, Some("larry")).username();
        assert!(username.starts_with("larry-"));
        // Random suffix means the name alone is never the username
        assert_ne!(username, "larry");
        assert_eq!(username.len(), "larry-".len() + 8);
    }

    #[test]
    fn test_username_generated_when_nothing_known() {
        let username = id_info(None, None).username();
        assert!(username.starts_with("user-"));
        assert_eq!(username.len(), "user-".len() + 8);
    }

    #[test]
    fn test_username_is_unique_per_call() {
        let info = id_info(None, Some("larry"));
        assert_ne!(info.username(), info.username());
    }

    #[test]
    fn test_from_id_token_decodes_payload() {
        let payload = serde_json::json!({
            "aud": "test_client_id",
            "exp": (Utc::now() + Duration::days(1)).timestamp(),
            "iat": Utc::now().timestamp(),
            "iss": "accounts.google.com",
            "sub": "12345",
            "email": "alice@example.com",
        });
        let token = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes()),
            URL_SAFE_NO_PAD.encode(b"unchecked-signature"),
        );

        let info = IdInfo::from_id_token(&token).expect("Failed to decode ID token");
        assert_eq!(info.sub, "12345");
        assert_eq!(info.email.as_deref(), Some("alice@example.com"));
        assert!(info.verify("test_client_id").is_ok());
    }

    #[test]
    fn test_from_id_token_rejects_garbage() {
        assert!(matches!(
            IdInfo::from_id_token("no-dots-here"),
            Err(IdentityError::Malformed)
        ));
        assert!(matches!(
            IdInfo::from_id_token("a.!!!.c"),
            Err(IdentityError::Malformed)
        ));
    }
}
