//! Bearer token extraction for authenticated endpoints.
//!
//! The extractor only parses the Authorization header; resolving the token
//! to a user (including the disabled-account check) happens in
//! `services::auth`, which needs the database.

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// The raw bearer token presented with a request.
///
/// # Example
///
/// ```ignore
/// use crate::middleware::auth::BearerToken;
///
/// async fn protected_route(token: BearerToken, data: web::Data<AppState>) -> AppResult<HttpResponse> {
///     let user = data.auth.authenticate_access(token.as_str()).await?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error type for header-level authentication failures.
#[derive(Debug)]
pub enum AuthHeaderError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader,
}

impl std::fmt::Display for AuthHeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthHeaderError::MissingToken => write!(f, "Missing authorization token"),
            AuthHeaderError::InvalidHeader => write!(f, "Invalid authorization header format"),
        }
    }
}

impl actix_web::ResponseError for AuthHeaderError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let body = serde_json::json!({
            "error": self.to_string()
        });
        actix_web::HttpResponse::build(self.status_code())
            .append_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(body)
    }
}

impl FromRequest for BearerToken {
    type Error = AuthHeaderError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let result = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                Ok(BearerToken(header[7..].to_string()))
            }
            Some(_) => Err(AuthHeaderError::InvalidHeader),
            None => Err(AuthHeaderError::MissingToken),
        };

        ready(result)
    }
}
