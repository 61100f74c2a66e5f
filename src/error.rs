//! Unified error handling for the nimbus-web-api application.
//!
//! This module provides a centralized error type (`AppError`) that handles
//! all errors throughout the application and maps them to appropriate HTTP
//! responses. Authentication failures are terminal for the request: they are
//! mapped to a status code here, never retried.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;

/// Unified application error type.
///
/// All errors in the application are converted to this type, which implements
/// `actix_web::ResponseError` for automatic HTTP response generation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database errors from SQLx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication subsystem errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(e) => match e {
                AuthError::Credentials | AuthError::Identity(_) => StatusCode::UNAUTHORIZED,
                AuthError::Inactive => StatusCode::FORBIDDEN,
                AuthError::Provider(_) => StatusCode::BAD_REQUEST,
                AuthError::Database(_) | AuthError::TokenProcessing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let error_message = match self {
            // For database and internal errors, don't expose internal details
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Auth(e) => match e {
                AuthError::Database(_) | AuthError::TokenProcessing(_) => {
                    "Internal server error".to_string()
                }
                AuthError::Provider(_) => {
                    "Failed to get Google OAuth data. Try to reload the page.".to_string()
                }
                // Inactive accounts are named only at direct authentication
                // checkpoints; everything else collapses to one message
                AuthError::Credentials | AuthError::Identity(_) => {
                    "Could not validate credentials".to_string()
                }
                AuthError::Inactive => "Inactive user".to_string(),
            },
            AppError::BadRequest(msg) => msg.clone(),
        };

        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            builder.append_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(serde_json::json!({ "error": error_message }))
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
