//! nimbus-web-api - Google OAuth authentication API
//!
//! This crate provides a Google OAuth2 authentication flow with JWT token
//! management: authorization-code exchange, ID-token claim verification,
//! user upsert keyed by the provider subject, and access/refresh token pairs
//! with hashed single-slot refresh token rotation.
//!
//! # Modules
//!
//! - [`config`] - Application configuration from environment variables
//! - [`db`] - Database connection pool and migrations
//! - [`error`] - Unified error handling
//! - [`models`] - Database models (User, TokenInfo)
//! - [`services`] - Business logic (Google OAuth, token lifecycle, user directory)
//! - [`handlers`] - HTTP route handlers
//! - [`middleware`] - Bearer extraction and rate limiting middleware

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

// Re-export commonly used types at the crate root
pub use config::{Config, ConfigError};
pub use db::{create_pool, run_migrations};
pub use error::{AppError, AppResult};
pub use handlers::auth::AppState;
pub use models::{TokenInfo, User};
pub use services::{
    AuthError, AuthService, Claims, GoogleOAuthConfig, IdInfo, IdentityError, ProviderError,
    TokenCodec, TokenError, TokenKind, TokenPair,
};
