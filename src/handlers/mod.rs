//! HTTP handlers for the nimbus-web-api application.
//!
//! This module contains all the route handlers:
//! - `auth` - Google OAuth and token lifecycle handlers
//! - `health` - Health check endpoint

pub mod auth;
pub mod health;

// Re-export commonly used types
pub use auth::{
    login, logout, refresh_access_token, swap_token, user_info, AppState, LoginQuery,
    RefreshQuery, SwapTokenForm, UserResponse,
};
pub use health::{health_check, HealthResponse};
