//! Middleware for the nimbus-web-api application.
//!
//! This module contains:
//! - `auth` - Bearer token extraction (BearerToken extractor)
//! - `rate_limit` - Rate limiting middleware using Governor

pub mod auth;
pub mod rate_limit;

// Re-export commonly used types
pub use auth::{AuthHeaderError, BearerToken};
pub use rate_limit::{create_dev_rate_limiter, create_rate_limiter, RateLimiter, RateLimiterConfig};
