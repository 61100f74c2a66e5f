//! Data models for the nimbus-web-api application.
//!
//! This module contains the database models used throughout the application:
//! - [`User`] - Represents a Google-authenticated user
//! - [`TokenInfo`] - The per-user refresh token slot

pub mod token;
pub mod user;

pub use token::TokenInfo;
pub use user::User;
