use std::env;

use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Default Google OAuth2 authorization endpoint.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Default Google OAuth2 token endpoint.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    // Endpoint overrides, used by tests to point at a mock server
    pub google_auth_url: String,
    pub google_token_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_min: i64,
    pub refresh_token_expire_days: i64,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ok if it doesn't exist)
        // Skip loading .env in test mode to allow tests to control env vars
        if env::var("NIMBUS_TEST_MODE").is_err() {
            dotenvy::dotenv().ok();
        }

        // Required variables
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| ConfigError::MissingVar("GOOGLE_CLIENT_ID".to_string()))?;

        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| ConfigError::MissingVar("GOOGLE_CLIENT_SECRET".to_string()))?;

        let google_redirect_uri = env::var("GOOGLE_REDIRECT_URI")
            .map_err(|_| ConfigError::MissingVar("GOOGLE_REDIRECT_URI".to_string()))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        // Optional variables with defaults
        let google_auth_url =
            env::var("GOOGLE_AUTH_URL").unwrap_or_else(|_| GOOGLE_AUTH_URL.to_string());

        let google_token_url =
            env::var("GOOGLE_TOKEN_URL").unwrap_or_else(|_| GOOGLE_TOKEN_URL.to_string());

        let jwt_algorithm = match env::var("JWT_ALGORITHM") {
            Ok(value) => parse_hmac_algorithm(&value)?,
            Err(_) => Algorithm::HS256,
        };

        let access_token_expire_min = env::var("ACCESS_TOKEN_EXPIRE_MIN")
            .ok()
            .map(|v| {
                v.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                    var: "ACCESS_TOKEN_EXPIRE_MIN".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(30); // Default: 30 minutes

        let refresh_token_expire_days = env::var("REFRESH_TOKEN_EXPIRE_DAYS")
            .ok()
            .map(|v| {
                v.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                    var: "REFRESH_TOKEN_EXPIRE_DAYS".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(7); // Default: 7 days

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .ok()
            .map(|v| {
                v.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    var: "PORT".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(8080); // Default: 8080

        Ok(Config {
            database_url,
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            google_auth_url,
            google_token_url,
            jwt_secret,
            jwt_algorithm,
            access_token_expire_min,
            refresh_token_expire_days,
            host,
            port,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses a JWT signing algorithm name. Only HMAC variants are accepted,
/// since the signing key is a shared secret.
fn parse_hmac_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::InvalidValue {
            var: "JWT_ALGORITHM".to_string(),
            message: format!("unsupported algorithm: {other}"),
        }),
    }
}
