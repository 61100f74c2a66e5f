//! Signed, expiring token encoding and decoding.
//!
//! Both access and refresh tokens are JWTs sharing one claim shape. Each
//! token carries an explicit `kind` discriminant so an access check rejects
//! a refresh token outright (and vice versa) instead of relying on call-site
//! discipline. The signing key and algorithm are process-wide configuration,
//! loaded once and held by the codec.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Discriminates access tokens from refresh tokens within the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject - the user ID as a string
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Token kind discriminant
    pub kind: TokenKind,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    /// Expiration time as Unix timestamp
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user UUID.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Errors raised when a presented token cannot be accepted.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed structure, or expired
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// Structurally valid token of the wrong kind
    #[error("token kind mismatch")]
    KindMismatch,
}

/// Encodes and decodes signed claims sets with a fixed key and algorithm.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Creates a codec from the shared signing secret and HMAC algorithm.
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
        }
    }

    /// Signs a token for `user_id` that expires `ttl` from now.
    pub fn encode(
        &self,
        user_id: Uuid,
        username: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(
            &Header::new(self.algorithm),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verifies signature and expiry and checks the token is of the
    /// expected kind.
    pub fn decode(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        if token_data.claims.kind != kind {
            return Err(TokenError::KindMismatch);
        }
        Ok(token_data.claims)
    }

    /// Name of the configured signing algorithm, for the token response.
    pub fn algorithm_name(&self) -> &'static str {
        match self.algorithm {
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            _ => "HS256",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test_secret_key_12345", Algorithm::HS256)
    }

    #[test]
    fn test_encode_produces_jwt() {
        let token = codec()
            .encode(Uuid::new_v4(), "alice", TokenKind::Access, Duration::hours(1))
            .expect("Failed to encode token");
        assert!(!token.is_empty());
        // JWT has three parts separated by dots
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_decode_roundtrip() {
        let user_id = Uuid::new_v4();
        let codec = codec();

        let token = codec
            .encode(user_id, "alice", TokenKind::Access, Duration::hours(1))
            .expect("Failed to encode token");
        let claims = codec
            .decode(&token, TokenKind::Access)
            .expect("Failed to decode token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_decode_wrong_secret() {
        let token = codec()
            .encode(Uuid::new_v4(), "alice", TokenKind::Access, Duration::hours(1))
            .expect("Failed to encode token");

        let other = TokenCodec::new("different_secret", Algorithm::HS256);
        let result = other.decode(&token, TokenKind::Access);

        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_decode_expired() {
        // Well past the default validation leeway
        let token = codec()
            .encode(
                Uuid::new_v4(),
                "alice",
                TokenKind::Access,
                Duration::seconds(-120),
            )
            .expect("Failed to encode token");

        let result = codec().decode(&token, TokenKind::Access);
        assert!(
            matches!(result, Err(TokenError::Invalid(_))),
            "Expected expired token to fail validation"
        );
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let codec = codec();
        let refresh = codec
            .encode(Uuid::new_v4(), "alice", TokenKind::Refresh, Duration::days(7))
            .expect("Failed to encode token");

        let result = codec.decode(&refresh, TokenKind::Access);
        assert!(matches!(result, Err(TokenError::KindMismatch)));

        // And it still decodes fine as what it is
        assert!(codec.decode(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_decode_malformed_token() {
        let result = codec().decode("not.a.jwt", TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_claims_serialization_includes_kind() {
        let claims = Claims {
            sub: "user-123".to_string(),
            username: "alice".to_string(),
            kind: TokenKind::Refresh,
            iat: 1699996400,
            exp: 1700000000,
        };

        let json = serde_json::to_string(&claims).expect("Failed to serialize claims");
        assert!(json.contains("\"kind\":\"refresh\""));
        assert!(json.contains("\"sub\":\"user-123\""));
    }

    #[test]
    fn test_algorithm_name() {
        assert_eq!(codec().algorithm_name(), "HS256");
        assert_eq!(
            TokenCodec::new("s", Algorithm::HS512).algorithm_name(),
            "HS512"
        );
    }
}
