//! Identity token issuance and verification
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing. Access
//! tokens carry the user id and role and expire after a fixed lifetime.
//! The signing secret is injected at construction time and read-only for
//! the life of the process.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ladle_core::AuthConfig;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user id
    pub sub: String,
    /// Unique token identifier
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// User's role
    pub role: String,
}

impl Claims {
    /// Numeric user id carried in `sub`.
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// Token issuance and verification errors.
///
/// Verification failures never say why: malformed tokens, signature
/// mismatches, and expired tokens all collapse into [`TokenError::Invalid`].
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid,

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token lifetime in seconds
    pub expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            expiration_secs: auth.token_expiration_secs,
            issuer: auth.issuer.clone(),
        }
    }
}

/// Issue a signed access token for an authenticated user.
pub fn issue_access_token(
    config: &JwtConfig,
    user_id: i64,
    role: &str,
) -> Result<String, TokenError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + config.expiration_secs,
        role: role.to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

/// Verify an access token and extract its claims.
///
/// The rejection reason is logged at debug level only; callers see a single
/// undifferentiated failure.
pub fn verify_access_token(config: &JwtConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(reason = %e, "token verification failed");
        TokenError::Invalid
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::from(&AuthConfig::default())
    }

    #[test]
    fn test_issue_and_verify_token() {
        let config = test_config();

        let token = issue_access_token(&config, 42, "user").expect("failed to issue token");
        let claims = verify_access_token(&config, &token).expect("failed to verify token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "user");
        assert_eq!(claims.iss, "ladle-api");
        assert_eq!(claims.exp, claims.iat + config.expiration_secs);
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let config = test_config();
        let result = verify_access_token(&config, "not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let config1 = JwtConfig {
            secret: "secret1".to_string(),
            ..test_config()
        };
        let config2 = JwtConfig {
            secret: "secret2".to_string(),
            ..test_config()
        };

        let token = issue_access_token(&config1, 1, "user").unwrap();
        let result = verify_access_token(&config2, &token);

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let config = test_config();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();

        // Expired 1 hour ago
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: "1".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
            role: "user".to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_access_token(&config, &token);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let config = test_config();
        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        };

        let token = issue_access_token(&other, 1, "user").unwrap();
        let result = verify_access_token(&config, &token);

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            iss: "ladle-api".to_string(),
            sub: "abc".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: 0,
            exp: 0,
            role: "user".to_string(),
        };

        assert!(matches!(claims.user_id(), Err(TokenError::Invalid)));
    }
}
