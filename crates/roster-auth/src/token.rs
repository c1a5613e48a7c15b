//! Session token issuance and validation
//!
//! The [`TokenIssuer`] capability hides JWT mechanics from the session
//! issuer. The production implementation signs HS256 tokens with
//! `jsonwebtoken`.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claims::{SessionClaims, TokenType};
use crate::error::{AuthError, AuthResult};

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret. Falls back to `ROSTER_JWT_SECRET` when unset.
    pub secret: Option<String>,

    /// Token issuer claim.
    pub issuer: String,

    /// Access token validity.
    pub access_token_duration: Duration,

    /// Refresh token validity.
    pub refresh_token_duration: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("ROSTER_JWT_SECRET").ok(),
            issuer: "roster-platform".to_string(),
            access_token_duration: Duration::hours(1),
            refresh_token_duration: Duration::days(7),
        }
    }
}

/// Access/refresh token pair returned on successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,

    /// Refresh token (long-lived).
    pub refresh_token: String,

    /// Token type (always "Bearer").
    pub token_type: String,

    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Create a new token pair.
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// The session token capability.
pub trait TokenIssuer: Send + Sync {
    /// Issue an access/refresh pair for a user.
    fn issue_pair(&self, user_id: Uuid, email: &str) -> AuthResult<TokenPair>;

    /// Validate a token and return its claims.
    fn validate(&self, token: &str) -> AuthResult<SessionClaims>;
}

/// HS256 JWT implementation of [`TokenIssuer`].
pub struct JwtTokenIssuer {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("issuer", &self.config.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtTokenIssuer {
    /// Create an issuer from configuration.
    ///
    /// Fails with [`AuthError::ConfigError`] when no secret is configured.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        let secret = config
            .secret
            .as_ref()
            .ok_or_else(|| AuthError::ConfigError("Signing secret required".to_string()))?;
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Create with an explicit secret and defaults for everything else.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        let config = TokenConfig {
            secret: Some(secret.into()),
            ..Default::default()
        };
        Self::new(config)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    fn encode_claims(&self, claims: &SessionClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|err| AuthError::Internal(format!("Token encoding failed: {err}")))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_pair(&self, user_id: Uuid, email: &str) -> AuthResult<TokenPair> {
        let access = SessionClaims::new(
            user_id,
            email,
            &self.config.issuer,
            self.config.access_token_duration,
        );
        let refresh = SessionClaims::new(
            user_id,
            email,
            &self.config.issuer,
            self.config.refresh_token_duration,
        )
        .with_token_type(TokenType::Refresh);

        Ok(TokenPair::new(
            self.encode_claims(&access)?,
            self.encode_claims(&refresh)?,
            self.config.access_token_duration.num_seconds(),
        ))
    }

    fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AuthError::InvalidToken("Malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("Invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AuthError::InvalidToken("Invalid issuer".to_string())
                }
                _ => AuthError::InvalidToken(err.to_string()),
            },
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> String {
        "test-secret-key-for-jwt-signing-minimum-32-chars".to_string()
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let config = TokenConfig {
            secret: None,
            ..Default::default()
        };
        assert!(matches!(
            JwtTokenIssuer::new(config),
            Err(AuthError::ConfigError(_))
        ));
    }

    #[test]
    fn test_issue_and_validate_pair() {
        let issuer = JwtTokenIssuer::with_secret(test_secret()).unwrap();
        let user_id = Uuid::now_v7();

        let pair = issuer.issue_pair(user_id, "ada@example.com").unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);

        let access = issuer.validate(&pair.access_token).unwrap();
        assert_eq!(access.user_id(), Some(user_id));
        assert_eq!(access.email, "ada@example.com");
        assert_eq!(access.token_type, TokenType::Access);

        let refresh = issuer.validate(&pair.refresh_token).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let issuer = JwtTokenIssuer::with_secret(test_secret()).unwrap();
        let result = issuer.validate("not-a-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = JwtTokenIssuer::with_secret(test_secret()).unwrap();
        let other = JwtTokenIssuer::with_secret("another-secret-key-that-is-32-chars!").unwrap();

        let pair = other.issue_pair(Uuid::now_v7(), "ada@example.com").unwrap();
        let result = issuer.validate(&pair.access_token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
