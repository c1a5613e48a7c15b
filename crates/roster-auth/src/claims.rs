//! Claims carried by session tokens

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a token grants access or only refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on requests.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// JWT claims for a Roster session token.
///
/// Standard RFC 7519 fields plus the account email and the token type, so
/// a refresh token cannot be presented as an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id).
    pub sub: String,

    /// Issuer.
    pub iss: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Unique token id.
    pub jti: String,

    /// Account email.
    pub email: String,

    /// Access or refresh.
    pub token_type: TokenType,
}

impl SessionClaims {
    /// Create access-token claims for a user.
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        issuer: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iss: issuer.into(),
            exp: (now + duration).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            email: email.into(),
            token_type: TokenType::Access,
        }
    }

    /// Override the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// The subject parsed back into a user id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// `true` once the expiration time has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
