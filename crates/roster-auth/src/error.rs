//! Error types for session operations

use roster_directory::IdentityError;
use thiserror::Error;

/// Session authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email, wrong password, or no usable credential.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password reset targeted an unknown account.
    #[error("User with email {0} does not exist")]
    UnknownUser(String),

    /// Session token has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// Session token is malformed or carries a bad signature.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token issuer misconfiguration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error (storage, hashing).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for session operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_) => 401,
            AuthError::UnknownUser(_) => 404,
            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => AuthError::InvalidCredentials,
            IdentityError::UserNotFound(email) => AuthError::UnknownUser(email),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
