//! Command-level error payloads
//!
//! Internal errors collapse into a four-kind taxonomy: validation,
//! not-found, conflict, auth (plus internal for everything a client cannot
//! act on). The payload is what an HTTP layer would serialize.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roster_auth::AuthError;
use roster_directory::StoreError;
use roster_membership::MembershipError;

/// Failure taxonomy exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input or a missing required field.
    Validation,
    /// Referenced entity does not exist.
    NotFound,
    /// Uniqueness conflict (duplicate email, already a member).
    Conflict,
    /// Credential failure.
    Auth,
    /// Server-side failure the client cannot act on.
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Auth => 401,
            ErrorKind::Internal => 500,
        }
    }
}

/// Structured command failure payload.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Failure taxonomy.
    pub kind: ErrorKind,

    /// Human-readable message.
    pub message: String,

    /// Offending input field, when the failure is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Build a validation failure tied to a field.
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    fn bare(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match &err {
            MembershipError::EmailRequired | MembershipError::EmailInvalid(_) => {
                ApiError::validation(err.to_string(), "email")
            }
            MembershipError::PasswordRequired => ApiError::validation(err.to_string(), "password"),
            MembershipError::OrgNameRequired => ApiError::validation(err.to_string(), "org_name"),
            MembershipError::RoleOrgMismatch { .. } => {
                ApiError::validation(err.to_string(), "role_id")
            }
            MembershipError::EmailTaken(_) => ApiError::bare(ErrorKind::Conflict, err.to_string()),
            MembershipError::AlreadyMember { .. } => ApiError::bare(
                ErrorKind::Conflict,
                "User is already a member of this organization.",
            ),
            MembershipError::OrgNotFound(_) => {
                ApiError::bare(ErrorKind::NotFound, "Organization not found.")
            }
            MembershipError::RoleNotFound(_) => {
                ApiError::bare(ErrorKind::NotFound, "Role not found.")
            }
            MembershipError::MemberNotFound { .. } => ApiError::bare(
                ErrorKind::NotFound,
                "This member is not part of the specified organization.",
            ),
            MembershipError::UserNotFound(_) => {
                ApiError::bare(ErrorKind::NotFound, "User not found.")
            }
            MembershipError::Identity(_) | MembershipError::Store(_) => {
                tracing::error!(error = %err, "internal membership failure");
                ApiError::bare(ErrorKind::Internal, "Internal error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidCredentials => {
                ApiError::bare(ErrorKind::Auth, "Invalid credentials")
            }
            AuthError::UnknownUser(_) => ApiError::bare(
                ErrorKind::NotFound,
                "User with this email does not exist",
            ),
            AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                ApiError::bare(ErrorKind::Auth, err.to_string())
            }
            AuthError::ConfigError(_) | AuthError::Internal(_) => {
                tracing::error!(error = %err, "internal auth failure");
                ApiError::bare(ErrorKind::Internal, "Internal error")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "internal storage failure");
        ApiError::bare(ErrorKind::Internal, "Internal error")
    }
}
