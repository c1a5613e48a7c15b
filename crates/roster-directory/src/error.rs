//! Error types for storage operations
//!
//! Constraint violations surface as typed errors so callers can map them to
//! domain failures (duplicate email → conflict, missing row → not found)
//! without ever seeing backend-specific exceptions.

use thiserror::Error;
use uuid::Uuid;

/// Storage error types.
///
/// Every variant corresponds to a constraint the store enforces at commit
/// time. A failed commit applies none of its writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-email constraint violation.
    #[error("email {0} is already registered")]
    EmailTaken(String),

    /// Unique (user, org) membership constraint violation.
    #[error("user {user_id} is already a member of organization {org_id}")]
    DuplicateMember { user_id: Uuid, org_id: Uuid },

    /// A write referenced a row that does not exist.
    #[error("{entity} {id} does not exist")]
    RowMissing { entity: &'static str, id: Uuid },

    /// A member row referenced a role owned by a different organization.
    #[error("role {role_id} does not belong to organization {org_id}")]
    RoleOutsideOrg { role_id: Uuid, org_id: Uuid },

    /// A delete would leave member rows pointing at a missing row.
    #[error("{entity} {id} is still referenced by member rows")]
    StillReferenced { entity: &'static str, id: Uuid },
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// `true` if the error is a uniqueness conflict a caller may resolve by
    /// re-reading and retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::EmailTaken(_) | StoreError::DuplicateMember { .. }
        )
    }
}
