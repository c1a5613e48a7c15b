//! Error types for membership operations
//!
//! Store-level constraint violations are mapped here into domain failures;
//! callers above the engine never see raw storage errors for uniqueness
//! conflicts (duplicate email, duplicate membership).

use thiserror::Error;
use uuid::Uuid;

use roster_directory::{IdentityError, OrgError, StoreError};

/// Membership engine error types.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Email was empty.
    #[error("email is required")]
    EmailRequired,

    /// Email is not a plausible address.
    #[error("email {0} is not a valid address")]
    EmailInvalid(String),

    /// Password was empty on sign-up.
    #[error("password is required")]
    PasswordRequired,

    /// Organization name was empty on sign-up.
    #[error("organization name is required")]
    OrgNameRequired,

    /// Another account already uses this email.
    #[error("email {0} is already registered")]
    EmailTaken(String),

    /// No organization with this id.
    #[error("organization {0} not found")]
    OrgNotFound(Uuid),

    /// No role with this id.
    #[error("role {0} not found")]
    RoleNotFound(Uuid),

    /// The role belongs to a different organization.
    #[error("role {role_id} does not belong to organization {org_id}")]
    RoleOrgMismatch { role_id: Uuid, org_id: Uuid },

    /// The user is already a member of the organization.
    #[error("user {user_id} is already a member of organization {org_id}")]
    AlreadyMember { user_id: Uuid, org_id: Uuid },

    /// No member row for this (user, org) pair.
    #[error("user {user_id} is not a member of organization {org_id}")]
    MemberNotFound { user_id: Uuid, org_id: Uuid },

    /// No user with this id.
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// Identity store failure not covered by a variant above.
    #[error("identity error: {0}")]
    Identity(IdentityError),

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for MembershipError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken(email) => MembershipError::EmailTaken(email),
            StoreError::DuplicateMember { user_id, org_id } => {
                MembershipError::AlreadyMember { user_id, org_id }
            }
            other => MembershipError::Store(other),
        }
    }
}

impl From<OrgError> for MembershipError {
    fn from(err: OrgError) -> Self {
        match err {
            OrgError::NameRequired => MembershipError::OrgNameRequired,
            OrgError::OrgNotFound(id) => MembershipError::OrgNotFound(id),
            OrgError::RoleNotFound(id) => MembershipError::RoleNotFound(id),
            OrgError::RoleOrgMismatch { role_id, org_id } => {
                MembershipError::RoleOrgMismatch { role_id, org_id }
            }
            OrgError::Store(store) => store.into(),
        }
    }
}

impl From<IdentityError> for MembershipError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailRequired => MembershipError::EmailRequired,
            IdentityError::EmailInvalid(email) => MembershipError::EmailInvalid(email),
            IdentityError::EmailTaken(email) => MembershipError::EmailTaken(email),
            IdentityError::Store(store) => store.into(),
            other => MembershipError::Identity(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflicts_become_domain_errors() {
        let err: MembershipError = StoreError::EmailTaken("a@x.com".into()).into();
        assert!(matches!(err, MembershipError::EmailTaken(_)));

        let err: MembershipError = StoreError::DuplicateMember {
            user_id: Uuid::now_v7(),
            org_id: Uuid::now_v7(),
        }
        .into();
        assert!(matches!(err, MembershipError::AlreadyMember { .. }));
    }

    #[test]
    fn test_org_errors_map_through() {
        let id = Uuid::now_v7();
        let err: MembershipError = OrgError::OrgNotFound(id).into();
        assert!(matches!(err, MembershipError::OrgNotFound(got) if got == id));
    }
}
