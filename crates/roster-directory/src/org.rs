//! Organization store
//!
//! Owns organizations and their org-scoped roles. Every role fetch used by
//! membership operations goes through the org-scope check here.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use roster_org::{Organization, Role};

use crate::directory::{Directory, Write};
use crate::error::StoreError;

/// Organization store error types.
#[derive(Debug, Error)]
pub enum OrgError {
    /// Organization name was empty.
    #[error("organization name is required")]
    NameRequired,

    /// No organization with this id.
    #[error("organization {0} not found")]
    OrgNotFound(Uuid),

    /// No role with this id.
    #[error("role {0} not found")]
    RoleNotFound(Uuid),

    /// The role exists but is owned by a different organization.
    #[error("role {role_id} does not belong to organization {org_id}")]
    RoleOrgMismatch { role_id: Uuid, org_id: Uuid },

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Organizations and their roles.
pub struct OrganizationStore<D> {
    directory: Arc<D>,
}

impl<D> Clone for OrganizationStore<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D: Directory> OrganizationStore<D> {
    /// Create an organization store over a directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Create a new organization.
    pub async fn create_organization(&self, name: &str) -> Result<Organization, OrgError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrgError::NameRequired);
        }

        let org = Organization::new(name);
        self.directory
            .commit(vec![Write::InsertOrganization(org.clone())])
            .await?;
        self.get_organization(org.id).await
    }

    /// Create a role scoped to an organization.
    pub async fn create_role(
        &self,
        org_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Role, OrgError> {
        // The store would reject the insert too; checking here turns the
        // failure into the right not-found error instead of a raw row error.
        self.get_organization(org_id).await?;

        let mut role = Role::new(org_id, name);
        if let Some(description) = description {
            role = role.with_description(description);
        }
        self.directory
            .commit(vec![Write::InsertRole(role.clone())])
            .await?;
        Ok(role)
    }

    /// Fetch an organization by id.
    pub async fn get_organization(&self, org_id: Uuid) -> Result<Organization, OrgError> {
        self.directory
            .organization(org_id)
            .await?
            .ok_or(OrgError::OrgNotFound(org_id))
    }

    /// Fetch a role and confirm it belongs to the expected organization.
    ///
    /// Membership operations must use this instead of a bare role lookup so
    /// a role id from another tenant cannot be attached across
    /// organizations.
    pub async fn get_role(&self, org_id: Uuid, role_id: Uuid) -> Result<Role, OrgError> {
        let role = self
            .directory
            .role(role_id)
            .await?
            .ok_or(OrgError::RoleNotFound(role_id))?;
        if role.org_id != org_id {
            return Err(OrgError::RoleOrgMismatch { role_id, org_id });
        }
        Ok(role)
    }
}
