//! Organization-scoped roles
//!
//! Roles are data rows owned by exactly one organization, not a fixed
//! hierarchy. Two organizations may both define a "Viewer" role; the rows
//! are distinct and never shared.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role scoped to one organization.
///
/// A member's `role_id` must reference a role belonging to the member's own
/// organization; the store rejects cross-org references at commit time.
///
/// # Examples
///
/// ```
/// use roster_org::{Organization, Role};
///
/// let org = Organization::new("Acme Corp");
/// let owner = Role::owner(org.id);
/// assert_eq!(owner.name, Role::OWNER);
/// assert_eq!(owner.org_id, org.id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier.
    pub id: Uuid,

    /// Owning organization.
    pub org_id: Uuid,

    /// Role name, unique only by convention within an organization.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,
}

impl Role {
    /// Name of the role auto-provisioned for an organization's creator.
    pub const OWNER: &'static str = "Owner";

    /// Create a new role within an organization.
    pub fn new(org_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            org_id,
            name: name.into(),
            description: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the "Owner" role created with every new organization.
    pub fn owner(org_id: Uuid) -> Self {
        Self::new(org_id, Self::OWNER)
    }

    /// `true` if this is an organization's owner role.
    pub fn is_owner(&self) -> bool {
        self.name == Self::OWNER
    }
}
