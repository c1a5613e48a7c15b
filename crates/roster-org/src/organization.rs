//! Organization tenants
//!
//! Organizations are the top-level tenant entities. Each owns its roles and
//! member rows; deleting an organization removes both (the engine issues the
//! cascade explicitly).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::SettingsBag;
use crate::status::EntityStatus;

/// An organization tenant.
///
/// Created on sign-up (one per new user) or explicitly. Roles and member
/// rows are scoped to the owning organization and are deleted with it.
///
/// # Examples
///
/// ```
/// use roster_org::Organization;
///
/// let org = Organization::new("Acme Corp");
/// assert_eq!(org.name, "Acme Corp");
/// assert!(!org.personal);
/// assert!(org.status.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier.
    pub id: Uuid,

    /// Human-readable name.
    pub name: String,

    /// Lifecycle status.
    pub status: EntityStatus,

    /// `true` for single-user personal workspaces.
    pub personal: bool,

    /// Opaque settings bag.
    #[serde(default)]
    pub settings: SettingsBag,

    /// Epoch-millis creation time, stamped by the store on first insert.
    pub created_at: i64,

    /// Epoch-millis last-write time, stamped by the store on every write.
    pub updated_at: i64,
}

impl Organization {
    /// Create a new organization.
    ///
    /// Timestamps stay at zero until the store persists the row.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            status: EntityStatus::Active,
            personal: false,
            settings: SettingsBag::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Mark this organization as a personal workspace.
    pub fn with_personal(mut self, personal: bool) -> Self {
        self.personal = personal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_creation() {
        let org = Organization::new("Acme Corp");
        assert_eq!(org.name, "Acme Corp");
        assert!(!org.personal);
        assert_eq!(org.status, EntityStatus::Active);
    }

    #[test]
    fn test_with_personal() {
        let org = Organization::new("Ada's Space").with_personal(true);
        assert!(org.personal);
    }
}
