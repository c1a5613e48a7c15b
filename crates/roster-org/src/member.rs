//! Membership rows
//!
//! A member row is the many-to-many join of a user and an organization with
//! an attached role. At most one row exists per (user, org) pair.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::SettingsBag;
use crate::status::EntityStatus;

/// A user's membership in an organization.
///
/// The row lifecycle is absent → active → removed: removal deletes the row,
/// and a later invite creates a fresh row (no stale role references
/// survive).
///
/// # Examples
///
/// ```
/// use roster_org::{Member, Organization, Role, User};
///
/// let org = Organization::new("Acme Corp");
/// let user = User::new("ada@acme.example");
/// let role = Role::owner(org.id);
/// let member = Member::new(org.id, user.id, role.id);
/// assert!(member.status.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique row identifier.
    pub id: Uuid,

    /// Organization joined.
    pub org_id: Uuid,

    /// Joining user.
    pub user_id: Uuid,

    /// Role held within the organization; must belong to `org_id`.
    pub role_id: Uuid,

    /// Lifecycle status; new rows are active.
    pub status: EntityStatus,

    /// Opaque settings bag.
    #[serde(default)]
    pub settings: SettingsBag,

    /// Epoch-millis creation time, stamped by the store on first insert.
    pub created_at: i64,

    /// Epoch-millis last-write time, stamped by the store on every write.
    pub updated_at: i64,
}

impl Member {
    /// Create a new active membership row.
    ///
    /// Timestamps stay at zero until the store persists the row.
    pub fn new(org_id: Uuid, user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            org_id,
            user_id,
            role_id,
            status: EntityStatus::Active,
            settings: SettingsBag::new(),
            created_at: 0,
            updated_at: 0,
        }
    }
}
