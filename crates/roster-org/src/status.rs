//! Entity lifecycle status shared by users, organizations, and members.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a stored entity.
///
/// Removal is not a status: deleting a member removes its row entirely, and
/// a later invite creates a fresh row in [`EntityStatus::Active`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    /// The entity is live and usable.
    Active,

    /// The entity is retained but disabled.
    Disabled,
}

impl EntityStatus {
    /// `true` if the entity is active.
    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Active)
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active() {
        assert!(EntityStatus::default().is_active());
        assert!(!EntityStatus::Disabled.is_active());
    }

    #[test]
    fn test_snake_case_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&EntityStatus::Disabled).unwrap(),
            "\"disabled\""
        );
    }
}
