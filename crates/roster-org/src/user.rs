//! User accounts
//!
//! A user is identified by a unique, case-normalized email address. The
//! credential digest is opaque to this crate; hashing and verification live
//! behind the store layer's hasher capability.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::SettingsBag;
use crate::status::EntityStatus;

/// Normalize an email address for storage and lookup.
///
/// Emails are trimmed and lowercased so `" Ada@X.COM "` and `"ada@x.com"`
/// resolve to the same account.
///
/// # Examples
///
/// ```
/// use roster_org::normalize_email;
///
/// assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
/// ```
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A user account.
///
/// Users are created on sign-up (with a credential) or on first invite
/// reference (without one; `credential_digest` stays `None` until a
/// password-reset or invite-accept flow sets it). A user is destroyed only
/// by explicit deletion, which cascades to its memberships.
///
/// # Examples
///
/// ```
/// use roster_org::User;
///
/// let user = User::new(" Ada@Example.com ");
/// assert_eq!(user.email, "ada@example.com");
/// assert!(user.credential_digest.is_none());
/// assert!(user.status.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Email address, unique across the platform (normalized).
    pub email: String,

    /// Hashed credential; `None` until a password is set.
    pub credential_digest: Option<String>,

    /// Opaque profile bag.
    #[serde(default)]
    pub profile: SettingsBag,

    /// Lifecycle status.
    pub status: EntityStatus,

    /// Opaque settings bag.
    #[serde(default)]
    pub settings: SettingsBag,

    /// Epoch-millis creation time, stamped by the store on first insert.
    pub created_at: i64,

    /// Epoch-millis last-write time, stamped by the store on every write.
    pub updated_at: i64,
}

impl User {
    /// Create a credential-less user, as the invite flow does.
    ///
    /// The email is normalized. Timestamps stay at zero until the store
    /// persists the row.
    pub fn new(email: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: normalize_email(email.as_ref()),
            credential_digest: None,
            profile: SettingsBag::new(),
            status: EntityStatus::Active,
            settings: SettingsBag::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Create a user with an already-hashed credential, as sign-up does.
    pub fn with_credential(email: impl AsRef<str>, digest: impl Into<String>) -> Self {
        let mut user = Self::new(email);
        user.credential_digest = Some(digest.into());
        user
    }

    /// Attach a profile bag.
    pub fn with_profile(mut self, profile: SettingsBag) -> Self {
        self.profile = profile;
        self
    }

    /// `true` once a password has been set for this account.
    pub fn has_credential(&self) -> bool {
        self.credential_digest.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("  Grace@Example.COM ");
        assert_eq!(user.email, "grace@example.com");
        assert!(!user.has_credential());
        assert_eq!(user.created_at, 0);
        assert_eq!(user.updated_at, 0);
    }

    #[test]
    fn test_with_credential() {
        let user = User::with_credential("grace@example.com", "digest");
        assert_eq!(user.credential_digest.as_deref(), Some("digest"));
        assert!(user.has_credential());
    }

    #[test]
    fn test_with_profile() {
        let mut profile = SettingsBag::new();
        profile.insert("name", "Grace");
        let user = User::new("grace@example.com").with_profile(profile);
        assert!(user.profile.get("name").is_some());
    }
}
