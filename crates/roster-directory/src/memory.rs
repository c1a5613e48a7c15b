//! In-memory directory implementation
//!
//! Suitable for single-process deployments and tests. Commits clone the
//! table state, apply every write to the clone, and swap it in only when the
//! whole batch succeeds, so a failed batch is invisible to readers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use roster_org::{normalize_email, Member, Organization, Role, User};

use crate::directory::{Directory, Write};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    organizations: HashMap<Uuid, Organization>,
    roles: HashMap<Uuid, Role>,
    members: HashMap<Uuid, Member>,
}

impl Tables {
    fn user_with_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    fn member_for(&self, user_id: Uuid, org_id: Uuid) -> Option<&Member> {
        self.members
            .values()
            .find(|m| m.user_id == user_id && m.org_id == org_id)
    }

    fn members_reference_user(&self, user_id: Uuid) -> bool {
        self.members.values().any(|m| m.user_id == user_id)
    }

    fn members_reference_org(&self, org_id: Uuid) -> bool {
        self.members.values().any(|m| m.org_id == org_id)
    }

    fn members_reference_role(&self, role_id: Uuid) -> bool {
        self.members.values().any(|m| m.role_id == role_id)
    }

    fn roles_reference_org(&self, org_id: Uuid) -> bool {
        self.roles.values().any(|r| r.org_id == org_id)
    }
}

/// In-memory [`Directory`] implementation.
///
/// All tables live behind one `RwLock`; a commit holds the write lock for
/// the duration of the batch, so concurrent commits serialize and each one
/// observes the other's constraints (two racing inserts of the same email
/// cannot both land).
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    tables: RwLock<Tables>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(tables: &mut Tables, write: Write, now_ms: i64) -> StoreResult<()> {
        match write {
            Write::InsertUser(mut user) => {
                if tables.user_with_email(&user.email).is_some() {
                    return Err(StoreError::EmailTaken(user.email));
                }
                user.created_at = now_ms;
                user.updated_at = now_ms;
                tables.users.insert(user.id, user);
            }
            Write::UpdateUser(mut user) => {
                let existing =
                    tables.users.get(&user.id).ok_or(StoreError::RowMissing {
                        entity: "user",
                        id: user.id,
                    })?;
                if let Some(other) = tables.user_with_email(&user.email) {
                    if other.id != user.id {
                        return Err(StoreError::EmailTaken(user.email));
                    }
                }
                user.created_at = existing.created_at;
                user.updated_at = now_ms;
                tables.users.insert(user.id, user);
            }
            Write::DeleteUser(id) => {
                tables.users.remove(&id).ok_or(StoreError::RowMissing {
                    entity: "user",
                    id,
                })?;
                if tables.members_reference_user(id) {
                    return Err(StoreError::StillReferenced {
                        entity: "user",
                        id,
                    });
                }
            }
            Write::InsertOrganization(mut org) => {
                org.created_at = now_ms;
                org.updated_at = now_ms;
                tables.organizations.insert(org.id, org);
            }
            Write::DeleteOrganization(id) => {
                tables
                    .organizations
                    .remove(&id)
                    .ok_or(StoreError::RowMissing {
                        entity: "organization",
                        id,
                    })?;
                if tables.members_reference_org(id) || tables.roles_reference_org(id) {
                    return Err(StoreError::StillReferenced {
                        entity: "organization",
                        id,
                    });
                }
            }
            Write::InsertRole(role) => {
                if !tables.organizations.contains_key(&role.org_id) {
                    return Err(StoreError::RowMissing {
                        entity: "organization",
                        id: role.org_id,
                    });
                }
                tables.roles.insert(role.id, role);
            }
            Write::DeleteRole(id) => {
                tables.roles.remove(&id).ok_or(StoreError::RowMissing {
                    entity: "role",
                    id,
                })?;
                if tables.members_reference_role(id) {
                    return Err(StoreError::StillReferenced {
                        entity: "role",
                        id,
                    });
                }
            }
            Write::InsertMember(mut member) => {
                Self::check_member_references(tables, &member)?;
                if tables.member_for(member.user_id, member.org_id).is_some() {
                    return Err(StoreError::DuplicateMember {
                        user_id: member.user_id,
                        org_id: member.org_id,
                    });
                }
                member.created_at = now_ms;
                member.updated_at = now_ms;
                tables.members.insert(member.id, member);
            }
            Write::UpdateMember(mut member) => {
                let existing =
                    tables.members.get(&member.id).ok_or(StoreError::RowMissing {
                        entity: "member",
                        id: member.id,
                    })?;
                Self::check_member_references(tables, &member)?;
                if let Some(other) = tables.member_for(member.user_id, member.org_id) {
                    if other.id != member.id {
                        return Err(StoreError::DuplicateMember {
                            user_id: member.user_id,
                            org_id: member.org_id,
                        });
                    }
                }
                member.created_at = existing.created_at;
                member.updated_at = now_ms;
                tables.members.insert(member.id, member);
            }
            Write::DeleteMember(id) => {
                tables.members.remove(&id).ok_or(StoreError::RowMissing {
                    entity: "member",
                    id,
                })?;
            }
        }
        Ok(())
    }

    fn check_member_references(tables: &Tables, member: &Member) -> StoreResult<()> {
        if !tables.users.contains_key(&member.user_id) {
            return Err(StoreError::RowMissing {
                entity: "user",
                id: member.user_id,
            });
        }
        if !tables.organizations.contains_key(&member.org_id) {
            return Err(StoreError::RowMissing {
                entity: "organization",
                id: member.org_id,
            });
        }
        let role = tables.roles.get(&member.role_id).ok_or(StoreError::RowMissing {
            entity: "role",
            id: member.role_id,
        })?;
        if role.org_id != member.org_id {
            return Err(StoreError::RoleOutsideOrg {
                role_id: member.role_id,
                org_id: member.org_id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self.tables.read().await.user_with_email(&email).cloned())
    }

    async fn organization(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn role(&self, id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn member_for(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<Option<Member>> {
        Ok(self.tables.read().await.member_for(user_id, org_id).cloned())
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn organizations(&self) -> StoreResult<Vec<Organization>> {
        Ok(self
            .tables
            .read()
            .await
            .organizations
            .values()
            .cloned()
            .collect())
    }

    async fn roles(&self) -> StoreResult<Vec<Role>> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }

    async fn members(&self) -> StoreResult<Vec<Member>> {
        Ok(self.tables.read().await.members.values().cloned().collect())
    }

    async fn commit(&self, batch: Vec<Write>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        let now_ms = Utc::now().timestamp_millis();

        for write in batch {
            if let Err(err) = Self::apply(&mut next, write, now_ms) {
                tracing::debug!(error = %err, "commit rejected");
                return Err(err);
            }
        }

        *tables = next;
        Ok(())
    }
}
