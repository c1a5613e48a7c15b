//! The storage capability
//!
//! [`Directory`] is the seam between the domain services and whatever holds
//! the rows. Reads are per-entity; all mutation goes through
//! [`Directory::commit`], which applies a batch of [`Write`]s atomically.

use async_trait::async_trait;
use uuid::Uuid;

use roster_org::{Member, Organization, Role, User};

use crate::error::StoreResult;

/// A single write inside a commit batch.
///
/// Cascading deletes are expressed as explicit batches by the caller
/// (members first, then roles, then the organization); the store rejects
/// orderings that would leave dangling references.
#[derive(Debug, Clone)]
pub enum Write {
    /// Insert a new user; fails if the email is taken.
    InsertUser(User),
    /// Replace an existing user row.
    UpdateUser(User),
    /// Delete a user row.
    DeleteUser(Uuid),
    /// Insert a new organization.
    InsertOrganization(Organization),
    /// Delete an organization row.
    DeleteOrganization(Uuid),
    /// Insert a new role; fails if the owning organization is missing.
    InsertRole(Role),
    /// Delete a role row.
    DeleteRole(Uuid),
    /// Insert a new member row; fails on a duplicate (user, org) pair or a
    /// role from another organization.
    InsertMember(Member),
    /// Replace an existing member row.
    UpdateMember(Member),
    /// Delete a member row by its row id.
    DeleteMember(Uuid),
}

/// Per-entity storage with atomic multi-entity commits.
///
/// Implementations enforce the unique-email and unique-(user, org)
/// constraints and the role/org referential invariant at commit time, and
/// stamp `created_at` / `updated_at` uniformly. Reads observe committed
/// state only.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch a user by id.
    async fn user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Fetch a user by normalized email.
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fetch an organization by id.
    async fn organization(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    /// Fetch a role by id.
    async fn role(&self, id: Uuid) -> StoreResult<Option<Role>>;

    /// Fetch the member row for a (user, org) pair, if any.
    async fn member_for(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<Option<Member>>;

    /// Snapshot of all users.
    async fn users(&self) -> StoreResult<Vec<User>>;

    /// Snapshot of all organizations.
    async fn organizations(&self) -> StoreResult<Vec<Organization>>;

    /// Snapshot of all roles.
    async fn roles(&self) -> StoreResult<Vec<Role>>;

    /// Snapshot of all member rows.
    async fn members(&self) -> StoreResult<Vec<Member>>;

    /// Apply a batch of writes atomically.
    ///
    /// Either every write lands or none do. Constraint violations surface
    /// as typed [`StoreError`](crate::StoreError)s.
    async fn commit(&self, batch: Vec<Write>) -> StoreResult<()>;
}
