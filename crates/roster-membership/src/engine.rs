//! The membership engine
//!
//! Drives every mutating workflow: sign-up, invites, member removal, role
//! changes, and the explicit cascade deletes. Workflows that touch more
//! than one entity build a single write batch and commit it atomically;
//! notifications go out only after the commit lands.

use std::sync::Arc;

use uuid::Uuid;

use roster_directory::{
    CredentialHasher, Directory, IdentityStore, OrganizationStore, StoreError, Write,
};
use roster_notify::{dispatch, Notifier};
use roster_org::{normalize_email, Member, Organization, Role, User};

use crate::error::MembershipError;
use crate::notifications;

/// The membership engine.
///
/// Owns the sign-up / invite / delete / update-role workflows and the
/// explicit cascade deletes. Construction wires the storage, hashing, and
/// notification capabilities; the identity and organization stores are
/// built over the same directory and exposed for callers that need direct
/// store operations (the session issuer shares the identity store).
pub struct MembershipEngine<D> {
    directory: Arc<D>,
    identity: IdentityStore<D>,
    orgs: OrganizationStore<D>,
    hasher: Arc<dyn CredentialHasher>,
    notifier: Arc<dyn Notifier>,
}

impl<D: Directory> MembershipEngine<D> {
    /// Create an engine over a directory with the given capabilities.
    pub fn new(
        directory: Arc<D>,
        hasher: Arc<dyn CredentialHasher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            identity: IdentityStore::new(Arc::clone(&directory), Arc::clone(&hasher)),
            orgs: OrganizationStore::new(Arc::clone(&directory)),
            directory,
            hasher,
            notifier,
        }
    }

    /// The identity store sharing this engine's directory and hasher.
    pub fn identity(&self) -> &IdentityStore<D> {
        &self.identity
    }

    /// The organization store sharing this engine's directory.
    pub fn organizations(&self) -> &OrganizationStore<D> {
        &self.orgs
    }

    fn validated_email(raw: &str) -> Result<String, MembershipError> {
        let email = normalize_email(raw);
        if email.is_empty() {
            return Err(MembershipError::EmailRequired);
        }
        if !email.contains('@') {
            return Err(MembershipError::EmailInvalid(email));
        }
        Ok(email)
    }

    /// Register a new account with its own organization.
    ///
    /// Creates the user, the organization, its "Owner" role, and the active
    /// owner membership in one commit; a duplicate email (or any other
    /// constraint failure) rolls all four back. A welcome notification goes
    /// out after the commit, best-effort.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        org_name: &str,
    ) -> Result<User, MembershipError> {
        let email = Self::validated_email(email)?;
        if password.is_empty() {
            return Err(MembershipError::PasswordRequired);
        }
        let org_name = org_name.trim();
        if org_name.is_empty() {
            return Err(MembershipError::OrgNameRequired);
        }

        let digest = self
            .hasher
            .hash(password)
            .map_err(|err| MembershipError::Identity(err.into()))?;
        let user = User::with_credential(&email, digest);
        let org = Organization::new(org_name);
        let role = Role::owner(org.id);
        let member = Member::new(org.id, user.id, role.id);

        self.directory
            .commit(vec![
                Write::InsertUser(user.clone()),
                Write::InsertOrganization(org.clone()),
                Write::InsertRole(role),
                Write::InsertMember(member),
            ])
            .await?;

        tracing::info!(user_id = %user.id, org_id = %org.id, "account signed up");
        dispatch(&self.notifier, notifications::welcome(&email, org_name)).await;

        self.stored_user(user.id).await
    }

    /// Invite a user (by email) into an organization with a role.
    ///
    /// A brand-new email gets a credential-less account, inserted in the
    /// same commit as the member row. Inviting an existing member fails
    /// with [`MembershipError::AlreadyMember`]. The invitation notification
    /// is sent for every successful invite: the org-join event is news to
    /// the recipient whether or not the account existed.
    pub async fn invite_member(
        &self,
        email: &str,
        org_id: Uuid,
        role_id: Uuid,
    ) -> Result<Member, MembershipError> {
        let email = Self::validated_email(email)?;
        let org = self.orgs.get_organization(org_id).await?;
        let role = self.orgs.get_role(org_id, role_id).await?;

        let mut retried = false;
        loop {
            let existing = self.identity.find_by_email(&email).await?;
            if let Some(user) = &existing {
                if self
                    .directory
                    .member_for(user.id, org_id)
                    .await
                    .map_err(MembershipError::Store)?
                    .is_some()
                {
                    return Err(MembershipError::AlreadyMember {
                        user_id: user.id,
                        org_id,
                    });
                }
            }

            let (user, created) = match existing {
                Some(user) => (user, false),
                None => (User::new(&email), true),
            };
            let member = Member::new(org_id, user.id, role.id);

            let mut batch = Vec::with_capacity(2);
            if created {
                batch.push(Write::InsertUser(user.clone()));
            }
            batch.push(Write::InsertMember(member.clone()));

            match self.directory.commit(batch).await {
                Ok(()) => {
                    tracing::info!(
                        user_id = %user.id,
                        org_id = %org.id,
                        role_id = %role.id,
                        new_account = created,
                        "member invited"
                    );
                    dispatch(
                        &self.notifier,
                        notifications::invited(&email, &org.name, org.id, user.id),
                    )
                    .await;
                    return self.stored_member(user.id, org_id).await;
                }
                // A concurrent invite created this email first; resolve the
                // winner's row and try once more.
                Err(StoreError::EmailTaken(_)) if !retried => {
                    retried = true;
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Remove a user from an organization.
    ///
    /// Hard-deletes the member row; the user account is untouched.
    pub async fn delete_member(&self, user_id: Uuid, org_id: Uuid) -> Result<(), MembershipError> {
        let member = self
            .directory
            .member_for(user_id, org_id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::MemberNotFound { user_id, org_id })?;

        self.directory
            .commit(vec![Write::DeleteMember(member.id)])
            .await?;
        tracing::info!(user_id = %user_id, org_id = %org_id, "member removed");
        Ok(())
    }

    /// Change the role attached to a membership.
    ///
    /// The new role must exist and belong to the member's organization; a
    /// role from another tenant fails with
    /// [`MembershipError::RoleOrgMismatch`] and leaves the row unchanged.
    pub async fn update_member_role(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        role_id: Uuid,
    ) -> Result<Member, MembershipError> {
        let mut member = self
            .directory
            .member_for(user_id, org_id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::MemberNotFound { user_id, org_id })?;

        let role = self
            .directory
            .role(role_id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::RoleNotFound(role_id))?;
        if role.org_id != org_id {
            return Err(MembershipError::RoleOrgMismatch { role_id, org_id });
        }

        member.role_id = role.id;
        self.directory
            .commit(vec![Write::UpdateMember(member)])
            .await?;
        tracing::info!(user_id = %user_id, org_id = %org_id, role_id = %role_id, "member role updated");

        self.stored_member(user_id, org_id).await
    }

    /// Delete an organization with its roles and member rows.
    ///
    /// The cascade is explicit: one batch removes every member row, every
    /// role, and finally the organization. User accounts survive.
    pub async fn delete_organization(&self, org_id: Uuid) -> Result<(), MembershipError> {
        self.orgs.get_organization(org_id).await?;

        let mut batch = Vec::new();
        for member in self
            .directory
            .members()
            .await
            .map_err(MembershipError::Store)?
        {
            if member.org_id == org_id {
                batch.push(Write::DeleteMember(member.id));
            }
        }
        for role in self.directory.roles().await.map_err(MembershipError::Store)? {
            if role.org_id == org_id {
                batch.push(Write::DeleteRole(role.id));
            }
        }
        batch.push(Write::DeleteOrganization(org_id));

        self.directory.commit(batch).await?;
        tracing::info!(org_id = %org_id, "organization deleted");
        Ok(())
    }

    /// Delete a user account and its memberships.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), MembershipError> {
        self.directory
            .user(user_id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::UserNotFound(user_id))?;

        let mut batch = Vec::new();
        for member in self
            .directory
            .members()
            .await
            .map_err(MembershipError::Store)?
        {
            if member.user_id == user_id {
                batch.push(Write::DeleteMember(member.id));
            }
        }
        batch.push(Write::DeleteUser(user_id));

        self.directory.commit(batch).await?;
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    async fn stored_user(&self, id: Uuid) -> Result<User, MembershipError> {
        self.directory
            .user(id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::UserNotFound(id))
    }

    async fn stored_member(&self, user_id: Uuid, org_id: Uuid) -> Result<Member, MembershipError> {
        self.directory
            .member_for(user_id, org_id)
            .await
            .map_err(MembershipError::Store)?
            .ok_or(MembershipError::MemberNotFound { user_id, org_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_directory::{Argon2Hasher, MemoryDirectory};
    use roster_notify::MemoryNotifier;
    use roster_org::EntityStatus;

    struct Fixture {
        engine: MembershipEngine<MemoryDirectory>,
        directory: Arc<MemoryDirectory>,
        notifier: Arc<MemoryNotifier>,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(MemoryDirectory::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let engine = MembershipEngine::new(
            Arc::clone(&directory),
            Arc::new(Argon2Hasher::new()),
            notifier.clone(),
        );
        Fixture {
            engine,
            directory,
            notifier,
        }
    }

    async fn org_of(fx: &Fixture, name: &str) -> Organization {
        fx.directory
            .organizations()
            .await
            .unwrap()
            .into_iter()
            .find(|o| o.name == name)
            .expect("organization should exist")
    }

    #[tokio::test]
    async fn test_sign_up_creates_all_four_rows() {
        let fx = fixture();
        let user = fx
            .engine
            .sign_up("a@x.com", "pw", "Acme")
            .await
            .unwrap();

        assert_eq!(user.email, "a@x.com");
        assert!(user.has_credential());

        let org = org_of(&fx, "Acme").await;
        let roles = fx.directory.roles().await.unwrap();
        assert_eq!(roles.len(), 1);
        assert!(roles[0].is_owner());
        assert_eq!(roles[0].org_id, org.id);

        let member = fx
            .directory
            .member_for(user.id, org.id)
            .await
            .unwrap()
            .expect("owner membership should exist");
        assert_eq!(member.role_id, roles[0].id);
        assert_eq!(member.status, EntityStatus::Active);

        let sent = fx.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Welcome to Your Organization");
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_is_fully_rolled_back() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();

        let err = fx
            .engine
            .sign_up("A@X.com", "pw2", "Other Org")
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::EmailTaken(_)));

        // No partial rows: still one org, one role, one member, one user.
        assert_eq!(fx.directory.users().await.unwrap().len(), 1);
        assert_eq!(fx.directory.organizations().await.unwrap().len(), 1);
        assert_eq!(fx.directory.roles().await.unwrap().len(), 1);
        assert_eq!(fx.directory.members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_field_validation() {
        let fx = fixture();
        assert!(matches!(
            fx.engine.sign_up("", "pw", "Acme").await,
            Err(MembershipError::EmailRequired)
        ));
        assert!(matches!(
            fx.engine.sign_up("not-an-email", "pw", "Acme").await,
            Err(MembershipError::EmailInvalid(_))
        ));
        assert!(matches!(
            fx.engine.sign_up("a@x.com", "", "Acme").await,
            Err(MembershipError::PasswordRequired)
        ));
        assert!(matches!(
            fx.engine.sign_up("a@x.com", "pw", "  ").await,
            Err(MembershipError::OrgNameRequired)
        ));
    }

    #[tokio::test]
    async fn test_invite_creates_credential_less_account() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();

        let member = fx
            .engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap();
        assert_eq!(member.role_id, viewer.id);
        assert_eq!(member.status, EntityStatus::Active);

        let invited = fx
            .engine
            .identity()
            .find_by_email("b@x.com")
            .await
            .unwrap()
            .expect("invited account should exist");
        assert!(!invited.has_credential());
    }

    #[tokio::test]
    async fn test_invite_is_idempotent_on_user_org_pair() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();

        fx.engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap();
        let err = fx
            .engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::AlreadyMember { .. }));
        assert_eq!(fx.directory.members().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invite_validates_org_and_role() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        fx.engine.sign_up("z@y.com", "pw", "Zenith").await.unwrap();
        let acme = org_of(&fx, "Acme").await;
        let zenith = org_of(&fx, "Zenith").await;
        let zenith_role = fx
            .engine
            .organizations()
            .create_role(zenith.id, "Viewer", None)
            .await
            .unwrap();

        assert!(matches!(
            fx.engine
                .invite_member("b@x.com", Uuid::now_v7(), zenith_role.id)
                .await,
            Err(MembershipError::OrgNotFound(_))
        ));
        assert!(matches!(
            fx.engine
                .invite_member("b@x.com", acme.id, Uuid::now_v7())
                .await,
            Err(MembershipError::RoleNotFound(_))
        ));
        assert!(matches!(
            fx.engine
                .invite_member("b@x.com", acme.id, zenith_role.id)
                .await,
            Err(MembershipError::RoleOrgMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_invite_notifies_existing_users_too() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        fx.engine.sign_up("b@x.com", "pw", "Beta").await.unwrap();
        let acme = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(acme.id, "Viewer", None)
            .await
            .unwrap();

        fx.engine
            .invite_member("b@x.com", acme.id, viewer.id)
            .await
            .unwrap();

        let invites: Vec<_> = fx
            .notifier
            .sent()
            .await
            .into_iter()
            .filter(|n| n.subject == "Invitation to join organization")
            .collect();
        assert_eq!(invites.len(), 1);
        assert_eq!(invites[0].recipient, "b@x.com");
    }

    #[tokio::test]
    async fn test_delete_then_reinvite_creates_fresh_active_row() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();

        let first = fx
            .engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap();
        fx.engine.delete_member(first.user_id, org.id).await.unwrap();
        assert!(fx
            .directory
            .member_for(first.user_id, org.id)
            .await
            .unwrap()
            .is_none());

        let second = fx
            .engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.status, EntityStatus::Active);
    }

    #[tokio::test]
    async fn test_delete_member_not_found() {
        let fx = fixture();
        let err = fx
            .engine
            .delete_member(Uuid::now_v7(), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::MemberNotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_member_role() {
        let fx = fixture();
        let user = fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();

        let updated = fx
            .engine
            .update_member_role(user.id, org.id, viewer.id)
            .await
            .unwrap();
        assert_eq!(updated.role_id, viewer.id);
    }

    #[tokio::test]
    async fn test_update_member_role_missing_role_never_no_ops() {
        let fx = fixture();
        let user = fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let before = fx
            .directory
            .member_for(user.id, org.id)
            .await
            .unwrap()
            .unwrap();

        let err = fx
            .engine
            .update_member_role(user.id, org.id, Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::RoleNotFound(_)));

        let after = fx
            .directory
            .member_for(user.id, org.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.role_id, before.role_id);
    }

    #[tokio::test]
    async fn test_update_member_role_rejects_foreign_role() {
        let fx = fixture();
        let user = fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        fx.engine.sign_up("z@y.com", "pw", "Zenith").await.unwrap();
        let acme = org_of(&fx, "Acme").await;
        let zenith = org_of(&fx, "Zenith").await;
        let foreign = fx
            .engine
            .organizations()
            .create_role(zenith.id, "Viewer", None)
            .await
            .unwrap();

        let err = fx
            .engine
            .update_member_role(user.id, acme.id, foreign.id)
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::RoleOrgMismatch { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_invites_converge_on_one_user_one_member() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            fx.engine.invite_member("new@x.com", org.id, viewer.id),
            fx.engine.invite_member("new@x.com", org.id, viewer.id),
        );
        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        for result in [first, second] {
            if let Err(err) = result {
                assert!(matches!(err, MembershipError::AlreadyMember { .. }));
            }
        }

        let users: Vec<_> = fx
            .directory
            .users()
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.email == "new@x.com")
            .collect();
        assert_eq!(users.len(), 1);
        assert!(fx
            .directory
            .member_for(users[0].id, org.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_organization_cascades_but_keeps_users() {
        let fx = fixture();
        fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;
        let viewer = fx
            .engine
            .organizations()
            .create_role(org.id, "Viewer", None)
            .await
            .unwrap();
        fx.engine
            .invite_member("b@x.com", org.id, viewer.id)
            .await
            .unwrap();

        fx.engine.delete_organization(org.id).await.unwrap();

        assert!(fx.directory.organization(org.id).await.unwrap().is_none());
        assert!(fx.directory.roles().await.unwrap().is_empty());
        assert!(fx.directory.members().await.unwrap().is_empty());
        assert_eq!(fx.directory.users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_memberships() {
        let fx = fixture();
        let user = fx.engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        let org = org_of(&fx, "Acme").await;

        fx.engine.delete_user(user.id).await.unwrap();

        assert!(fx.directory.user(user.id).await.unwrap().is_none());
        assert!(fx.directory.members().await.unwrap().is_empty());
        // The organization itself survives a user deletion.
        assert!(fx.directory.organization(org.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failing_notifier_never_fails_workflows() {
        let directory = Arc::new(MemoryDirectory::new());
        let engine = MembershipEngine::new(
            Arc::clone(&directory),
            Arc::new(Argon2Hasher::new()),
            Arc::new(MemoryNotifier::failing()),
        );

        let user = engine.sign_up("a@x.com", "pw", "Acme").await.unwrap();
        assert!(directory.user(user.id).await.unwrap().is_some());
    }
}
