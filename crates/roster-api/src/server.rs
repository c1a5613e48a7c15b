//! Command dispatch facade
//!
//! Wires the engine, session issuer, and stats aggregator over one
//! directory and exposes a handler per command. Responses mirror what the
//! HTTP layer returns; messages follow the service's established wording.

use std::sync::Arc;

use roster_auth::{SessionIssuer, TokenIssuer, TokenPair};
use roster_directory::{CredentialHasher, Directory};
use roster_membership::{
    MembershipEngine, OrgMemberCount, OrgRoleUserCount, RoleUserCount, StatsAggregator,
};
use roster_notify::Notifier;

use crate::error::ApiError;
use crate::types::{
    DeleteMemberRequest, InviteMemberRequest, MessageResponse, ResetPasswordRequest,
    SignInRequest, SignUpRequest, SignUpResponse, UpdateMemberRoleRequest,
};

/// The command surface over one directory.
pub struct Api<D> {
    engine: MembershipEngine<D>,
    sessions: SessionIssuer<D>,
    stats: StatsAggregator<D>,
}

impl<D: Directory> Api<D> {
    /// Wire the full command surface from a directory and the hashing,
    /// token, and notification capabilities.
    pub fn new(
        directory: Arc<D>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let engine = MembershipEngine::new(Arc::clone(&directory), hasher, Arc::clone(&notifier));
        let sessions = SessionIssuer::new(engine.identity().clone(), tokens, notifier);
        let stats = StatsAggregator::new(directory);
        Self {
            engine,
            sessions,
            stats,
        }
    }

    /// The underlying membership engine, for administrative flows the
    /// command table does not cover (org/role provisioning, cascades).
    pub fn engine(&self) -> &MembershipEngine<D> {
        &self.engine
    }

    /// sign-up: create the account, its organization, the Owner role, and
    /// the owner membership.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, ApiError> {
        let user = self
            .engine
            .sign_up(&request.email, &request.password, &request.org_name)
            .await?;
        Ok(SignUpResponse {
            user_id: user.id,
            email: user.email,
            message: "User created successfully, and invite email sent!".to_string(),
        })
    }

    /// sign-in: exchange credentials for an access/refresh token pair.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<TokenPair, ApiError> {
        Ok(self
            .sessions
            .sign_in(&request.email, &request.password)
            .await?)
    }

    /// reset-password: replace the account credential.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.sessions
            .reset_password(&request.email, &request.new_password)
            .await?;
        Ok(MessageResponse::new(
            "Password reset successfully, and alert email sent!",
        ))
    }

    /// invite-member: add a user to an organization with a role.
    pub async fn invite_member(
        &self,
        request: InviteMemberRequest,
    ) -> Result<MessageResponse, ApiError> {
        let member = self
            .engine
            .invite_member(&request.email, request.org_id, request.role_id)
            .await?;
        tracing::debug!(member_id = %member.id, "invite committed");
        Ok(MessageResponse::new(format!(
            "Invitation sent to {}.",
            request.email.trim().to_lowercase()
        )))
    }

    /// delete-member: remove a user from an organization.
    pub async fn delete_member(
        &self,
        request: DeleteMemberRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.engine
            .delete_member(request.user_id, request.org_id)
            .await?;
        Ok(MessageResponse::new("Member deleted successfully."))
    }

    /// update-member-role: change the role attached to a membership.
    pub async fn update_member_role(
        &self,
        request: UpdateMemberRoleRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.engine
            .update_member_role(request.user_id, request.org_id, request.role_id)
            .await?;
        Ok(MessageResponse::new("Member role updated successfully."))
    }

    /// role-wise-users: distinct users per role.
    pub async fn role_wise_users(&self) -> Result<Vec<RoleUserCount>, ApiError> {
        Ok(self.stats.role_wise_user_counts().await?)
    }

    /// org-wise-members: member rows per organization.
    pub async fn org_wise_members(&self) -> Result<Vec<OrgMemberCount>, ApiError> {
        Ok(self.stats.org_wise_member_counts().await?)
    }

    /// org-role-wise-users: distinct users per (organization, role) pair.
    pub async fn org_role_wise_users(&self) -> Result<Vec<OrgRoleUserCount>, ApiError> {
        Ok(self.stats.org_role_wise_user_counts().await?)
    }
}
