//! Request and response payloads for the command surface

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// sign-up input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Account email.
    pub email: String,
    /// Raw password.
    pub password: String,
    /// Name for the new organization.
    pub org_name: String,
}

/// sign-up success payload: a reference to the created account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    /// Created user id.
    pub user_id: Uuid,
    /// Normalized account email.
    pub email: String,
    /// Confirmation message.
    pub message: String,
}

/// sign-in input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Account email.
    pub email: String,
    /// Raw password.
    pub password: String,
}

/// reset-password input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Account email.
    pub email: String,
    /// Replacement password.
    pub new_password: String,
}

/// invite-member input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteMemberRequest {
    /// Invitee email; an unknown address gets a credential-less account.
    pub email: String,
    /// Target organization.
    pub org_id: Uuid,
    /// Role to attach; must belong to the target organization.
    pub role_id: Uuid,
}

/// delete-member input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMemberRequest {
    /// Member's user id.
    pub user_id: Uuid,
    /// Organization to remove them from.
    pub org_id: Uuid,
}

/// update-member-role input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// Member's user id.
    pub user_id: Uuid,
    /// Organization the membership belongs to.
    pub org_id: Uuid,
    /// Replacement role; must belong to the same organization.
    pub role_id: Uuid,
}

/// Generic confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
