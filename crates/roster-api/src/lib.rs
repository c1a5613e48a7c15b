//! # Roster Command Surface
//!
//! Typed request/response commands over the membership engine, session
//! issuer, and stats aggregator. This crate is the boundary an HTTP layer
//! would sit on: requests are validated and dispatched, and every internal
//! failure is mapped into an [`ApiError`] payload; raw storage errors
//! never escape.
//!
//! ## Commands
//!
//! | Command | Handler |
//! |---|---|
//! | sign-up | [`Api::sign_up`] |
//! | sign-in | [`Api::sign_in`] |
//! | reset-password | [`Api::reset_password`] |
//! | invite-member | [`Api::invite_member`] |
//! | delete-member | [`Api::delete_member`] |
//! | update-member-role | [`Api::update_member_role`] |
//! | role-wise-users | [`Api::role_wise_users`] |
//! | org-wise-members | [`Api::org_wise_members`] |
//! | org-role-wise-users | [`Api::org_role_wise_users`] |

pub mod error;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use error::{ApiError, ErrorKind};
pub use server::Api;
pub use types::{
    DeleteMemberRequest, InviteMemberRequest, MessageResponse, ResetPasswordRequest,
    SignInRequest, SignUpRequest, SignUpResponse, UpdateMemberRoleRequest,
};
