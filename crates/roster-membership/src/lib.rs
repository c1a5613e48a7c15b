//! # Roster Membership Engine
//!
//! The core of the Roster platform: links users to organizations through
//! org-scoped roles, enforces the membership invariants, and drives the
//! sign-up / invite / delete / update-role workflows.
//!
//! ## Overview
//!
//! - [`MembershipEngine`]: the mutating workflows. Every operation that
//!   touches more than one entity commits a single atomic write batch;
//!   partial creation is impossible.
//! - [`StatsAggregator`]: read-only projections over committed state
//!   (per-role, per-org, and per-org-per-role user counts).
//! - [`MembershipError`]: the typed failure surface
//!   (not-found / conflict / validation).
//!
//! ## Invariants
//!
//! - At most one member row per (user, org) pair; a second invite fails
//!   with [`MembershipError::AlreadyMember`].
//! - A member's role always belongs to the member's organization.
//! - Member rows move absent → active → removed; removal deletes the row
//!   and a later invite creates a fresh one.
//! - Concurrent invites for a brand-new email converge on one user and one
//!   member row via the store's unique constraints plus a single retry.
//!
//! Notifications (welcome, invitation) are dispatched after commit,
//! best-effort; delivery failure never rolls back or fails the operation.

pub mod engine;
pub mod error;
pub mod stats;

mod notifications;

// Re-export main types for convenience
pub use engine::MembershipEngine;
pub use error::MembershipError;
pub use stats::{OrgMemberCount, OrgRoleUserCount, RoleUserCount, StatsAggregator};
