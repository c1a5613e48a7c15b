//! # Roster Domain Model
//!
//! This crate provides the domain entities for the Roster multi-tenant
//! identity and membership service, shared by the store, engine, and
//! session crates.
//!
//! ## Overview
//!
//! - **Users**: Accounts identified by a unique, case-normalized email
//! - **Organizations**: Top-level tenant entities with settings
//! - **Roles**: Named roles scoped to exactly one organization
//! - **Members**: The User↔Organization join rows carrying a Role
//! - **Settings bags**: Opaque string-keyed bags with a restricted value union
//!
//! ## Architecture
//!
//! ```text
//! User
//!   └─ Member ─→ Organization
//!                   └─ Role (org-scoped; "Owner" auto-created)
//! ```
//!
//! Entity timestamps are epoch-milliseconds. Constructors leave them unset
//! (zero); the store layer stamps `created_at` on first insert and
//! `updated_at` on every write.
//!
//! ## Usage
//!
//! ```rust
//! use roster_org::{Member, Organization, Role, User};
//!
//! let user = User::new("owner@acme.example");
//! let org = Organization::new("Acme Corp");
//! let role = Role::owner(org.id);
//! let member = Member::new(org.id, user.id, role.id);
//! assert_eq!(member.org_id, role.org_id);
//! ```

pub mod member;
pub mod organization;
pub mod role;
pub mod settings;
pub mod status;
pub mod user;

// Re-export main types for convenience
pub use member::Member;
pub use organization::Organization;
pub use role::Role;
pub use settings::{SettingValue, SettingsBag};
pub use status::EntityStatus;
pub use user::{normalize_email, User};
