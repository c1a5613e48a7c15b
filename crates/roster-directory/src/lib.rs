//! # Roster Stores
//!
//! Storage layer for the Roster membership service: the [`Directory`]
//! capability (per-entity reads plus atomic write batches), an in-memory
//! implementation, and the identity and organization stores built on top of
//! it.
//!
//! ## Overview
//!
//! - [`Directory`]: the storage capability; reads per entity, and
//!   [`Directory::commit`] applying a batch of [`Write`]s atomically with
//!   unique-constraint and referential checks
//! - [`MemoryDirectory`]: single-process implementation; commits apply to a
//!   clone of the table state and swap it in only when every write succeeds
//! - [`IdentityStore`]: user accounts and credential verification
//! - [`OrganizationStore`]: organizations and org-scoped roles
//! - [`CredentialHasher`] / [`Argon2Hasher`]: the password hashing
//!   capability
//!
//! ## Transaction model
//!
//! Multi-entity workflows (sign-up, invite) build one `Vec<Write>` and
//! commit it in a single call. Constraint violations (duplicate email,
//! duplicate (user, org) membership, a role referenced from another
//! organization) fail the whole batch with a typed [`StoreError`] and leave
//! the committed state untouched. Timestamps are stamped here, uniformly,
//! for every entity that carries them.

pub mod directory;
pub mod error;
pub mod hasher;
pub mod identity;
pub mod memory;
pub mod org;

// Re-export main types for convenience
pub use directory::{Directory, Write};
pub use error::{StoreError, StoreResult};
pub use hasher::{Argon2Hasher, CredentialHasher, HasherError};
pub use identity::{IdentityError, IdentityStore};
pub use memory::MemoryDirectory;
pub use org::{OrgError, OrganizationStore};
