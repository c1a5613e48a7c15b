//! # Roster Session Authentication
//!
//! Credential-backed sign-in for the Roster platform. The session issuer
//! delegates credential checks to the identity store, issues an
//! access/refresh JWT pair through the [`TokenIssuer`] capability, and
//! emits login/password-change alerts best-effort.
//!
//! ## Overview
//!
//! - [`SessionClaims`] / [`TokenType`]: the claims carried by session tokens
//! - [`TokenIssuer`]: the token capability; [`JwtTokenIssuer`] implements it
//!   with HS256 via `jsonwebtoken`
//! - [`TokenPair`]: access + refresh tokens returned on sign-in
//! - [`SessionIssuer`]: `sign_in` and `reset_password`
//! - [`AuthError`]: typed failures with HTTP-ish status codes
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use roster_auth::{JwtTokenIssuer, SessionIssuer};
//! use roster_directory::{Argon2Hasher, IdentityStore, MemoryDirectory};
//! use roster_notify::TracingNotifier;
//!
//! # fn demo() -> Result<(), roster_auth::AuthError> {
//! let directory = Arc::new(MemoryDirectory::new());
//! let identity = IdentityStore::new(directory, Arc::new(Argon2Hasher::new()));
//! let tokens = Arc::new(JwtTokenIssuer::with_secret("a-secret-of-at-least-32-chars!!")?);
//! let sessions = SessionIssuer::new(identity, tokens, Arc::new(TracingNotifier::new()));
//! # let _ = sessions;
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod error;
pub mod session;
pub mod token;

// Re-export main types for convenience
pub use claims::{SessionClaims, TokenType};
pub use error::{AuthError, AuthResult};
pub use session::SessionIssuer;
pub use token::{JwtTokenIssuer, TokenConfig, TokenIssuer, TokenPair};
