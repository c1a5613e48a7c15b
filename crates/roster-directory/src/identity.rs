//! Identity store
//!
//! Owns user records and credential verification. Organization and
//! membership workflows never touch password material directly; they go
//! through this store.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use roster_org::{normalize_email, SettingsBag, User};

use crate::directory::{Directory, Write};
use crate::error::StoreError;
use crate::hasher::{CredentialHasher, HasherError};

/// Identity store error types.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Email was empty after normalization.
    #[error("email is required")]
    EmailRequired,

    /// Email is not a plausible address.
    #[error("email {0} is not a valid address")]
    EmailInvalid(String),

    /// Another account already uses this email.
    #[error("email {0} is already registered")]
    EmailTaken(String),

    /// Unknown email, disabled account, missing or mismatched credential.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for this email.
    #[error("user with email {0} does not exist")]
    UserNotFound(String),

    /// Credential hashing failed.
    #[error(transparent)]
    Hasher(#[from] HasherError),

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken(email) => IdentityError::EmailTaken(email),
            other => IdentityError::Store(other),
        }
    }
}

/// User accounts and credential verification.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use roster_directory::{Argon2Hasher, IdentityStore, MemoryDirectory};
/// use roster_org::SettingsBag;
///
/// # async fn demo() -> Result<(), roster_directory::IdentityError> {
/// let directory = Arc::new(MemoryDirectory::new());
/// let identity = IdentityStore::new(directory, Arc::new(Argon2Hasher::new()));
///
/// let user = identity
///     .create_user("ada@example.com", "s3cret", SettingsBag::new())
///     .await?;
/// let verified = identity.verify_credential("ADA@example.com", "s3cret").await?;
/// assert_eq!(verified.id, user.id);
/// # Ok(())
/// # }
/// ```
pub struct IdentityStore<D> {
    directory: Arc<D>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<D> Clone for IdentityStore<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<D: Directory> IdentityStore<D> {
    /// Create an identity store over a directory and a hasher capability.
    pub fn new(directory: Arc<D>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { directory, hasher }
    }

    /// The underlying directory.
    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    fn validated_email(raw: &str) -> Result<String, IdentityError> {
        let email = normalize_email(raw);
        if email.is_empty() {
            return Err(IdentityError::EmailRequired);
        }
        if !email.contains('@') {
            return Err(IdentityError::EmailInvalid(email));
        }
        Ok(email)
    }

    /// Create a user with a hashed credential.
    ///
    /// Fails with [`IdentityError::EmailTaken`] when the normalized email is
    /// already registered.
    pub async fn create_user(
        &self,
        email: &str,
        raw_password: &str,
        profile: SettingsBag,
    ) -> Result<User, IdentityError> {
        let email = Self::validated_email(email)?;
        let digest = self.hasher.hash(raw_password)?;
        let user = User::with_credential(&email, digest).with_profile(profile);

        self.directory
            .commit(vec![Write::InsertUser(user.clone())])
            .await?;
        self.stored(user.id, &email).await
    }

    /// Idempotent lookup-or-create by email.
    ///
    /// The created user carries no usable credential until a reset or
    /// invite-accept flow sets one. Concurrent callers converge on one row:
    /// losing an insert race falls back to reading the winner.
    pub async fn get_or_create(&self, email: &str) -> Result<(User, bool), IdentityError> {
        let email = Self::validated_email(email)?;
        if let Some(user) = self.directory.user_by_email(&email).await.map_err(IdentityError::Store)? {
            return Ok((user, false));
        }

        let user = User::new(&email);
        match self
            .directory
            .commit(vec![Write::InsertUser(user.clone())])
            .await
        {
            Ok(()) => Ok((self.stored(user.id, &email).await?, true)),
            Err(StoreError::EmailTaken(_)) => {
                // Lost the insert race; the winner's row is committed now.
                let winner = self
                    .directory
                    .user_by_email(&email)
                    .await
                    .map_err(IdentityError::Store)?
                    .ok_or_else(|| IdentityError::UserNotFound(email.clone()))?;
                Ok((winner, false))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Fetch a user by email, if present.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let email = normalize_email(email);
        self.directory
            .user_by_email(&email)
            .await
            .map_err(IdentityError::Store)
    }

    /// Check a credential and return the account on success.
    ///
    /// Unknown email, a disabled account, a credential-less account, and a
    /// wrong password all fail identically with
    /// [`IdentityError::InvalidCredentials`].
    pub async fn verify_credential(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<User, IdentityError> {
        let email = normalize_email(email);
        let user = self
            .directory
            .user_by_email(&email)
            .await
            .map_err(IdentityError::Store)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !user.status.is_active() {
            return Err(IdentityError::InvalidCredentials);
        }
        let digest = user
            .credential_digest
            .as_deref()
            .ok_or(IdentityError::InvalidCredentials)?;
        if !self.hasher.verify(raw_password, digest) {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Replace a user's credential with a hash of the new password.
    pub async fn set_password(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<User, IdentityError> {
        let email = normalize_email(email);
        let mut user = self
            .directory
            .user_by_email(&email)
            .await
            .map_err(IdentityError::Store)?
            .ok_or_else(|| IdentityError::UserNotFound(email.clone()))?;

        user.credential_digest = Some(self.hasher.hash(raw_password)?);
        self.directory
            .commit(vec![Write::UpdateUser(user.clone())])
            .await?;
        self.stored(user.id, &email).await
    }

    async fn stored(&self, id: Uuid, email: &str) -> Result<User, IdentityError> {
        self.directory
            .user(id)
            .await
            .map_err(IdentityError::Store)?
            .ok_or_else(|| IdentityError::UserNotFound(email.to_string()))
    }
}
