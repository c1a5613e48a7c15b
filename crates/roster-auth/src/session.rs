//! Session issuer
//!
//! Sign-in and password reset. Credential checks are delegated to the
//! identity store; alert notifications go out after the operation succeeds
//! and never affect its outcome.

use std::sync::Arc;

use roster_directory::{Directory, IdentityStore};
use roster_notify::{dispatch, Notification, Notifier};

use crate::error::AuthResult;
use crate::token::{TokenIssuer, TokenPair};

fn login_alert(email: &str) -> Notification {
    Notification::new(
        "Login Alert",
        format!(
            "Hello {email},\n\nA login was detected on your account. \
             If this wasn't you, please reset your password immediately."
        ),
        email,
    )
}

fn password_changed(email: &str) -> Notification {
    Notification::new(
        "Password Updated Successfully",
        format!(
            "Hello {email},\n\nYour password has been successfully updated. \
             If this wasn't you, please contact support immediately."
        ),
        email,
    )
}

/// Authenticates credentials and issues session token pairs.
pub struct SessionIssuer<D> {
    identity: IdentityStore<D>,
    tokens: Arc<dyn TokenIssuer>,
    notifier: Arc<dyn Notifier>,
}

impl<D: Directory> SessionIssuer<D> {
    /// Create a session issuer over the identity store and the token and
    /// notifier capabilities.
    pub fn new(
        identity: IdentityStore<D>,
        tokens: Arc<dyn TokenIssuer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            identity,
            tokens,
            notifier,
        }
    }

    /// Authenticate and issue an access/refresh pair.
    ///
    /// Fails with [`AuthError::InvalidCredentials`](crate::AuthError) on any
    /// credential problem; no token is issued and no alert is sent.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let user = self.identity.verify_credential(email, password).await?;
        let pair = self.tokens.issue_pair(user.id, &user.email)?;

        tracing::info!(user_id = %user.id, "session issued");
        dispatch(&self.notifier, login_alert(&user.email)).await;
        Ok(pair)
    }

    /// Replace the password for an existing account.
    ///
    /// Fails with [`AuthError::UnknownUser`](crate::AuthError) when no
    /// account matches the email.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> AuthResult<()> {
        let user = self.identity.set_password(email, new_password).await?;

        tracing::info!(user_id = %user.id, "password reset");
        dispatch(&self.notifier, password_changed(&user.email)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::token::JwtTokenIssuer;
    use roster_directory::{Argon2Hasher, MemoryDirectory};
    use roster_org::SettingsBag;

    struct Fixture {
        sessions: SessionIssuer<MemoryDirectory>,
        identity: IdentityStore<MemoryDirectory>,
        notifier: Arc<roster_notify::MemoryNotifier>,
        tokens: Arc<JwtTokenIssuer>,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(MemoryDirectory::new());
        let identity = IdentityStore::new(directory, Arc::new(Argon2Hasher::new()));
        let tokens = Arc::new(
            JwtTokenIssuer::with_secret("test-secret-key-for-jwt-signing-32ch!").unwrap(),
        );
        let notifier = Arc::new(roster_notify::MemoryNotifier::new());
        let sessions = SessionIssuer::new(identity.clone(), tokens.clone(), notifier.clone());
        Fixture {
            sessions,
            identity,
            notifier,
            tokens,
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_validated_tokens() {
        let fx = fixture();
        let user = fx
            .identity
            .create_user("ada@example.com", "s3cret", SettingsBag::new())
            .await
            .unwrap();

        let pair = fx.sessions.sign_in("Ada@Example.com", "s3cret").await.unwrap();
        let claims = fx.tokens.validate(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));

        let sent = fx.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Login Alert");
    }

    #[tokio::test]
    async fn test_wrong_password_issues_nothing() {
        let fx = fixture();
        fx.identity
            .create_user("ada@example.com", "s3cret", SettingsBag::new())
            .await
            .unwrap();

        let err = fx.sessions.sign_in("ada@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(fx.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_reset_password_round_trip() {
        let fx = fixture();
        fx.identity
            .create_user("ada@example.com", "old", SettingsBag::new())
            .await
            .unwrap();

        fx.sessions
            .reset_password("ada@example.com", "new")
            .await
            .unwrap();

        assert!(fx.sessions.sign_in("ada@example.com", "new").await.is_ok());
        assert!(matches!(
            fx.sessions.sign_in("ada@example.com", "old").await,
            Err(AuthError::InvalidCredentials)
        ));

        let subjects: Vec<_> = fx
            .notifier
            .sent()
            .await
            .into_iter()
            .map(|n| n.subject)
            .collect();
        assert!(subjects.contains(&"Password Updated Successfully".to_string()));
    }

    #[tokio::test]
    async fn test_reset_password_unknown_user() {
        let fx = fixture();
        let err = fx
            .sessions
            .reset_password("ghost@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser(_)));
        assert!(fx.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_sign_in() {
        let directory = Arc::new(MemoryDirectory::new());
        let identity = IdentityStore::new(directory, Arc::new(Argon2Hasher::new()));
        identity
            .create_user("ada@example.com", "s3cret", SettingsBag::new())
            .await
            .unwrap();

        let tokens = Arc::new(
            JwtTokenIssuer::with_secret("test-secret-key-for-jwt-signing-32ch!").unwrap(),
        );
        let sessions = SessionIssuer::new(
            identity,
            tokens,
            Arc::new(roster_notify::MemoryNotifier::failing()),
        );

        assert!(sessions.sign_in("ada@example.com", "s3cret").await.is_ok());
    }
}
