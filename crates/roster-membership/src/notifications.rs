//! Notification payloads emitted by the engine
//!
//! Bodies stay close to plain text; real templating is out of scope.

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use roster_notify::Notification;

const INVITE_BASE_URL: &str = "https://roster.example/invite";

/// Random token embedded in the sign-up welcome link.
pub(crate) fn invite_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Welcome mail sent after sign-up.
pub(crate) fn welcome(email: &str, org_name: &str) -> Notification {
    let link = format!("{INVITE_BASE_URL}/{}", invite_token());
    Notification::new(
        "Welcome to Your Organization",
        format!(
            "Hello {email},\n\nYou have been added as the owner of the organization \
             '{org_name}'.\nClick here to get started: {link}"
        ),
        email,
    )
}

/// Invitation mail sent when a user joins an organization.
pub(crate) fn invited(email: &str, org_name: &str, org_id: Uuid, user_id: Uuid) -> Notification {
    let link = format!("{INVITE_BASE_URL}/{org_id}/{user_id}/");
    Notification::new(
        "Invitation to join organization",
        format!(
            "You have been invited to join the organization \"{org_name}\". \
             Click the link below to accept the invitation:\n\n{link}"
        ),
        email,
    )
}
