//! # Roster Notifications
//!
//! Best-effort notification delivery for the Roster platform. Workflow
//! crates emit a [`Notification`] after their transaction commits; delivery
//! failure is logged and swallowed, never propagated into the triggering
//! operation.
//!
//! ## Overview
//!
//! - [`Notification`]: subject + body + recipient
//! - [`Notifier`]: the delivery capability
//! - [`TracingNotifier`]: logs deliveries through `tracing` (default sink
//!   when no mail transport is wired up)
//! - [`MemoryNotifier`]: records deliveries in memory for tests
//! - [`dispatch`]: the swallow-and-log send used after commit
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use roster_notify::{dispatch, MemoryNotifier, Notification, Notifier};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let notifier = Arc::new(MemoryNotifier::new());
//! let sink: Arc<dyn Notifier> = notifier.clone();
//!
//! dispatch(
//!     &sink,
//!     Notification::new("Welcome", "Hello!", "ada@example.com"),
//! )
//! .await;
//!
//! assert_eq!(notifier.sent().await.len(), 1);
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Notification delivery error.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The underlying transport failed.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// A notification addressed to a single recipient.
///
/// Subjects and bodies are plain text; templating is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Subject line.
    pub subject: String,

    /// Message body.
    pub body: String,

    /// Recipient address.
    pub recipient: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipient: recipient.into(),
        }
    }
}

/// The notification delivery capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    async fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Send a notification, logging and swallowing any failure.
///
/// This is the post-commit path: the triggering operation has already
/// succeeded, so delivery problems must not bubble up.
pub async fn dispatch(notifier: &Arc<dyn Notifier>, notification: Notification) {
    let recipient = notification.recipient.clone();
    let subject = notification.subject.clone();
    if let Err(err) = notifier.send(notification).await {
        tracing::warn!(
            recipient = %recipient,
            subject = %subject,
            error = %err,
            "notification delivery failed"
        );
    } else {
        tracing::debug!(recipient = %recipient, subject = %subject, "notification sent");
    }
}

/// Notifier that logs deliveries through `tracing`.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Create a tracing-backed notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "notification"
        );
        Ok(())
    }
}

/// Notifier that records every delivery, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl MemoryNotifier {
    /// Create a recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording notifier whose sends always fail.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Snapshot of everything sent so far.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("memory notifier set to fail".into()));
        }
        self.sent.lock().await.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_notifier_records() {
        let notifier = MemoryNotifier::new();
        notifier
            .send(Notification::new("Subject", "Body", "a@x.com"))
            .await
            .unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "a@x.com");
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let sink: Arc<dyn Notifier> = Arc::new(MemoryNotifier::failing());
        // Must not panic or return an error.
        dispatch(&sink, Notification::new("Subject", "Body", "a@x.com")).await;
    }

    #[tokio::test]
    async fn test_tracing_notifier_accepts_sends() {
        let notifier = TracingNotifier::new();
        assert!(notifier
            .send(Notification::new("Subject", "Body", "a@x.com"))
            .await
            .is_ok());
    }
}
