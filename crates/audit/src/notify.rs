// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::info;

use crate::types::Notification;

/// Failure reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// One-way sink for user notifications.
///
/// An unknown recipient must be treated as delivered (a no-op), not as an
/// error.
pub trait Notifier {
    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed for a reason other than a
    /// missing recipient.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            target: "gearbook::notify",
            user_id = notification.user_id.value(),
            event_id = notification.event_id.value(),
            title = %notification.title,
            "{}",
            notification.body
        );
        Ok(())
    }
}

/// Keeps notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every sent notification, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|e| NotifyError(e.to_string()))?
            .push(notification.clone());
        Ok(())
    }
}
