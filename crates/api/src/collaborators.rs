// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Post-commit side effects and conflict retry.
//!
//! Audit records and notifications are emitted only after the store has
//! committed. Their failures are logged and swallowed: the change they
//! describe is already durable.

use gearbook_audit::{AuditEvent, AuditRecorder, Notification, Notifier};
use gearbook_domain::{Event, EventId};
use gearbook_persistence::{Persistence, PersistenceError};
use tracing::{debug, warn};

/// The audit recorder and notifier used by state-changing handlers.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    audit: &'a dyn AuditRecorder,
    notifier: &'a dyn Notifier,
}

impl<'a> Collaborators<'a> {
    #[must_use]
    pub const fn new(audit: &'a dyn AuditRecorder, notifier: &'a dyn Notifier) -> Self {
        Self { audit, notifier }
    }

    /// Records an audit event, logging a failure instead of returning it.
    pub fn record(&self, event: &AuditEvent) {
        if let Err(err) = self.audit.record(event) {
            warn!(
                subject_type = %event.subject_type,
                subject_id = event.subject_id,
                error = %err,
                "Audit recording failed"
            );
        }
    }

    /// Notifies the responsible user of an event, if it has one.
    ///
    /// Looks the event up again after commit, so the caller does not need to
    /// hold it. Lookup and delivery failures are logged.
    pub fn notify_responsible(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        title: &str,
        body: String,
    ) {
        let event: Event = match persistence.get_event(event_id) {
            Ok(event) => event,
            Err(err) => {
                warn!(event_id = %event_id, error = %err, "Could not load event for notification");
                return;
            }
        };
        let Some(user_id) = event.responsible_user else {
            debug!(event_id = %event_id, "Event has no responsible user; not notifying");
            return;
        };

        let notification: Notification = Notification {
            user_id,
            event_id,
            title: title.to_string(),
            body,
        };
        if let Err(err) = self.notifier.notify(&notification) {
            warn!(event_id = %event_id, user_id = %user_id, error = %err, "Notification failed");
        }
    }
}

/// Runs a store operation, retrying it once if it lost a write race.
///
/// The retry re-reads the facts, so a command that lost the race usually
/// comes back as a policy rejection the second time.
///
/// # Errors
///
/// Returns the error of the last attempt.
pub fn retry_on_conflict<T>(
    operation: &'static str,
    mut attempt: impl FnMut() -> Result<T, PersistenceError>,
) -> Result<T, PersistenceError> {
    match attempt() {
        Err(err) if err.is_conflict() => {
            warn!(operation, error = %err, "Write conflict, retrying once");
            attempt()
        }
        other => other,
    }
}
