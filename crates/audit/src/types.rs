// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_domain::{EventId, UserId};
use serde::{Deserialize, Serialize};

/// Represents the user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The user id known to the surrounding application.
    pub user_id: UserId,
    /// A display name, for log lines and audit messages.
    pub display_name: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user's id
    /// * `display_name` - The acting user's display name
    #[must_use]
    pub fn new(user_id: UserId, display_name: &str) -> Self {
        Self {
            user_id,
            display_name: display_name.to_string(),
        }
    }
}

/// The kind of change an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// Returns the string form of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of one change, handed to the audit collaborator.
///
/// Captures who did it (actor), what kind of change (action), what was
/// changed (`subject_type` and `subject_id`) and a free-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor: Actor,
    pub action: AuditAction,
    /// The kind of record changed (e.g., `event_stock_issue`).
    pub subject_type: String,
    /// The changed record's id.
    pub subject_id: i64,
    pub message: String,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The user who made the change
    /// * `action` - The kind of change
    /// * `subject_type` - The kind of record changed
    /// * `subject_id` - The changed record's id
    /// * `message` - A human-readable description
    #[must_use]
    pub fn new(
        actor: Actor,
        action: AuditAction,
        subject_type: &str,
        subject_id: i64,
        message: String,
    ) -> Self {
        Self {
            actor,
            action,
            subject_type: subject_type.to_string(),
            subject_id,
            message,
        }
    }
}

/// A message for one user about one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: UserId,
    pub event_id: EventId,
    pub title: String,
    pub body: String,
}
