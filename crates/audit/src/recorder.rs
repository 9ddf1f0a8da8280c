// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::info;

use crate::types::AuditEvent;

/// Failure reported by an audit recorder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Audit recording failed: {0}")]
pub struct AuditError(pub String);

/// Sink for audit events.
///
/// Implementations should return quickly. Callers treat an `Err` as a log
/// line, not as a reason to undo anything.
pub trait AuditRecorder {
    /// Records one audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be recorded.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Emits audit events as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditRecorder;

impl AuditRecorder for TracingAuditRecorder {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        info!(
            target: "gearbook::audit",
            actor = event.actor.user_id.value(),
            action = event.action.as_str(),
            subject_type = %event.subject_type,
            subject_id = event.subject_id,
            "{}",
            event.message
        );
        Ok(())
    }
}

/// Keeps audit events in memory. Used by tests and the CLI's dry runs.
#[derive(Debug, Default)]
pub struct MemoryAuditRecorder {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditRecorder for MemoryAuditRecorder {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .map_err(|e| AuditError(e.to_string()))?
            .push(event.clone());
        Ok(())
    }
}
