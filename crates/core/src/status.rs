// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_audit::Actor;
use gearbook_domain::{ItemId, ItemStatus};
use serde::{Deserialize, Serialize};

use crate::state::Transition;

/// A request to change the cached status of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub item_id: ItemId,
    pub new_status: ItemStatus,
    pub actor: Actor,
    pub reason: String,
    /// Free-form context stored alongside the change.
    pub metadata: serde_json::Value,
}

/// The single way to change a unit's status.
///
/// Implementations must at least update the status durably. Anything else
/// they keep (history rows, caches) is their own business.
pub trait StatusSetter {
    type Error;

    /// Applies a status change.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error if the change could not be stored.
    fn set_status(&mut self, change: &StatusChange) -> Result<(), Self::Error>;
}

impl Transition {
    /// Builds the status change this transition implies.
    #[must_use]
    pub fn status_change(&self, actor: &Actor, metadata: serde_json::Value) -> StatusChange {
        StatusChange {
            item_id: self.command.item_id(),
            new_status: self.new_status,
            actor: actor.clone(),
            reason: self.reason.clone(),
            metadata,
        }
    }
}

/// A [`StatusSetter`] that keeps changes in memory.
#[derive(Debug, Default)]
pub struct RecordingStatusSetter {
    changes: Vec<StatusChange>,
}

impl RecordingStatusSetter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Changes applied so far, oldest first.
    #[must_use]
    pub fn changes(&self) -> &[StatusChange] {
        &self.changes
    }

    /// The most recent status set for `item_id`.
    #[must_use]
    pub fn current(&self, item_id: ItemId) -> Option<ItemStatus> {
        self.changes
            .iter()
            .rev()
            .find(|change| change.item_id == item_id)
            .map(|change| change.new_status)
    }
}

impl StatusSetter for RecordingStatusSetter {
    type Error = std::convert::Infallible;

    fn set_status(&mut self, change: &StatusChange) -> Result<(), Self::Error> {
        self.changes.push(change.clone());
        Ok(())
    }
}
