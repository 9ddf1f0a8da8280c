// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_domain::{EventId, ItemId};
use serde::{Deserialize, Serialize};

/// A request to move one serialized unit, as data only.
///
/// Commands are the only way to change issuance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Assign a unit from storage to an event.
    Issue {
        /// The event receiving the unit.
        event_id: EventId,
        /// The unit being issued.
        item_id: ItemId,
    },
    /// Bring a unit back from an event.
    Return {
        /// The event the unit is currently issued to.
        event_id: EventId,
        /// The unit being returned.
        item_id: ItemId,
    },
    /// Move a unit directly from one event to another.
    Transfer {
        /// The event the unit is currently issued to.
        source_event_id: EventId,
        /// The event receiving the unit.
        target_event_id: EventId,
        /// The unit being moved.
        item_id: ItemId,
    },
}

impl Command {
    /// The unit this command moves.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        match self {
            Self::Issue { item_id, .. }
            | Self::Return { item_id, .. }
            | Self::Transfer { item_id, .. } => *item_id,
        }
    }

    /// The event whose reservation the command draws on, or the event being
    /// returned from.
    #[must_use]
    pub const fn destination(&self) -> EventId {
        match self {
            Self::Issue { event_id, .. } | Self::Return { event_id, .. } => *event_id,
            Self::Transfer {
                target_event_id, ..
            } => *target_event_id,
        }
    }

    /// Short name used in logs, audit messages and status-change reasons.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::Return { .. } => "return",
            Self::Transfer { .. } => "transfer",
        }
    }
}
