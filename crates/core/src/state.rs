// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_domain::{
    EventId, EventStatus, InventoryNumber, IssueId, ItemId, ItemStatus, StockTypeId,
    remaining_capacity,
};

use crate::command::Command;

/// An item's open issue, as seen at the start of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenIssueRef {
    pub issue_id: IssueId,
    pub event_id: EventId,
}

/// Everything the state machine needs to know about one unit.
///
/// The persistence layer reads this inside the same transaction that applies
/// the resulting [`Transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub inventory_number: InventoryNumber,
    pub stock_type_id: StockTypeId,
    /// The cached status column.
    pub status: ItemStatus,
    pub is_lost: bool,
    /// Whether an independent repair ticket is open.
    pub has_open_repair: bool,
    pub open_issue: Option<OpenIssueRef>,
}

impl ItemSnapshot {
    /// Whether the unit is held for repair, by ticket or by cached status.
    #[must_use]
    pub fn in_repair(&self) -> bool {
        self.has_open_repair || self.status == ItemStatus::Repair
    }
}

/// Reservation state of one event for the unit's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCapacity {
    pub event_id: EventId,
    pub status: EventStatus,
    /// `None` when the event has no reservation row for the type.
    pub reserved: Option<u32>,
    /// Open issues at the event for the type.
    pub open_issued: u32,
}

impl EventCapacity {
    /// Units of the type that may still be issued to the event.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        remaining_capacity(self.reserved, self.open_issued)
    }
}

/// The writes an accepted command requires, to be applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub command: Command,
    /// Issue to stamp with a return timestamp.
    pub close_issue: Option<IssueId>,
    /// Event to open a new issue for.
    pub open_issue_for: Option<EventId>,
    pub previous_status: ItemStatus,
    pub new_status: ItemStatus,
    /// Human-readable reason, recorded with the status change.
    pub reason: String,
}
