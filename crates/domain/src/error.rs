// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{EventStatus, ItemId};
use thiserror::Error;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A date range starts after it ends.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The first day of the range.
        start: time::Date,
        /// The last day of the range.
        end: time::Date,
    },
    /// A booking or hold quantity must be positive.
    #[error("Invalid quantity for {context}: must be greater than 0")]
    ZeroQuantity {
        /// What the quantity was for.
        context: &'static str,
    },
    /// A stored quantity or count does not fit the domain range.
    #[error("Quantity out of range: {0}")]
    QuantityOutOfRange(i64),
    /// Inventory numbers must be non-empty.
    #[error("Invalid inventory number: '{0}'")]
    InvalidInventoryNumber(String),
    /// A name field is empty.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// Unknown item status string.
    #[error("Invalid item status: '{0}'")]
    InvalidItemStatus(String),
    /// Unknown event status string.
    #[error("Invalid event status: '{0}'")]
    InvalidEventStatus(String),
    /// Unknown repair hold status string.
    #[error("Invalid repair hold status: '{0}'")]
    InvalidRepairHoldStatus(String),
    /// An event may only leave the planned state, and only once.
    #[error("Cannot move event from '{from}' to '{to}'")]
    InvalidEventTransition {
        /// The current event status.
        from: EventStatus,
        /// The requested event status.
        to: EventStatus,
    },
    /// An item cannot be listed as a component of itself.
    #[error("Item {0} cannot be a component of itself")]
    SelfReferencingKit(ItemId),
    /// Kit membership is one-directional.
    #[error("Item {component} already lists item {parent} as a component")]
    ReciprocalKit {
        /// The requested kit parent.
        parent: ItemId,
        /// The requested component.
        component: ItemId,
    },
    /// The component is already part of the kit.
    #[error("Item {component} is already a component of item {parent}")]
    DuplicateKitComponent {
        /// The kit parent.
        parent: ItemId,
        /// The duplicated component.
        component: ItemId,
    },
    /// A repair ticket is already open for the item.
    #[error("Item {0} already has an open repair ticket")]
    RepairAlreadyOpen(ItemId),
    /// There is no open repair ticket to close.
    #[error("Item {0} has no open repair ticket")]
    NoOpenRepair(ItemId),
    /// A repair hold was already closed.
    #[error("Repair hold {0} is already returned")]
    RepairHoldAlreadyReturned(i64),
}
