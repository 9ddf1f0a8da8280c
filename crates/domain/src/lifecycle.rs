// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event lifecycle guard.
//!
//! Decides whether an event may be cancelled or closed given its issuance
//! history. The guard never mutates anything; the persistence layer applies
//! the decision inside the same transaction that flips the event status.

use serde::{Deserialize, Serialize};

use crate::reservation::ReservationTally;
use crate::types::{InventoryNumber, ItemId, StockTypeId};

/// A unit that is still out at the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIssueSummary {
    pub item_id: ItemId,
    pub inventory_number: InventoryNumber,
}

/// One reason an event lifecycle transition is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleBlocker {
    /// Equipment has already been issued to the event.
    EquipmentTouched {
        /// Number of issue records, open or closed.
        issue_count: u32,
    },
    /// A unit has not been returned yet.
    UnreturnedItem {
        item_id: ItemId,
        inventory_number: InventoryNumber,
    },
    /// Fewer distinct units were issued than were reserved.
    ReservationShortfall {
        stock_type_id: StockTypeId,
        stock_type_name: String,
        reserved: u32,
        issued: u32,
        shortfall: u32,
    },
}

impl LifecycleBlocker {
    /// Stable code for this blocker.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EquipmentTouched { .. } => "equipment_touched",
            Self::UnreturnedItem { .. } => "unreturned_item",
            Self::ReservationShortfall { .. } => "reservation_shortfall",
        }
    }
}

impl std::fmt::Display for LifecycleBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EquipmentTouched { issue_count } => write!(
                f,
                "equipment has been issued to this event ({issue_count} issue records)"
            ),
            Self::UnreturnedItem {
                inventory_number, ..
            } => write!(f, "item {inventory_number} has not been returned"),
            Self::ReservationShortfall {
                stock_type_name,
                reserved,
                issued,
                shortfall,
                ..
            } => write!(
                f,
                "{stock_type_name}: {issued} of {reserved} reserved units issued, {shortfall} short"
            ),
        }
    }
}

/// Outcome of a lifecycle guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    pub blockers: Vec<LifecycleBlocker>,
}

impl GuardDecision {
    /// Returns whether the transition is permitted.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.blockers.is_empty()
    }

    /// Human-readable reason covering every blocker, or `None` if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        if self.blockers.is_empty() {
            return None;
        }
        Some(
            self.blockers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join("; "),
        )
    }
}

/// Evaluates whether an event can be cancelled.
///
/// Once any equipment has touched the event (an issue record exists, open or
/// closed), cancellation is blocked until resolved by hand.
#[must_use]
pub fn evaluate_cancel(issue_count: u32) -> GuardDecision {
    let mut blockers: Vec<LifecycleBlocker> = Vec::new();
    if issue_count > 0 {
        blockers.push(LifecycleBlocker::EquipmentTouched { issue_count });
    }
    GuardDecision { blockers }
}

/// Evaluates whether an event can be closed.
///
/// Every unit must be back, and every reserved unit must have been issued at
/// least once (a unit swapped out by transfer still counts).
#[must_use]
pub fn evaluate_close(
    open_issues: &[OpenIssueSummary],
    tallies: &[ReservationTally],
) -> GuardDecision {
    let mut blockers: Vec<LifecycleBlocker> = open_issues
        .iter()
        .map(|issue| LifecycleBlocker::UnreturnedItem {
            item_id: issue.item_id,
            inventory_number: issue.inventory_number.clone(),
        })
        .collect();

    blockers.extend(
        tallies
            .iter()
            .filter(|tally| tally.shortfall() > 0)
            .map(|tally| LifecycleBlocker::ReservationShortfall {
                stock_type_id: tally.stock_type_id,
                stock_type_name: tally.stock_type_name.clone(),
                reserved: tally.reserved,
                issued: tally.ever_issued,
                shortfall: tally.shortfall(),
            }),
    );

    GuardDecision { blockers }
}
