// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for Gearbook.
//!
//! Everything here is pure: no I/O, no clocks. The persistence layer loads
//! records and hands them to these functions inside its transactions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod error;
mod lifecycle;
mod reservation;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{
    AvailabilityReport, compute_availability, in_repair_in_range, reserved_in_range,
};
pub use error::DomainError;
pub use lifecycle::{
    GuardDecision, LifecycleBlocker, OpenIssueSummary, evaluate_cancel, evaluate_close,
};
pub use reservation::{ReservationTally, remaining_capacity};
pub use types::{
    Booking, BookingId, Category, CategoryId, DateRange, EquipmentType, EquipmentTypeId, Event,
    EventId, EventStatus, EventStockIssue, EventStockReservation, InventoryNumber, IssueId,
    ItemId, ItemStatus, KitComponent, PhysicalAttributes, RepairHold, RepairHoldId,
    RepairHoldStatus, RepairId, StockItem, StockRepair, StockType, StockTypeId, UserId,
};
pub use validation::{
    quantity_from_store, validate_kit_component, validate_name, validate_positive_quantity,
};
