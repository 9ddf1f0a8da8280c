// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for Gearbook.
//!
//! Handlers take plain request DTOs, call the persistence layer, and turn
//! its outcomes into responses or an [`ApiError`]:
//!
//! - A refused issuance command becomes `ApiError::PolicyRejection` with a
//!   stable `code`.
//! - A write that lost a race is retried once, then surfaces as
//!   `ApiError::Conflict`.
//! - Audit records and notifications are emitted after commit through
//!   [`Collaborators`]; their failures are logged, never returned.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod collaborators;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use collaborators::{Collaborators, retry_on_conflict};
pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    add_kit_component, cancel_event, check_cancel, check_close, close_event, close_repair,
    close_repair_hold, create_category, create_equipment_type, create_event, create_item,
    create_stock_type, get_availability, get_event_summary, get_item, get_kit, issue_item,
    mark_lost, open_repair, open_repair_hold, resolve_item, return_item, set_booking,
    set_equipment_quantity, set_reservation, transfer_item,
};
pub use request_response::{
    AddKitComponentRequest, AvailabilityRequest, AvailabilityResponse, BlockerInfo,
    BookingResponse, CategoryResponse, CloseRepairRequest, CreateCategoryRequest,
    CreateEquipmentTypeRequest, CreateEventRequest, CreateItemRequest, CreateStockTypeRequest,
    EquipmentTypeResponse, EventResponse, EventSummaryResponse, IssuanceResponse, IssueRequest,
    ItemRef, ItemResponse, KitResponse, LifecycleCheckResponse, MarkLostRequest,
    OpenRepairHoldRequest, OpenRepairRequest, RepairHoldResponse, RepairResponse,
    ReservationInfo, ReservationResponse, ReturnRequest, SetBookingRequest,
    SetReservationRequest, StockTypeResponse, TransferRequest,
};
