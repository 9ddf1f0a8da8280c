// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use gearbook_domain::PhysicalAttributes;
use serde::{Deserialize, Serialize};
use time::Date;

/// How a request names a serialized unit.
///
/// Operators usually scan the inventory number; tooling may use the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRef {
    Id(i64),
    InventoryNumber(String),
}

// ============================================================================
// Catalog
// ============================================================================

/// API request to create a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Parent category for a subcategory.
    pub parent_id: Option<i64>,
}

/// API response for a created category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub message: String,
}

/// API request to create a fungible equipment type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEquipmentTypeRequest {
    pub category_id: i64,
    pub name: String,
    /// Total owned quantity.
    pub quantity_total: u32,
}

/// API response describing a fungible equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentTypeResponse {
    pub equipment_type_id: i64,
    pub name: String,
    pub quantity_total: u32,
    pub message: String,
}

/// API request to create a serialized stock type.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStockTypeRequest {
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub name: String,
    pub attributes: PhysicalAttributes,
}

/// API response describing a serialized stock type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTypeResponse {
    pub stock_type_id: i64,
    pub name: String,
    pub is_active: bool,
    pub message: String,
}

/// API request to register a serialized unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub stock_type_id: i64,
    pub inventory_number: String,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

/// API response describing a serialized unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item_id: i64,
    pub stock_type_id: i64,
    pub inventory_number: String,
    pub status: String,
    pub is_lost: bool,
    /// The event the unit is currently issued to, if any.
    pub issued_to_event_id: Option<i64>,
    pub message: String,
}

/// API request to add a unit to a kit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddKitComponentRequest {
    pub parent: ItemRef,
    pub component: ItemRef,
}

/// API response listing a kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitResponse {
    pub parent_id: i64,
    /// Component item ids in position order.
    pub component_ids: Vec<i64>,
    pub message: String,
}

// ============================================================================
// Events
// ============================================================================

/// API request to create an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    /// User to notify about issuance at this event.
    pub responsible_user_id: Option<i64>,
}

/// API response describing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub event_id: i64,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub responsible_user_id: Option<i64>,
    pub message: String,
}

/// One reason a lifecycle transition is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerInfo {
    pub code: String,
    pub message: String,
}

/// API response for a lifecycle check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleCheckResponse {
    pub event_id: i64,
    pub allowed: bool,
    pub blockers: Vec<BlockerInfo>,
}

/// Per-type reservation state of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInfo {
    pub stock_type_id: i64,
    pub stock_type_name: String,
    pub reserved: u32,
    pub open_issued: u32,
    pub ever_issued: u32,
    pub remaining: u32,
}

/// API response summarizing an event's equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummaryResponse {
    pub event: EventResponse,
    pub reservations: Vec<ReservationInfo>,
    /// Inventory numbers of units still out at the event.
    pub unreturned: Vec<String>,
}

// ============================================================================
// Fungible bookings
// ============================================================================

/// API request to book a fungible type for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBookingRequest {
    pub event_id: i64,
    pub equipment_type_id: i64,
    pub quantity: u32,
    pub start_date: Date,
    pub end_date: Date,
}

/// API response for a stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: i64,
    pub event_id: i64,
    pub equipment_type_id: i64,
    pub quantity: u32,
    /// Units left free by other bookings and repairs over the range.
    pub available: u64,
    /// Whether the booking exceeds what is free. The booking is stored anyway.
    pub over_committed: bool,
    pub message: String,
}

/// API request for fungible availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub equipment_type_id: i64,
    pub start_date: Date,
    pub end_date: Date,
}

/// API response for fungible availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub equipment_type_id: i64,
    pub quantity_total: u32,
    pub reserved: u64,
    pub in_repair: u64,
    pub available: u64,
}

/// API request to withdraw fungible units for repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenRepairHoldRequest {
    pub equipment_type_id: i64,
    pub quantity: u32,
    pub start_date: Date,
    /// `None` when the end of the repair is unknown.
    pub end_date: Option<Date>,
}

/// API response describing a repair hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairHoldResponse {
    pub repair_hold_id: i64,
    pub equipment_type_id: i64,
    pub quantity: u32,
    pub status: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub message: String,
}

// ============================================================================
// Reservations & issuance
// ============================================================================

/// API request to set an event's reservation of a serialized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetReservationRequest {
    pub event_id: i64,
    pub stock_type_id: i64,
    pub quantity: u32,
}

/// API response for a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub event_id: i64,
    pub stock_type_id: i64,
    pub reserved: u32,
    /// Units that may still be issued.
    pub remaining: u32,
    pub message: String,
}

/// API request to issue a unit to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub event_id: i64,
    pub item: ItemRef,
}

/// API request to return a unit from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub event_id: i64,
    pub item: ItemRef,
}

/// API request to move a unit from one event to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_event_id: i64,
    pub target_event_id: i64,
    pub item: ItemRef,
}

/// API response for an accepted issue, return or transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceResponse {
    pub item_id: i64,
    pub inventory_number: String,
    /// `issue`, `return` or `transfer`.
    pub command: String,
    /// The event the unit was issued to, returned from, or moved to.
    pub event_id: i64,
    pub previous_status: String,
    pub status: String,
    /// The issue record opened by the command, if any.
    pub issue_id: Option<i64>,
    pub message: String,
}

// ============================================================================
// Repairs & lost items
// ============================================================================

/// API request to open a repair ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRepairRequest {
    pub item: ItemRef,
    pub reason: String,
}

/// API request to close a repair ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseRepairRequest {
    pub item: ItemRef,
    pub note: Option<String>,
}

/// API response describing a repair ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairResponse {
    pub repair_id: i64,
    pub item_id: i64,
    pub is_open: bool,
    /// Item status after the change.
    pub status: String,
    pub message: String,
}

/// API request to set or clear the lost flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkLostRequest {
    pub item: ItemRef,
    pub lost: bool,
    pub reason: String,
}
