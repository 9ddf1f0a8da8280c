// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain records.
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as RFC 3339 text.
//! Flags are stored as `0`/`1` integers.

use std::str::FromStr;

use diesel::prelude::*;
use gearbook::Command;
use gearbook_domain::{
    AvailabilityReport, Booking, BookingId, Category, CategoryId, DateRange, EquipmentType,
    EquipmentTypeId, Event, EventId, EventStatus, EventStockIssue, EventStockReservation,
    InventoryNumber, IssueId, ItemId, ItemStatus, KitComponent, PhysicalAttributes, RepairHold,
    RepairHoldId, RepairHoldStatus, RepairId, StockItem, StockRepair, StockType, StockTypeId,
    UserId, quantity_from_store,
};
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{
    bookings, categories, equipment_types, event_stock_issues, event_stock_reservations, events,
    item_status_changes, kit_components, repair_holds, stock_items, stock_repairs, stock_types,
};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub(crate) fn format_date(date: Date) -> Result<String, PersistenceError> {
    Ok(date.format(DATE_FORMAT)?)
}

pub(crate) fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Ok(Date::parse(value, DATE_FORMAT)?)
}

pub(crate) fn now_timestamp() -> Result<String, PersistenceError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryRow {
    pub category_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = equipment_types)]
pub(crate) struct EquipmentTypeRow {
    pub equipment_type_id: i64,
    pub category_id: i64,
    pub name: String,
    pub quantity_total: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingRow {
    pub booking_id: i64,
    pub event_id: i64,
    pub equipment_type_id: i64,
    pub quantity: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = repair_holds)]
pub(crate) struct RepairHoldRow {
    pub repair_hold_id: i64,
    pub equipment_type_id: i64,
    pub quantity: i64,
    pub status: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = stock_types)]
pub(crate) struct StockTypeRow {
    pub stock_type_id: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub name: String,
    pub weight_kg: Option<f64>,
    pub width_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub depth_cm: Option<f64>,
    pub power_w: Option<f64>,
    pub is_active: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = stock_items)]
pub(crate) struct StockItemRow {
    pub item_id: i64,
    pub stock_type_id: i64,
    pub inventory_number: String,
    pub status: String,
    pub is_lost: i32,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = kit_components)]
pub(crate) struct KitComponentRow {
    pub parent_id: i64,
    pub component_id: i64,
    pub position: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
pub(crate) struct EventRow {
    pub event_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub responsible_user_id: Option<i64>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = event_stock_reservations)]
pub(crate) struct ReservationRow {
    pub event_id: i64,
    pub stock_type_id: i64,
    pub quantity: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = event_stock_issues)]
pub(crate) struct IssueRow {
    pub issue_id: i64,
    pub event_id: i64,
    pub item_id: i64,
    pub issued_at: String,
    pub issued_by: i64,
    pub returned_at: Option<String>,
    pub returned_by: Option<i64>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = stock_repairs)]
pub(crate) struct StockRepairRow {
    pub repair_id: i64,
    pub item_id: i64,
    pub reason: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub close_note: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = item_status_changes)]
pub(crate) struct StatusChangeRow {
    pub change_id: i64,
    pub item_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub actor_user_id: i64,
    pub actor_display_name: String,
    pub reason: String,
    pub metadata_json: String,
    pub changed_at: String,
}

// ============================================================================
// Row -> domain
// ============================================================================

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            parent_id: row.parent_id.map(CategoryId::new),
        }
    }
}

impl TryFrom<EquipmentTypeRow> for EquipmentType {
    type Error = PersistenceError;

    fn try_from(row: EquipmentTypeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            equipment_type_id: EquipmentTypeId::new(row.equipment_type_id),
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            quantity_total: quantity_from_store(row.quantity_total)?,
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_id: BookingId::new(row.booking_id),
            event_id: EventId::new(row.event_id),
            equipment_type_id: EquipmentTypeId::new(row.equipment_type_id),
            quantity: quantity_from_store(row.quantity)?,
            range: DateRange::new(parse_date(&row.start_date)?, parse_date(&row.end_date)?)?,
        })
    }
}

impl TryFrom<RepairHoldRow> for RepairHold {
    type Error = PersistenceError;

    fn try_from(row: RepairHoldRow) -> Result<Self, Self::Error> {
        Ok(Self {
            repair_hold_id: RepairHoldId::new(row.repair_hold_id),
            equipment_type_id: EquipmentTypeId::new(row.equipment_type_id),
            quantity: quantity_from_store(row.quantity)?,
            status: RepairHoldStatus::from_str(&row.status)?,
            start_date: parse_date(&row.start_date)?,
            end_date: row.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

impl From<StockTypeRow> for StockType {
    fn from(row: StockTypeRow) -> Self {
        Self {
            stock_type_id: StockTypeId::new(row.stock_type_id),
            category_id: CategoryId::new(row.category_id),
            subcategory_id: row.subcategory_id.map(CategoryId::new),
            name: row.name,
            attributes: PhysicalAttributes {
                weight_kg: row.weight_kg,
                width_cm: row.width_cm,
                height_cm: row.height_cm,
                depth_cm: row.depth_cm,
                power_w: row.power_w,
            },
            is_active: row.is_active != 0,
        }
    }
}

impl TryFrom<StockItemRow> for StockItem {
    type Error = PersistenceError;

    fn try_from(row: StockItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: ItemId::new(row.item_id),
            stock_type_id: StockTypeId::new(row.stock_type_id),
            inventory_number: InventoryNumber::new(&row.inventory_number)?,
            status: ItemStatus::from_str(&row.status)?,
            is_lost: row.is_lost != 0,
            comment: row.comment,
            photo: row.photo,
        })
    }
}

impl TryFrom<KitComponentRow> for KitComponent {
    type Error = PersistenceError;

    fn try_from(row: KitComponentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            parent_id: ItemId::new(row.parent_id),
            component_id: ItemId::new(row.component_id),
            position: quantity_from_store(row.position)?,
        })
    }
}

impl TryFrom<EventRow> for Event {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: EventId::new(row.event_id),
            name: row.name,
            range: DateRange::new(parse_date(&row.start_date)?, parse_date(&row.end_date)?)?,
            status: EventStatus::from_str(&row.status)?,
            responsible_user: row.responsible_user_id.map(UserId::new),
        })
    }
}

impl TryFrom<ReservationRow> for EventStockReservation {
    type Error = PersistenceError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: EventId::new(row.event_id),
            stock_type_id: StockTypeId::new(row.stock_type_id),
            quantity: quantity_from_store(row.quantity)?,
        })
    }
}

impl TryFrom<IssueRow> for EventStockIssue {
    type Error = PersistenceError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            issue_id: IssueId::new(row.issue_id),
            event_id: EventId::new(row.event_id),
            item_id: ItemId::new(row.item_id),
            issued_at: parse_timestamp(&row.issued_at)?,
            issued_by: UserId::new(row.issued_by),
            returned_at: parse_optional_timestamp(row.returned_at.as_deref())?,
            returned_by: row.returned_by.map(UserId::new),
        })
    }
}

impl TryFrom<StockRepairRow> for StockRepair {
    type Error = PersistenceError;

    fn try_from(row: StockRepairRow) -> Result<Self, Self::Error> {
        Ok(Self {
            repair_id: RepairId::new(row.repair_id),
            item_id: ItemId::new(row.item_id),
            reason: row.reason,
            opened_at: parse_timestamp(&row.opened_at)?,
            closed_at: parse_optional_timestamp(row.closed_at.as_deref())?,
            close_note: row.close_note,
        })
    }
}

// ============================================================================
// Public records
// ============================================================================

/// A stored booking together with the availability it was checked against.
///
/// Bookings are never refused for lack of stock. `availability` excludes the
/// booking itself, so `over_committed` is true when the booking's quantity
/// does not fit into what the other bookings and repairs leave free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReport {
    pub booking: Booking,
    pub availability: AvailabilityReport,
    pub over_committed: bool,
}

/// What an accepted issue, return or transfer wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub command: Command,
    pub inventory_number: InventoryNumber,
    /// The issue opened by this command, if any.
    pub opened_issue: Option<IssueId>,
    /// The issue closed by this command, if any.
    pub closed_issue: Option<IssueId>,
    pub previous_status: ItemStatus,
    pub new_status: ItemStatus,
}

/// A row of the item status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    pub change_id: i64,
    pub item_id: ItemId,
    pub previous_status: ItemStatus,
    pub new_status: ItemStatus,
    pub actor_user_id: UserId,
    pub actor_display_name: String,
    pub reason: String,
    pub metadata: serde_json::Value,
    pub changed_at: OffsetDateTime,
}

impl TryFrom<StatusChangeRow> for StatusChangeRecord {
    type Error = PersistenceError;

    fn try_from(row: StatusChangeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            change_id: row.change_id,
            item_id: ItemId::new(row.item_id),
            previous_status: ItemStatus::from_str(&row.previous_status)?,
            new_status: ItemStatus::from_str(&row.new_status)?,
            actor_user_id: UserId::new(row.actor_user_id),
            actor_display_name: row.actor_display_name,
            reason: row.reason,
            metadata: serde_json::from_str(&row.metadata_json)?,
            changed_at: parse_timestamp(&row.changed_at)?,
        })
    }
}

/// Input for a new serialized type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockType {
    pub category_id: CategoryId,
    pub subcategory_id: Option<CategoryId>,
    pub name: String,
    pub attributes: PhysicalAttributes,
}

/// Input for a new serialized unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub stock_type_id: StockTypeId,
    pub inventory_number: String,
    pub comment: Option<String>,
    pub photo: Option<String>,
}
