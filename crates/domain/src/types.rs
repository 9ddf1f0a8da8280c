// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Generates a store-assigned identifier newtype.
///
/// Every identifier is a 64-bit row id. The newtypes exist so that an item id
/// can never be passed where an event id is expected.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw row id.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a catalog category.
    CategoryId
);
id_type!(
    /// Identifier of a fungible (bulk) equipment type.
    EquipmentTypeId
);
id_type!(
    /// Identifier of a bulk booking.
    BookingId
);
id_type!(
    /// Identifier of a bulk repair hold.
    RepairHoldId
);
id_type!(
    /// Identifier of a serialized equipment type.
    StockTypeId
);
id_type!(
    /// Identifier of a single serialized unit.
    ItemId
);
id_type!(
    /// Identifier of an event equipment is allocated to.
    EventId
);
id_type!(
    /// Identifier of an issuance record.
    IssueId
);
id_type!(
    /// Identifier of a repair ticket on a serialized unit.
    RepairId
);
id_type!(
    /// Identifier of a user known to the surrounding application.
    UserId
);

/// Status of a serialized unit.
///
/// This is a cached projection of the unit's lifecycle facts (open issue,
/// open repair ticket, lost flag). Use [`ItemStatus::derive`] to compute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// In the warehouse and available for issuance.
    #[default]
    Storage,
    /// Currently issued to an event.
    Event,
    /// Held by an open repair ticket.
    Repair,
    /// Reported lost.
    Lost,
}

impl ItemStatus {
    /// Returns the persisted string form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Event => "event",
            Self::Repair => "repair",
            Self::Lost => "lost",
        }
    }

    /// Derives the status from the unit's lifecycle facts.
    ///
    /// Precedence: lost, then repair, then event, then storage.
    #[must_use]
    pub const fn derive(is_lost: bool, has_open_repair: bool, has_open_issue: bool) -> Self {
        if is_lost {
            Self::Lost
        } else if has_open_repair {
            Self::Repair
        } else if has_open_issue {
            Self::Event
        } else {
            Self::Storage
        }
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "storage" => Ok(Self::Storage),
            "event" => Ok(Self::Event),
            "repair" => Ok(Self::Repair),
            "lost" => Ok(Self::Lost),
            _ => Err(DomainError::InvalidItemStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// The event accepts reservations and issuance.
    #[default]
    Planned,
    /// The event was cancelled before any equipment touched it.
    Cancelled,
    /// The event is finished and all equipment is back.
    Closed,
}

impl EventStatus {
    /// Returns the persisted string form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Cancelled => "cancelled",
            Self::Closed => "closed",
        }
    }

    /// Returns whether equipment may still be issued to the event.
    #[must_use]
    pub const fn accepts_issuance(&self) -> bool {
        matches!(self, Self::Planned)
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Only `Planned` may move, and only to `Cancelled` or `Closed`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planned, Self::Cancelled | Self::Closed)
        )
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "cancelled" => Ok(Self::Cancelled),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidEventStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a bulk repair hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairHoldStatus {
    /// Units are out for repair and count against availability.
    InRepair,
    /// Units came back; the hold no longer counts.
    Returned,
}

impl RepairHoldStatus {
    /// Returns the persisted string form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InRepair => "in_repair",
            Self::Returned => "returned",
        }
    }
}

impl FromStr for RepairHoldStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_repair" => Ok(Self::InRepair),
            "returned" => Ok(Self::Returned),
            _ => Err(DomainError::InvalidRepairHoldStatus(s.to_string())),
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The first day of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// The last day of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Two inclusive ranges overlap iff each starts on or before the other ends.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Overlap test against a range whose end may be open.
    ///
    /// An open end overlaps every day on or after `start`.
    #[must_use]
    pub fn overlaps_open(&self, start: Date, end: Option<Date>) -> bool {
        start <= self.end && end.is_none_or(|end| end >= self.start)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A catalog category. Categories may nest one level via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

/// A fungible catalog line tracked by total quantity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub equipment_type_id: EquipmentTypeId,
    pub category_id: CategoryId,
    pub name: String,
    pub quantity_total: u32,
}

/// A quantity of a fungible type committed to an event over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub equipment_type_id: EquipmentTypeId,
    pub quantity: u32,
    pub range: DateRange,
}

/// Units of a fungible type withdrawn for repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairHold {
    pub repair_hold_id: RepairHoldId,
    pub equipment_type_id: EquipmentTypeId,
    pub quantity: u32,
    pub status: RepairHoldStatus,
    pub start_date: Date,
    /// `None` while the repair has no known end.
    pub end_date: Option<Date>,
}

impl RepairHold {
    /// Returns whether the hold counts against availability in `range`.
    #[must_use]
    pub fn blocks(&self, range: &DateRange) -> bool {
        self.status == RepairHoldStatus::InRepair
            && range.overlaps_open(self.start_date, self.end_date)
    }
}

/// Optional physical attributes of a serialized type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalAttributes {
    pub weight_kg: Option<f64>,
    pub width_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub depth_cm: Option<f64>,
    pub power_w: Option<f64>,
}

/// A serialized catalog line. Its units are [`StockItem`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockType {
    pub stock_type_id: StockTypeId,
    pub category_id: CategoryId,
    pub subcategory_id: Option<CategoryId>,
    pub name: String,
    pub attributes: PhysicalAttributes,
    pub is_active: bool,
}

/// A single physically identifiable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub item_id: ItemId,
    pub stock_type_id: StockTypeId,
    pub inventory_number: InventoryNumber,
    pub status: ItemStatus,
    pub is_lost: bool,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

/// A validated, unique inventory number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InventoryNumber(String);

impl InventoryNumber {
    /// Creates an inventory number, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInventoryNumber` if the value is empty
    /// after trimming.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInventoryNumber(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inventory number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InventoryNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<InventoryNumber> for String {
    fn from(value: InventoryNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for InventoryNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A component listed under a kit parent, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitComponent {
    pub parent_id: ItemId,
    pub component_id: ItemId,
    pub position: u32,
}

/// An event that equipment is reserved and issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub name: String,
    pub range: DateRange,
    pub status: EventStatus,
    /// Receives notifications about equipment movements for this event.
    pub responsible_user: Option<UserId>,
}

/// "Up to `quantity` units of this type may be issued to this event."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStockReservation {
    pub event_id: EventId,
    pub stock_type_id: StockTypeId,
    pub quantity: u32,
}

/// An issuance fact: one unit assigned to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStockIssue {
    pub issue_id: IssueId,
    pub event_id: EventId,
    pub item_id: ItemId,
    pub issued_at: OffsetDateTime,
    pub issued_by: UserId,
    pub returned_at: Option<OffsetDateTime>,
    pub returned_by: Option<UserId>,
}

impl EventStockIssue {
    /// An issue is open until it carries a return timestamp.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// A repair ticket on a serialized unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRepair {
    pub repair_id: RepairId,
    pub item_id: ItemId,
    pub reason: String,
    pub opened_at: OffsetDateTime,
    pub closed_at: Option<OffsetDateTime>,
    pub close_note: Option<String>,
}

impl StockRepair {
    /// A ticket is open until it is closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}
