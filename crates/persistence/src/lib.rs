// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Gearbook.
//!
//! This crate stores the catalog, events, bookings, reservations and the
//! issuance history on Diesel + `SQLite`, and applies issuance commands
//! transactionally.
//!
//! ## Transactions
//!
//! Every state-changing operation on [`Persistence`] runs in one
//! `BEGIN IMMEDIATE` transaction. The write lock is taken up front, so the
//! facts an operation reads cannot change before it writes.
//!
//! ## Single-assignment
//!
//! A partial unique index on `event_stock_issues(item_id) WHERE returned_at
//! IS NULL` guarantees at most one open issue per unit. The state machine's
//! pre-checks only turn the common cases into friendly rejections; a write
//! that still collides fails with [`PersistenceError::Conflict`].
//!
//! ## Testing Philosophy
//!
//! - Tests run against a fresh in-memory database per test
//! - Concurrency tests use a temporary file database with one connection per thread

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook::{Command, IssuanceOutcome, StatusChange, StatusSetter};
use gearbook_audit::Actor;
use gearbook_domain::{
    AvailabilityReport, Booking, BookingId, Category, CategoryId, DateRange, EquipmentType,
    EquipmentTypeId, Event, EventId, EventStockIssue, EventStockReservation, GuardDecision,
    ItemId, ItemStatus, KitComponent, OpenIssueSummary, RepairHold, RepairHoldId,
    ReservationTally, StockItem, StockRepair, StockType, StockTypeId, UserId,
    compute_availability, evaluate_cancel, evaluate_close, remaining_capacity,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    BookingReport, IssuanceRecord, NewStockItem, NewStockType, StatusChangeRecord,
};
pub use error::PersistenceError;
pub use mutations::SqliteStatusSetter;

/// Default time a writer waits for the database lock.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Options for file-backed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a writer waits for a lock held by another connection.
    pub busy_timeout_ms: u32,
    /// Whether to switch the database to write-ahead logging.
    pub wal: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            wal: true,
        }
    }
}

/// Persistence adapter over one `SQLite` connection.
///
/// One adapter serves one thread. Processes or threads sharing a file
/// database each open their own adapter.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:gearbook_memdb_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::open(
            &shared_memory_url,
            &StoreOptions {
                busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
                wal: false,
            },
        )?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    /// * `options` - Busy timeout and journal settings
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(
        path: P,
        options: &StoreOptions,
    ) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::sqlite::open(path_str, options)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    fn write<T>(
        &mut self,
        f: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        self.conn.immediate_transaction(f)
    }

    fn read<T>(
        &mut self,
        f: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        self.conn.transaction(f)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Creates a category, optionally under a parent category.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the parent does not exist.
    pub fn create_category(
        &mut self,
        name: &str,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, PersistenceError> {
        self.write(|conn| mutations::catalog::create_category(conn, name, parent_id))
    }

    /// Lists all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(&mut self) -> Result<Vec<Category>, PersistenceError> {
        queries::catalog::list_categories(&mut self.conn)
    }

    /// Creates a fungible equipment type.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the category does not exist.
    pub fn create_equipment_type(
        &mut self,
        category_id: CategoryId,
        name: &str,
        quantity_total: u32,
    ) -> Result<EquipmentType, PersistenceError> {
        self.write(|conn| {
            mutations::catalog::create_equipment_type(conn, category_id, name, quantity_total)
        })
    }

    /// Looks up a fungible equipment type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the type does not exist.
    pub fn get_equipment_type(
        &mut self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<EquipmentType, PersistenceError> {
        queries::catalog::get_equipment_type(&mut self.conn, equipment_type_id)?
            .ok_or_else(|| PersistenceError::not_found("equipment type", equipment_type_id.value()))
    }

    /// Lists all fungible equipment types.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_equipment_types(&mut self) -> Result<Vec<EquipmentType>, PersistenceError> {
        queries::catalog::list_equipment_types(&mut self.conn)
    }

    /// Changes the owned quantity of a fungible type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the type does not exist.
    pub fn set_equipment_quantity(
        &mut self,
        equipment_type_id: EquipmentTypeId,
        quantity_total: u32,
    ) -> Result<EquipmentType, PersistenceError> {
        self.write(|conn| {
            mutations::catalog::set_equipment_quantity(conn, equipment_type_id, quantity_total)
        })
    }

    /// Deletes a fungible type without bookings or repair holds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EntityInUse` if the type is still referenced.
    pub fn delete_equipment_type(
        &mut self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::catalog::delete_equipment_type(conn, equipment_type_id))
    }

    /// Creates a serialized stock type.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or a category does not exist.
    pub fn create_stock_type(
        &mut self,
        new_type: &NewStockType,
    ) -> Result<StockType, PersistenceError> {
        self.write(|conn| mutations::catalog::create_stock_type(conn, new_type))
    }

    /// Looks up a serialized stock type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the type does not exist.
    pub fn get_stock_type(
        &mut self,
        stock_type_id: StockTypeId,
    ) -> Result<StockType, PersistenceError> {
        queries::catalog::get_stock_type(&mut self.conn, stock_type_id)?
            .ok_or_else(|| PersistenceError::not_found("stock type", stock_type_id.value()))
    }

    /// Lists serialized stock types.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_stock_types(
        &mut self,
        active_only: bool,
    ) -> Result<Vec<StockType>, PersistenceError> {
        queries::catalog::list_stock_types(&mut self.conn, active_only)
    }

    /// Activates or retires a stock type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the type does not exist.
    pub fn set_stock_type_active(
        &mut self,
        stock_type_id: StockTypeId,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::catalog::set_stock_type_active(conn, stock_type_id, is_active))
    }

    /// Deletes a stock type without units.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EntityInUse` if units of the type exist.
    pub fn delete_stock_type(
        &mut self,
        stock_type_id: StockTypeId,
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::catalog::delete_stock_type(conn, stock_type_id))
    }

    /// Creates a serialized unit in storage.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the inventory number is taken.
    pub fn create_item(&mut self, new_item: &NewStockItem) -> Result<StockItem, PersistenceError> {
        self.write(|conn| mutations::catalog::create_item(conn, new_item))
    }

    /// Looks up a serialized unit.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the unit does not exist.
    pub fn get_item(&mut self, item_id: ItemId) -> Result<StockItem, PersistenceError> {
        queries::catalog::get_item(&mut self.conn, item_id)?
            .ok_or_else(|| PersistenceError::not_found("item", item_id.value()))
    }

    /// Looks up a serialized unit by inventory number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_item_by_inventory_number(
        &mut self,
        inventory_number: &str,
    ) -> Result<Option<StockItem>, PersistenceError> {
        queries::catalog::get_item_by_inventory_number(&mut self.conn, inventory_number)
    }

    /// Returns the current status of a unit.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the unit does not exist.
    pub fn item_status(&mut self, item_id: ItemId) -> Result<ItemStatus, PersistenceError> {
        Ok(self.get_item(item_id)?.status)
    }

    /// Lists the units of a stock type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_items(
        &mut self,
        stock_type_id: StockTypeId,
    ) -> Result<Vec<StockItem>, PersistenceError> {
        queries::catalog::list_items(&mut self.conn, stock_type_id)
    }

    /// Appends a component to a kit.
    ///
    /// # Errors
    ///
    /// Returns an error if either unit does not exist or the kit rules are broken.
    pub fn add_kit_component(
        &mut self,
        parent_id: ItemId,
        component_id: ItemId,
    ) -> Result<KitComponent, PersistenceError> {
        self.write(|conn| mutations::catalog::add_kit_component(conn, parent_id, component_id))
    }

    /// Removes a component from a kit.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the component is not in the kit.
    pub fn remove_kit_component(
        &mut self,
        parent_id: ItemId,
        component_id: ItemId,
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::catalog::remove_kit_component(conn, parent_id, component_id))
    }

    /// Lists the components of a kit in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_kit_components(
        &mut self,
        parent_id: ItemId,
    ) -> Result<Vec<KitComponent>, PersistenceError> {
        queries::catalog::list_kit_components(&mut self.conn, parent_id)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Creates a planned event.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn create_event(
        &mut self,
        name: &str,
        range: DateRange,
        responsible_user: Option<UserId>,
    ) -> Result<Event, PersistenceError> {
        self.write(|conn| mutations::events::insert_event(conn, name, range, responsible_user))
    }

    /// Looks up an event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the event does not exist.
    pub fn get_event(&mut self, event_id: EventId) -> Result<Event, PersistenceError> {
        queries::events::get_event(&mut self.conn, event_id)?
            .ok_or_else(|| PersistenceError::not_found("event", event_id.value()))
    }

    /// Lists all events.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events(&mut self) -> Result<Vec<Event>, PersistenceError> {
        queries::events::list_events(&mut self.conn)
    }

    /// Evaluates whether an event could be cancelled now, without changing it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the event does not exist.
    pub fn can_cancel(&mut self, event_id: EventId) -> Result<GuardDecision, PersistenceError> {
        self.read(|conn| {
            require_event(conn, event_id)?;
            Ok(evaluate_cancel(queries::events::count_issue_records(conn, event_id)?))
        })
    }

    /// Evaluates whether an event could be closed now, without changing it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the event does not exist.
    pub fn can_close(&mut self, event_id: EventId) -> Result<GuardDecision, PersistenceError> {
        self.read(|conn| {
            require_event(conn, event_id)?;
            Ok(evaluate_close(
                &queries::events::list_open_issue_summaries(conn, event_id)?,
                &queries::ledger::list_reservation_tallies(conn, event_id)?,
            ))
        })
    }

    /// Cancels an event if no equipment has touched it.
    ///
    /// Returns the guard decision; the event is only cancelled when it allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or is no longer planned.
    pub fn cancel_event(&mut self, event_id: EventId) -> Result<GuardDecision, PersistenceError> {
        self.write(|conn| mutations::events::cancel_event(conn, event_id))
    }

    /// Closes an event if every unit is back and every reservation was met.
    ///
    /// Returns the guard decision; the event is only closed when it allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or is no longer planned.
    pub fn close_event(&mut self, event_id: EventId) -> Result<GuardDecision, PersistenceError> {
        self.write(|conn| mutations::events::close_event(conn, event_id))
    }

    /// Lists every issue record of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_event_issues(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<EventStockIssue>, PersistenceError> {
        queries::events::list_event_issues(&mut self.conn, event_id)
    }

    /// Lists the units still out at an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_issues(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<OpenIssueSummary>, PersistenceError> {
        queries::events::list_open_issue_summaries(&mut self.conn, event_id)
    }

    // ========================================================================
    // Fungible bookings & availability
    // ========================================================================

    /// Stores the booking of a fungible type for an event.
    ///
    /// Replaces any earlier booking for the same (event, type). Never refuses
    /// for lack of stock: the returned report flags over-commitment instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the event or type does not exist or the quantity
    /// is zero.
    pub fn set_booking(
        &mut self,
        event_id: EventId,
        equipment_type_id: EquipmentTypeId,
        quantity: u32,
        range: DateRange,
    ) -> Result<BookingReport, PersistenceError> {
        self.write(|conn| {
            require_event(conn, event_id)?;
            let equipment_type: EquipmentType = require_equipment_type(conn, equipment_type_id)?;
            let booking: Booking = mutations::bookings::upsert_booking(
                conn,
                event_id,
                equipment_type_id,
                quantity,
                range,
            )?;
            let availability: AvailabilityReport =
                availability_for(conn, &equipment_type, &range, Some(booking.booking_id))?;

            Ok(BookingReport {
                over_committed: !availability.can_fit(quantity),
                booking,
                availability,
            })
        })
    }

    /// Deletes a booking.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the booking does not exist.
    pub fn delete_booking(&mut self, booking_id: BookingId) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::bookings::delete_booking(conn, booking_id))
    }

    /// Lists the bookings of a fungible type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_for_type(
        &mut self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_type(&mut self.conn, equipment_type_id)
    }

    /// Lists the bookings of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_for_event(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_event(&mut self.conn, event_id)
    }

    /// Computes how many units of a fungible type are free over `range`.
    ///
    /// `exclude` leaves one booking out, for re-checking it against itself.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the type does not exist.
    pub fn availability(
        &mut self,
        equipment_type_id: EquipmentTypeId,
        range: DateRange,
        exclude: Option<BookingId>,
    ) -> Result<AvailabilityReport, PersistenceError> {
        self.read(|conn| {
            let equipment_type: EquipmentType = require_equipment_type(conn, equipment_type_id)?;
            availability_for(conn, &equipment_type, &range, exclude)
        })
    }

    /// Withdraws units of a fungible type for repair.
    ///
    /// # Errors
    ///
    /// Returns an error if the type does not exist or the input is invalid.
    pub fn open_repair_hold(
        &mut self,
        equipment_type_id: EquipmentTypeId,
        quantity: u32,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<RepairHold, PersistenceError> {
        self.write(|conn| {
            require_equipment_type(conn, equipment_type_id)?;
            mutations::bookings::insert_repair_hold(
                conn,
                equipment_type_id,
                quantity,
                start_date,
                end_date,
            )
        })
    }

    /// Marks a repair hold returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the hold does not exist or is already returned.
    pub fn close_repair_hold(
        &mut self,
        repair_hold_id: RepairHoldId,
        end_date: Date,
    ) -> Result<RepairHold, PersistenceError> {
        self.write(|conn| mutations::bookings::close_repair_hold(conn, repair_hold_id, end_date))
    }

    /// Lists the repair holds of a fungible type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_repair_holds(
        &mut self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<Vec<RepairHold>, PersistenceError> {
        queries::bookings::list_repair_holds_for_type(&mut self.conn, equipment_type_id)
    }

    // ========================================================================
    // Reservation ledger
    // ========================================================================

    /// Sets the reserved quantity of a stock type for an event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the event or type does not exist.
    pub fn set_reservation(
        &mut self,
        event_id: EventId,
        stock_type_id: StockTypeId,
        quantity: u32,
    ) -> Result<EventStockReservation, PersistenceError> {
        self.write(|conn| {
            mutations::ledger::upsert_reservation(conn, event_id, stock_type_id, quantity)
        })
    }

    /// Looks up the reservation of a stock type for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(
        &mut self,
        event_id: EventId,
        stock_type_id: StockTypeId,
    ) -> Result<Option<EventStockReservation>, PersistenceError> {
        queries::ledger::get_reservation(&mut self.conn, event_id, stock_type_id)
    }

    /// Units of a type that may still be issued to an event.
    ///
    /// Zero without a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn remaining_capacity(
        &mut self,
        event_id: EventId,
        stock_type_id: StockTypeId,
    ) -> Result<u32, PersistenceError> {
        self.read(|conn| {
            let reserved: Option<u32> =
                queries::ledger::get_reservation(conn, event_id, stock_type_id)?
                    .map(|r| r.quantity);
            let open_issued: u32 =
                queries::ledger::count_open_issues(conn, event_id, stock_type_id)?;
            Ok(remaining_capacity(reserved, open_issued))
        })
    }

    /// Lists the per-type reservation tallies of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<ReservationTally>, PersistenceError> {
        self.read(|conn| queries::ledger::list_reservation_tallies(conn, event_id))
    }

    // ========================================================================
    // Issuance
    // ========================================================================

    /// Applies an issuance command in one immediate transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the unit or event does not
    /// exist, or `PersistenceError::Conflict` if a concurrent writer won.
    pub fn execute(
        &mut self,
        command: Command,
        actor: &Actor,
    ) -> Result<IssuanceOutcome<IssuanceRecord>, PersistenceError> {
        self.write(|conn| mutations::issuance::execute_command(conn, command, actor))
    }

    /// Issues a unit from storage to an event.
    ///
    /// # Errors
    ///
    /// See [`Persistence::execute`].
    pub fn issue_item(
        &mut self,
        event_id: EventId,
        item_id: ItemId,
        actor: &Actor,
    ) -> Result<IssuanceOutcome<IssuanceRecord>, PersistenceError> {
        self.execute(Command::Issue { event_id, item_id }, actor)
    }

    /// Returns a unit from an event.
    ///
    /// # Errors
    ///
    /// See [`Persistence::execute`].
    pub fn return_item(
        &mut self,
        event_id: EventId,
        item_id: ItemId,
        actor: &Actor,
    ) -> Result<IssuanceOutcome<IssuanceRecord>, PersistenceError> {
        self.execute(Command::Return { event_id, item_id }, actor)
    }

    /// Moves a unit from one event to another.
    ///
    /// # Errors
    ///
    /// See [`Persistence::execute`].
    pub fn transfer_item(
        &mut self,
        source_event_id: EventId,
        target_event_id: EventId,
        item_id: ItemId,
        actor: &Actor,
    ) -> Result<IssuanceOutcome<IssuanceRecord>, PersistenceError> {
        self.execute(
            Command::Transfer {
                source_event_id,
                target_event_id,
                item_id,
            },
            actor,
        )
    }

    /// Returns the open issue of a unit, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn open_issue_for_item(
        &mut self,
        item_id: ItemId,
    ) -> Result<Option<EventStockIssue>, PersistenceError> {
        queries::issuance::get_open_issue_for_item(&mut self.conn, item_id)
    }

    /// Lists every issue record of a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn item_issue_history(
        &mut self,
        item_id: ItemId,
    ) -> Result<Vec<EventStockIssue>, PersistenceError> {
        queries::issuance::list_item_issues(&mut self.conn, item_id)
    }

    // ========================================================================
    // Repairs & lost items
    // ========================================================================

    /// Opens a repair ticket on a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit does not exist or already has an open ticket.
    pub fn open_repair(
        &mut self,
        item_id: ItemId,
        reason: &str,
        actor: &Actor,
    ) -> Result<StockRepair, PersistenceError> {
        self.write(|conn| mutations::repairs::open_repair(conn, item_id, reason, actor))
    }

    /// Closes the open repair ticket of a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit has no open ticket.
    pub fn close_repair(
        &mut self,
        item_id: ItemId,
        note: Option<&str>,
        actor: &Actor,
    ) -> Result<StockRepair, PersistenceError> {
        self.write(|conn| mutations::repairs::close_repair(conn, item_id, note, actor))
    }

    /// Lists the repair tickets of a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_repairs(&mut self, item_id: ItemId) -> Result<Vec<StockRepair>, PersistenceError> {
        queries::repairs::list_repairs(&mut self.conn, item_id)
    }

    /// Reports a unit lost.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the unit does not exist.
    pub fn mark_item_lost(
        &mut self,
        item_id: ItemId,
        reason: &str,
        actor: &Actor,
    ) -> Result<StockItem, PersistenceError> {
        self.write(|conn| mutations::repairs::set_item_lost(conn, item_id, true, reason, actor))
    }

    /// Clears the lost flag of a unit.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the unit does not exist.
    pub fn mark_item_found(
        &mut self,
        item_id: ItemId,
        reason: &str,
        actor: &Actor,
    ) -> Result<StockItem, PersistenceError> {
        self.write(|conn| mutations::repairs::set_item_lost(conn, item_id, false, reason, actor))
    }

    // ========================================================================
    // Status history
    // ========================================================================

    /// Lists the status history of a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn status_history(
        &mut self,
        item_id: ItemId,
    ) -> Result<Vec<StatusChangeRecord>, PersistenceError> {
        queries::status::list_status_changes(&mut self.conn, item_id)
    }
}

/// Overrides a unit's status directly, recording the change.
///
/// The status is normally derived by issuance, repairs and the lost flag;
/// this is the escape hatch for correcting it by hand.
impl StatusSetter for Persistence {
    type Error = PersistenceError;

    fn set_status(&mut self, change: &StatusChange) -> Result<(), Self::Error> {
        self.write(|conn| SqliteStatusSetter::new(conn).set_status(change))
    }
}

fn require_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Event, PersistenceError> {
    queries::events::get_event(conn, event_id)?
        .ok_or_else(|| PersistenceError::not_found("event", event_id.value()))
}

fn require_equipment_type(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<EquipmentType, PersistenceError> {
    queries::catalog::get_equipment_type(conn, equipment_type_id)?
        .ok_or_else(|| PersistenceError::not_found("equipment type", equipment_type_id.value()))
}

fn availability_for(
    conn: &mut SqliteConnection,
    equipment_type: &EquipmentType,
    range: &DateRange,
    exclude: Option<BookingId>,
) -> Result<AvailabilityReport, PersistenceError> {
    let bookings: Vec<Booking> =
        queries::bookings::list_bookings_for_type(conn, equipment_type.equipment_type_id)?;
    let holds: Vec<RepairHold> =
        queries::bookings::list_repair_holds_for_type(conn, equipment_type.equipment_type_id)?;
    Ok(compute_availability(
        equipment_type.quantity_total,
        &bookings,
        &holds,
        range,
        exclude,
    ))
}
