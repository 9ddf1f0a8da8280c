// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking and repair hold queries for the fungible line.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{Booking, EquipmentTypeId, EventId, RepairHold, RepairHoldId};

use crate::data_models::{BookingRow, RepairHoldRow};
use crate::diesel_schema::{bookings, repair_holds};
use crate::error::PersistenceError;

/// Retrieves the booking of a type for an event.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_booking_for(
    conn: &mut SqliteConnection,
    event_id: EventId,
    equipment_type_id: EquipmentTypeId,
) -> Result<Option<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::event_id.eq(event_id.value()))
        .filter(bookings::equipment_type_id.eq(equipment_type_id.value()))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .map(Booking::try_from)
        .transpose()
}

/// Lists every booking of a fungible type.
///
/// Overlap filtering happens in the availability calculator.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_bookings_for_type(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<Vec<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::equipment_type_id.eq(equipment_type_id.value()))
        .order(bookings::start_date.asc())
        .select(BookingRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
}

/// Lists every booking for an event.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_bookings_for_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::event_id.eq(event_id.value()))
        .order(bookings::equipment_type_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
}

/// Retrieves a repair hold by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_repair_hold(
    conn: &mut SqliteConnection,
    repair_hold_id: RepairHoldId,
) -> Result<Option<RepairHold>, PersistenceError> {
    repair_holds::table
        .find(repair_hold_id.value())
        .select(RepairHoldRow::as_select())
        .first(conn)
        .optional()?
        .map(RepairHold::try_from)
        .transpose()
}

/// Lists every repair hold of a fungible type, open or returned.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_repair_holds_for_type(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<Vec<RepairHold>, PersistenceError> {
    repair_holds::table
        .filter(repair_holds::equipment_type_id.eq(equipment_type_id.value()))
        .order(repair_holds::start_date.asc())
        .select(RepairHoldRow::as_select())
        .load(conn)?
        .into_iter()
        .map(RepairHold::try_from)
        .collect()
}

/// Counts the bookings and repair holds referencing a fungible type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_type_references(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<(i64, i64), PersistenceError> {
    let booking_count: i64 = bookings::table
        .filter(bookings::equipment_type_id.eq(equipment_type_id.value()))
        .count()
        .get_result(conn)?;
    let hold_count: i64 = repair_holds::table
        .filter(repair_holds::equipment_type_id.eq(equipment_type_id.value()))
        .count()
        .get_result(conn)?;
    Ok((booking_count, hold_count))
}
