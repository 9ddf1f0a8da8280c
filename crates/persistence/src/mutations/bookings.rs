// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking and repair hold mutations for the fungible line.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use gearbook_domain::{
    Booking, BookingId, DateRange, DomainError, EquipmentTypeId, EventId, RepairHold,
    RepairHoldId, RepairHoldStatus, validate_positive_quantity,
};
use time::Date;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_date;
use crate::diesel_schema::{bookings, repair_holds};
use crate::error::PersistenceError;
use crate::queries::bookings::{get_booking_for, get_repair_hold};

/// Inserts or replaces the booking of a type for an event.
///
/// # Errors
///
/// Returns an error if the quantity is zero or the write fails.
pub fn upsert_booking(
    conn: &mut SqliteConnection,
    event_id: EventId,
    equipment_type_id: EquipmentTypeId,
    quantity: u32,
    range: DateRange,
) -> Result<Booking, PersistenceError> {
    validate_positive_quantity(quantity, "booking")?;
    let start_date: String = format_date(range.start())?;
    let end_date: String = format_date(range.end())?;

    diesel::insert_into(bookings::table)
        .values((
            bookings::event_id.eq(event_id.value()),
            bookings::equipment_type_id.eq(equipment_type_id.value()),
            bookings::quantity.eq(i64::from(quantity)),
            bookings::start_date.eq(&start_date),
            bookings::end_date.eq(&end_date),
        ))
        .on_conflict((bookings::event_id, bookings::equipment_type_id))
        .do_update()
        .set((
            bookings::quantity.eq(excluded(bookings::quantity)),
            bookings::start_date.eq(excluded(bookings::start_date)),
            bookings::end_date.eq(excluded(bookings::end_date)),
        ))
        .execute(conn)?;

    let booking: Booking = get_booking_for(conn, event_id, equipment_type_id)?.ok_or_else(|| {
        PersistenceError::QueryFailed(String::from("booking vanished after upsert"))
    })?;

    info!(
        booking_id = %booking.booking_id,
        event_id = %event_id,
        equipment_type_id = %equipment_type_id,
        quantity,
        "Booking stored"
    );
    Ok(booking)
}

/// Deletes a booking.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the booking does not exist.
pub fn delete_booking(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(bookings::table.find(booking_id.value())).execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::not_found("booking", booking_id.value()));
    }
    info!(booking_id = %booking_id, "Booking deleted");
    Ok(())
}

/// Withdraws units of a fungible type for repair.
///
/// # Errors
///
/// Returns an error if the quantity is zero, the end precedes the start, or
/// the write fails.
pub fn insert_repair_hold(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
    quantity: u32,
    start_date: Date,
    end_date: Option<Date>,
) -> Result<RepairHold, PersistenceError> {
    validate_positive_quantity(quantity, "repair hold")?;
    if let Some(end) = end_date {
        DateRange::new(start_date, end)?;
    }

    diesel::insert_into(repair_holds::table)
        .values((
            repair_holds::equipment_type_id.eq(equipment_type_id.value()),
            repair_holds::quantity.eq(i64::from(quantity)),
            repair_holds::status.eq(RepairHoldStatus::InRepair.as_str()),
            repair_holds::start_date.eq(format_date(start_date)?),
            repair_holds::end_date.eq(end_date.map(format_date).transpose()?),
        ))
        .execute(conn)?;
    let repair_hold_id: i64 = get_last_insert_rowid(conn)?;

    info!(repair_hold_id, equipment_type_id = %equipment_type_id, quantity, "Repair hold opened");
    Ok(RepairHold {
        repair_hold_id: RepairHoldId::new(repair_hold_id),
        equipment_type_id,
        quantity,
        status: RepairHoldStatus::InRepair,
        start_date,
        end_date,
    })
}

/// Marks a repair hold returned as of `end_date`.
///
/// # Errors
///
/// Returns an error if the hold does not exist, is already returned, or
/// `end_date` precedes its start.
pub fn close_repair_hold(
    conn: &mut SqliteConnection,
    repair_hold_id: RepairHoldId,
    end_date: Date,
) -> Result<RepairHold, PersistenceError> {
    let mut hold: RepairHold = get_repair_hold(conn, repair_hold_id)?
        .ok_or_else(|| PersistenceError::not_found("repair hold", repair_hold_id.value()))?;
    if hold.status == RepairHoldStatus::Returned {
        return Err(DomainError::RepairHoldAlreadyReturned(repair_hold_id.value()).into());
    }
    DateRange::new(hold.start_date, end_date)?;

    diesel::update(repair_holds::table.find(repair_hold_id.value()))
        .set((
            repair_holds::status.eq(RepairHoldStatus::Returned.as_str()),
            repair_holds::end_date.eq(Some(format_date(end_date)?)),
        ))
        .execute(conn)?;

    info!(repair_hold_id = %repair_hold_id, "Repair hold returned");
    hold.status = RepairHoldStatus::Returned;
    hold.end_date = Some(end_date);
    Ok(hold)
}
