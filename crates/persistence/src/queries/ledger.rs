// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation ledger queries.
//!
//! Open issue counts are always taken from `event_stock_issues`, joined to the
//! unit's type; there is no cached counter to drift.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{
    EventId, EventStockReservation, ReservationTally, StockTypeId, quantity_from_store,
};

use crate::data_models::ReservationRow;
use crate::diesel_schema::{event_stock_issues, event_stock_reservations, stock_items, stock_types};
use crate::error::PersistenceError;
use crate::queries::count_to_u32;

/// Retrieves the reservation for an (event, type) pair.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_reservation(
    conn: &mut SqliteConnection,
    event_id: EventId,
    stock_type_id: StockTypeId,
) -> Result<Option<EventStockReservation>, PersistenceError> {
    event_stock_reservations::table
        .filter(event_stock_reservations::event_id.eq(event_id.value()))
        .filter(event_stock_reservations::stock_type_id.eq(stock_type_id.value()))
        .select(ReservationRow::as_select())
        .first(conn)
        .optional()?
        .map(EventStockReservation::try_from)
        .transpose()
}

/// Counts open issues at an event for units of a type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_open_issues(
    conn: &mut SqliteConnection,
    event_id: EventId,
    stock_type_id: StockTypeId,
) -> Result<u32, PersistenceError> {
    let count: i64 = event_stock_issues::table
        .inner_join(stock_items::table)
        .filter(event_stock_issues::event_id.eq(event_id.value()))
        .filter(stock_items::stock_type_id.eq(stock_type_id.value()))
        .filter(event_stock_issues::returned_at.is_null())
        .count()
        .get_result(conn)?;
    count_to_u32(count)
}

/// Counts distinct units of a type that were ever issued to an event.
///
/// A unit issued, returned and issued again counts once.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_distinct_issued(
    conn: &mut SqliteConnection,
    event_id: EventId,
    stock_type_id: StockTypeId,
) -> Result<u32, PersistenceError> {
    let count: i64 = event_stock_issues::table
        .inner_join(stock_items::table)
        .filter(event_stock_issues::event_id.eq(event_id.value()))
        .filter(stock_items::stock_type_id.eq(stock_type_id.value()))
        .select(diesel::dsl::count(event_stock_issues::item_id).aggregate_distinct())
        .first(conn)?;
    count_to_u32(count)
}

/// Builds the per-type tally of every reservation of an event.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_reservation_tallies(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<ReservationTally>, PersistenceError> {
    let rows: Vec<(i64, String, i64)> = event_stock_reservations::table
        .inner_join(stock_types::table)
        .filter(event_stock_reservations::event_id.eq(event_id.value()))
        .order(stock_types::name.asc())
        .select((
            event_stock_reservations::stock_type_id,
            stock_types::name,
            event_stock_reservations::quantity,
        ))
        .load(conn)?;

    let mut tallies: Vec<ReservationTally> = Vec::with_capacity(rows.len());
    for (stock_type_id, stock_type_name, quantity) in rows {
        let stock_type_id: StockTypeId = StockTypeId::new(stock_type_id);
        tallies.push(ReservationTally {
            event_id,
            stock_type_id,
            stock_type_name,
            reserved: quantity_from_store(quantity)?,
            open_issued: count_open_issues(conn, event_id, stock_type_id)?,
            ever_issued: count_distinct_issued(conn, event_id, stock_type_id)?,
        });
    }
    Ok(tallies)
}
