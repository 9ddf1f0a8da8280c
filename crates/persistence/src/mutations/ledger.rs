// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use gearbook_domain::{EventId, EventStockReservation, StockTypeId};
use tracing::info;

use crate::diesel_schema::event_stock_reservations;
use crate::error::PersistenceError;
use crate::queries::catalog::get_stock_type;
use crate::queries::events::get_event;

/// Sets the reserved quantity of a stock type for an event.
///
/// There is one row per (event, type); setting it again replaces the
/// quantity. No cross-event capacity check is made. Zero is allowed and
/// means nothing may be issued.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the event or type does not exist.
pub fn upsert_reservation(
    conn: &mut SqliteConnection,
    event_id: EventId,
    stock_type_id: StockTypeId,
    quantity: u32,
) -> Result<EventStockReservation, PersistenceError> {
    if get_event(conn, event_id)?.is_none() {
        return Err(PersistenceError::not_found("event", event_id.value()));
    }
    if get_stock_type(conn, stock_type_id)?.is_none() {
        return Err(PersistenceError::not_found("stock type", stock_type_id.value()));
    }

    diesel::insert_into(event_stock_reservations::table)
        .values((
            event_stock_reservations::event_id.eq(event_id.value()),
            event_stock_reservations::stock_type_id.eq(stock_type_id.value()),
            event_stock_reservations::quantity.eq(i64::from(quantity)),
        ))
        .on_conflict((
            event_stock_reservations::event_id,
            event_stock_reservations::stock_type_id,
        ))
        .do_update()
        .set(event_stock_reservations::quantity.eq(excluded(event_stock_reservations::quantity)))
        .execute(conn)?;

    info!(event_id = %event_id, stock_type_id = %stock_type_id, quantity, "Reservation set");
    Ok(EventStockReservation {
        event_id,
        stock_type_id,
        quantity,
    })
}
