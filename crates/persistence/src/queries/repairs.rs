// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{ItemId, StockRepair};

use crate::data_models::StockRepairRow;
use crate::diesel_schema::stock_repairs;
use crate::error::PersistenceError;

/// Retrieves the open repair ticket of a unit, if any.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_open_repair(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Option<StockRepair>, PersistenceError> {
    stock_repairs::table
        .filter(stock_repairs::item_id.eq(item_id.value()))
        .filter(stock_repairs::closed_at.is_null())
        .select(StockRepairRow::as_select())
        .first(conn)
        .optional()?
        .map(StockRepair::try_from)
        .transpose()
}

/// Returns whether a unit has an open repair ticket.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_open_repair(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<bool, PersistenceError> {
    let count: i64 = stock_repairs::table
        .filter(stock_repairs::item_id.eq(item_id.value()))
        .filter(stock_repairs::closed_at.is_null())
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists every repair ticket of a unit, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_repairs(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Vec<StockRepair>, PersistenceError> {
    stock_repairs::table
        .filter(stock_repairs::item_id.eq(item_id.value()))
        .order(stock_repairs::repair_id.asc())
        .select(StockRepairRow::as_select())
        .load(conn)?
        .into_iter()
        .map(StockRepair::try_from)
        .collect()
}
