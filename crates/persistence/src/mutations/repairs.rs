// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Repair tickets and the lost flag of serialized units.
//!
//! Both change the facts the item status is derived from, so each mutation
//! finishes by re-deriving the status.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_audit::Actor;
use gearbook_domain::{DomainError, ItemId, RepairId, StockItem, StockRepair};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{now_timestamp, parse_timestamp};
use crate::diesel_schema::{stock_items, stock_repairs};
use crate::error::PersistenceError;
use crate::mutations::status::refresh_item_status;
use crate::queries::catalog::get_item;
use crate::queries::repairs::get_open_repair;

fn require_item(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<StockItem, PersistenceError> {
    get_item(conn, item_id)?.ok_or_else(|| PersistenceError::not_found("item", item_id.value()))
}

/// Opens a repair ticket on a unit.
///
/// A unit out at an event may be sent to repair; it will come back to the
/// `repair` status when returned.
///
/// # Errors
///
/// Returns an error if the unit does not exist or already has an open ticket.
pub fn open_repair(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    reason: &str,
    actor: &Actor,
) -> Result<StockRepair, PersistenceError> {
    require_item(conn, item_id)?;
    if get_open_repair(conn, item_id)?.is_some() {
        return Err(DomainError::RepairAlreadyOpen(item_id).into());
    }

    let opened_at: String = now_timestamp()?;
    diesel::insert_into(stock_repairs::table)
        .values((
            stock_repairs::item_id.eq(item_id.value()),
            stock_repairs::reason.eq(reason),
            stock_repairs::opened_at.eq(&opened_at),
            stock_repairs::opened_by.eq(actor.user_id.value()),
        ))
        .execute(conn)?;
    let repair_id: i64 = get_last_insert_rowid(conn)?;

    refresh_item_status(
        conn,
        item_id,
        actor,
        &format!("repair opened: {reason}"),
        serde_json::json!({ "repair_id": repair_id }),
    )?;

    info!(repair_id, item_id = %item_id, "Repair opened");
    Ok(StockRepair {
        repair_id: RepairId::new(repair_id),
        item_id,
        reason: reason.to_string(),
        opened_at: parse_timestamp(&opened_at)?,
        closed_at: None,
        close_note: None,
    })
}

/// Closes the open repair ticket of a unit.
///
/// # Errors
///
/// Returns an error if the unit does not exist or has no open ticket.
pub fn close_repair(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    note: Option<&str>,
    actor: &Actor,
) -> Result<StockRepair, PersistenceError> {
    require_item(conn, item_id)?;
    let mut repair: StockRepair =
        get_open_repair(conn, item_id)?.ok_or(DomainError::NoOpenRepair(item_id))?;

    let closed_at: String = now_timestamp()?;
    diesel::update(stock_repairs::table.find(repair.repair_id.value()))
        .set((
            stock_repairs::closed_at.eq(Some(closed_at.clone())),
            stock_repairs::close_note.eq(note.map(str::to_string)),
        ))
        .execute(conn)?;

    refresh_item_status(
        conn,
        item_id,
        actor,
        "repair closed",
        serde_json::json!({ "repair_id": repair.repair_id.value() }),
    )?;

    info!(repair_id = %repair.repair_id, item_id = %item_id, "Repair closed");
    repair.closed_at = Some(parse_timestamp(&closed_at)?);
    repair.close_note = note.map(str::to_string);
    Ok(repair)
}

/// Sets or clears the lost flag of a unit.
///
/// An open issue is left open; the unit can still be returned.
///
/// # Errors
///
/// Returns an error if the unit does not exist or a write fails.
pub fn set_item_lost(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    is_lost: bool,
    reason: &str,
    actor: &Actor,
) -> Result<StockItem, PersistenceError> {
    require_item(conn, item_id)?;

    diesel::update(stock_items::table.find(item_id.value()))
        .set(stock_items::is_lost.eq(i32::from(is_lost)))
        .execute(conn)?;

    refresh_item_status(
        conn,
        item_id,
        actor,
        reason,
        serde_json::json!({ "is_lost": is_lost }),
    )?;

    info!(item_id = %item_id, is_lost, "Lost flag changed");
    require_item(conn, item_id)
}
