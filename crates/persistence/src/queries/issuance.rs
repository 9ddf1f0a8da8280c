// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reads that feed the issuance state machine.
//!
//! These run inside the issuing transaction so the facts and the writes see
//! the same snapshot.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook::{EventCapacity, ItemSnapshot, OpenIssueRef};
use gearbook_domain::{EventId, EventStockIssue, ItemId, StockItem, StockTypeId};

use crate::data_models::IssueRow;
use crate::diesel_schema::event_stock_issues;
use crate::error::PersistenceError;
use crate::queries::catalog::get_item;
use crate::queries::events::get_event;
use crate::queries::ledger::{count_open_issues, get_reservation};
use crate::queries::repairs::has_open_repair;

/// Retrieves the open issue of a unit, if any.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_open_issue_for_item(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Option<EventStockIssue>, PersistenceError> {
    event_stock_issues::table
        .filter(event_stock_issues::item_id.eq(item_id.value()))
        .filter(event_stock_issues::returned_at.is_null())
        .select(IssueRow::as_select())
        .first(conn)
        .optional()?
        .map(EventStockIssue::try_from)
        .transpose()
}

/// Lists every issue record of a unit, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_item_issues(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Vec<EventStockIssue>, PersistenceError> {
    event_stock_issues::table
        .filter(event_stock_issues::item_id.eq(item_id.value()))
        .order(event_stock_issues::issue_id.asc())
        .select(IssueRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EventStockIssue::try_from)
        .collect()
}

/// Loads what the state machine needs to know about a unit.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the unit does not exist.
pub fn load_item_snapshot(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<ItemSnapshot, PersistenceError> {
    let item: StockItem = get_item(conn, item_id)?
        .ok_or_else(|| PersistenceError::not_found("item", item_id.value()))?;
    let open_issue: Option<OpenIssueRef> =
        get_open_issue_for_item(conn, item_id)?.map(|issue| OpenIssueRef {
            issue_id: issue.issue_id,
            event_id: issue.event_id,
        });

    Ok(ItemSnapshot {
        item_id,
        inventory_number: item.inventory_number,
        stock_type_id: item.stock_type_id,
        status: item.status,
        is_lost: item.is_lost,
        has_open_repair: has_open_repair(conn, item_id)?,
        open_issue,
    })
}

/// Loads an event's status and its capacity for a stock type.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the event does not exist.
pub fn load_event_capacity(
    conn: &mut SqliteConnection,
    event_id: EventId,
    stock_type_id: StockTypeId,
) -> Result<EventCapacity, PersistenceError> {
    let event = get_event(conn, event_id)?
        .ok_or_else(|| PersistenceError::not_found("event", event_id.value()))?;

    Ok(EventCapacity {
        event_id,
        status: event.status,
        reserved: get_reservation(conn, event_id, stock_type_id)?.map(|r| r.quantity),
        open_issued: count_open_issues(conn, event_id, stock_type_id)?,
    })
}

