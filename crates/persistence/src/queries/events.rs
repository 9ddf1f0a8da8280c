// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event queries and the issuance facts the lifecycle guard needs.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{
    Event, EventId, EventStockIssue, InventoryNumber, ItemId, OpenIssueSummary,
};

use crate::data_models::{EventRow, IssueRow};
use crate::diesel_schema::{event_stock_issues, events, stock_items};
use crate::error::PersistenceError;
use crate::queries::count_to_u32;

/// Retrieves an event by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Option<Event>, PersistenceError> {
    events::table
        .find(event_id.value())
        .select(EventRow::as_select())
        .first(conn)
        .optional()?
        .map(Event::try_from)
        .transpose()
}

/// Lists all events ordered by start date.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_events(conn: &mut SqliteConnection) -> Result<Vec<Event>, PersistenceError> {
    events::table
        .order((events::start_date.asc(), events::event_id.asc()))
        .select(EventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Event::try_from)
        .collect()
}

/// Counts issue records for an event, open or closed.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_issue_records(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<u32, PersistenceError> {
    let count: i64 = event_stock_issues::table
        .filter(event_stock_issues::event_id.eq(event_id.value()))
        .count()
        .get_result(conn)?;
    count_to_u32(count)
}

/// Lists the units still out at an event, by inventory number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_open_issue_summaries(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<OpenIssueSummary>, PersistenceError> {
    let rows: Vec<(i64, String)> = event_stock_issues::table
        .inner_join(stock_items::table)
        .filter(event_stock_issues::event_id.eq(event_id.value()))
        .filter(event_stock_issues::returned_at.is_null())
        .order(stock_items::inventory_number.asc())
        .select((stock_items::item_id, stock_items::inventory_number))
        .load(conn)?;

    rows.into_iter()
        .map(|(item_id, inventory_number)| {
            Ok(OpenIssueSummary {
                item_id: ItemId::new(item_id),
                inventory_number: InventoryNumber::new(&inventory_number)?,
            })
        })
        .collect()
}

/// Lists every issue record of an event, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_event_issues(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<EventStockIssue>, PersistenceError> {
    event_stock_issues::table
        .filter(event_stock_issues::event_id.eq(event_id.value()))
        .order(event_stock_issues::issue_id.asc())
        .select(IssueRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EventStockIssue::try_from)
        .collect()
}
