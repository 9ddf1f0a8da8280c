// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::ItemId;

use crate::data_models::{StatusChangeRecord, StatusChangeRow};
use crate::diesel_schema::item_status_changes;
use crate::error::PersistenceError;

/// Lists the status history of a unit, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_status_changes(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Vec<StatusChangeRecord>, PersistenceError> {
    item_status_changes::table
        .filter(item_status_changes::item_id.eq(item_id.value()))
        .order(item_status_changes::change_id.asc())
        .select(StatusChangeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(StatusChangeRecord::try_from)
        .collect()
}
