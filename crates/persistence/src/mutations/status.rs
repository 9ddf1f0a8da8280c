// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The durable [`StatusSetter`].
//!
//! Every status write in this crate goes through [`SqliteStatusSetter`], which
//! updates the cached `stock_items.status` column and appends a row to
//! `item_status_changes` on the same connection. Callers run it inside their
//! own transaction.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook::{StatusChange, StatusSetter};
use gearbook_audit::Actor;
use gearbook_domain::{ItemId, ItemStatus, StockItem};
use tracing::debug;

use crate::data_models::now_timestamp;
use crate::diesel_schema::{item_status_changes, stock_items};
use crate::error::PersistenceError;
use crate::queries::catalog::get_item;
use crate::queries::issuance::get_open_issue_for_item;
use crate::queries::repairs::has_open_repair;

/// Writes status changes through a borrowed connection.
pub struct SqliteStatusSetter<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteStatusSetter<'a> {
    pub const fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl StatusSetter for SqliteStatusSetter<'_> {
    type Error = PersistenceError;

    fn set_status(&mut self, change: &StatusChange) -> Result<(), Self::Error> {
        let item: StockItem = get_item(self.conn, change.item_id)?
            .ok_or_else(|| PersistenceError::not_found("item", change.item_id.value()))?;
        let metadata_json: String = serde_json::to_string(&change.metadata)?;
        let changed_at: String = now_timestamp()?;

        diesel::update(stock_items::table.find(change.item_id.value()))
            .set(stock_items::status.eq(change.new_status.as_str()))
            .execute(self.conn)?;

        diesel::insert_into(item_status_changes::table)
            .values((
                item_status_changes::item_id.eq(change.item_id.value()),
                item_status_changes::previous_status.eq(item.status.as_str()),
                item_status_changes::new_status.eq(change.new_status.as_str()),
                item_status_changes::actor_user_id.eq(change.actor.user_id.value()),
                item_status_changes::actor_display_name.eq(&change.actor.display_name),
                item_status_changes::reason.eq(&change.reason),
                item_status_changes::metadata_json.eq(&metadata_json),
                item_status_changes::changed_at.eq(&changed_at),
            ))
            .execute(self.conn)?;

        debug!(
            item_id = %change.item_id,
            from = %item.status,
            to = %change.new_status,
            "Item status set"
        );
        Ok(())
    }
}

/// Re-derives a unit's status from its facts and stores it if it changed.
///
/// # Errors
///
/// Returns an error if the unit does not exist or a write fails.
pub fn refresh_item_status(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    actor: &Actor,
    reason: &str,
    metadata: serde_json::Value,
) -> Result<ItemStatus, PersistenceError> {
    let item: StockItem = get_item(conn, item_id)?
        .ok_or_else(|| PersistenceError::not_found("item", item_id.value()))?;
    let derived: ItemStatus = ItemStatus::derive(
        item.is_lost,
        has_open_repair(conn, item_id)?,
        get_open_issue_for_item(conn, item_id)?.is_some(),
    );

    if derived != item.status {
        SqliteStatusSetter::new(conn).set_status(&StatusChange {
            item_id,
            new_status: derived,
            actor: actor.clone(),
            reason: reason.to_string(),
            metadata,
        })?;
    }
    Ok(derived)
}
