// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Applies issuance commands.
//!
//! [`execute_command`] reads the facts, asks the state machine, and performs
//! the resulting writes on one connection. The caller wraps it in an
//! immediate transaction so that the facts cannot change underneath it. The
//! partial unique index on open issues remains the final arbiter: if a write
//! still collides, the unique violation surfaces as
//! [`PersistenceError::Conflict`] and the transaction rolls back.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook::{
    Command, IssuanceFacts, IssuanceOutcome, ItemSnapshot, StatusSetter, Transition, apply,
};
use gearbook_audit::Actor;
use gearbook_domain::{EventId, IssueId, ItemId};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{IssuanceRecord, now_timestamp};
use crate::diesel_schema::event_stock_issues;
use crate::error::PersistenceError;
use crate::mutations::status::SqliteStatusSetter;
use crate::queries::events::get_event;
use crate::queries::issuance::{load_event_capacity, load_item_snapshot};

/// Decides and applies one issuance command.
///
/// A [`gearbook::PolicyRejection`] is returned as
/// `IssuanceOutcome::Rejected` and nothing is written.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the unit or event does not exist,
/// `PersistenceError::Conflict` if a concurrent writer won a race, or another
/// error if a write fails.
pub fn execute_command(
    conn: &mut SqliteConnection,
    command: Command,
    actor: &Actor,
) -> Result<IssuanceOutcome<IssuanceRecord>, PersistenceError> {
    if let Command::Transfer {
        source_event_id, ..
    } = command
    {
        get_event(conn, source_event_id)?
            .ok_or_else(|| PersistenceError::not_found("event", source_event_id.value()))?;
    }
    let item: ItemSnapshot = load_item_snapshot(conn, command.item_id())?;
    let event = load_event_capacity(conn, command.destination(), item.stock_type_id)?;
    let facts: IssuanceFacts = IssuanceFacts { item, event };

    let transition: Transition = match apply(command, &facts) {
        Ok(transition) => transition,
        Err(rejection) => {
            debug!(
                command = command.name(),
                item_id = %command.item_id(),
                code = rejection.code(),
                "Issuance rejected"
            );
            return Ok(IssuanceOutcome::Rejected(rejection));
        }
    };

    let now: String = now_timestamp()?;

    if let Some(issue_id) = transition.close_issue {
        close_issue(conn, issue_id, actor, &now)?;
    }
    let opened_issue: Option<IssueId> = match transition.open_issue_for {
        Some(event_id) => Some(open_issue(conn, event_id, command.item_id(), actor, &now)?),
        None => None,
    };

    let metadata = serde_json::json!({
        "command": command.name(),
        "opened_issue": opened_issue.map(IssueId::value),
        "closed_issue": transition.close_issue.map(IssueId::value),
    });
    SqliteStatusSetter::new(conn).set_status(&transition.status_change(actor, metadata))?;

    info!(
        command = command.name(),
        item_id = %command.item_id(),
        event_id = %command.destination(),
        issue_id = ?opened_issue.or(transition.close_issue).map(IssueId::value),
        status = %transition.new_status,
        "Issuance applied"
    );

    Ok(IssuanceOutcome::Completed(IssuanceRecord {
        command,
        inventory_number: facts.item.inventory_number,
        opened_issue,
        closed_issue: transition.close_issue,
        previous_status: transition.previous_status,
        new_status: transition.new_status,
    }))
}

fn open_issue(
    conn: &mut SqliteConnection,
    event_id: EventId,
    item_id: ItemId,
    actor: &Actor,
    now: &str,
) -> Result<IssueId, PersistenceError> {
    diesel::insert_into(event_stock_issues::table)
        .values((
            event_stock_issues::event_id.eq(event_id.value()),
            event_stock_issues::item_id.eq(item_id.value()),
            event_stock_issues::issued_at.eq(now),
            event_stock_issues::issued_by.eq(actor.user_id.value()),
        ))
        .execute(conn)?;
    Ok(IssueId::new(get_last_insert_rowid(conn)?))
}

fn close_issue(
    conn: &mut SqliteConnection,
    issue_id: IssueId,
    actor: &Actor,
    now: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        event_stock_issues::table
            .find(issue_id.value())
            .filter(event_stock_issues::returned_at.is_null()),
    )
    .set((
        event_stock_issues::returned_at.eq(Some(now.to_string())),
        event_stock_issues::returned_by.eq(Some(actor.user_id.value())),
    ))
    .execute(conn)?;

    if updated != 1 {
        return Err(PersistenceError::Conflict(format!(
            "issue {issue_id} was closed concurrently"
        )));
    }
    Ok(())
}
