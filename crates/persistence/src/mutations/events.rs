// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event mutations, including guarded lifecycle transitions.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{
    DateRange, DomainError, Event, EventId, EventStatus, GuardDecision, UserId, evaluate_cancel,
    evaluate_close, validate_name,
};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_date;
use crate::diesel_schema::events;
use crate::error::PersistenceError;
use crate::queries::events::{count_issue_records, get_event, list_open_issue_summaries};
use crate::queries::ledger::list_reservation_tallies;

/// Creates a planned event.
///
/// # Errors
///
/// Returns an error if the name is empty or the write fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    name: &str,
    range: DateRange,
    responsible_user: Option<UserId>,
) -> Result<Event, PersistenceError> {
    let name: String = validate_name(name, "event name")?;

    diesel::insert_into(events::table)
        .values((
            events::name.eq(&name),
            events::start_date.eq(format_date(range.start())?),
            events::end_date.eq(format_date(range.end())?),
            events::status.eq(EventStatus::Planned.as_str()),
            events::responsible_user_id.eq(responsible_user.map(UserId::value)),
        ))
        .execute(conn)?;
    let event_id: i64 = get_last_insert_rowid(conn)?;

    info!(event_id, name = %name, "Event created");
    Ok(Event {
        event_id: EventId::new(event_id),
        name,
        range,
        status: EventStatus::Planned,
        responsible_user,
    })
}

fn require_transition(
    conn: &mut SqliteConnection,
    event_id: EventId,
    target: EventStatus,
) -> Result<Event, PersistenceError> {
    let event: Event = get_event(conn, event_id)?
        .ok_or_else(|| PersistenceError::not_found("event", event_id.value()))?;
    if !event.status.can_transition_to(target) {
        return Err(DomainError::InvalidEventTransition {
            from: event.status,
            to: target,
        }
        .into());
    }
    Ok(event)
}

fn write_status(
    conn: &mut SqliteConnection,
    event_id: EventId,
    status: EventStatus,
) -> Result<(), PersistenceError> {
    diesel::update(events::table.find(event_id.value()))
        .set(events::status.eq(status.as_str()))
        .execute(conn)?;
    info!(event_id = %event_id, status = %status, "Event status changed");
    Ok(())
}

/// Evaluates the cancel guard and cancels the event if it allows.
///
/// The decision is returned either way; the status only changes when it is
/// allowed.
///
/// # Errors
///
/// Returns an error if the event does not exist or is no longer planned.
pub fn cancel_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<GuardDecision, PersistenceError> {
    require_transition(conn, event_id, EventStatus::Cancelled)?;
    let decision: GuardDecision = evaluate_cancel(count_issue_records(conn, event_id)?);
    if decision.allowed() {
        write_status(conn, event_id, EventStatus::Cancelled)?;
    }
    Ok(decision)
}

/// Evaluates the close guard and closes the event if it allows.
///
/// # Errors
///
/// Returns an error if the event does not exist or is no longer planned.
pub fn close_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<GuardDecision, PersistenceError> {
    require_transition(conn, event_id, EventStatus::Closed)?;
    let decision: GuardDecision = evaluate_close(
        &list_open_issue_summaries(conn, event_id)?,
        &list_reservation_tallies(conn, event_id)?,
    );
    if decision.allowed() {
        write_status(conn, event_id, EventStatus::Closed)?;
    }
    Ok(decision)
}
