// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The issuance transition table.
//!
//! | From    | Command  | To                       |
//! |---------|----------|--------------------------|
//! | storage | issue    | event                    |
//! | event   | return   | storage, or repair       |
//! | event   | transfer | event (another one)      |
//! | repair  | any      | rejected with `in_repair` |
//!
//! [`apply`] is pure: it decides from an [`IssuanceFacts`] read inside the
//! caller's transaction and returns the writes to perform.

use gearbook_domain::{EventId, ItemStatus};

use crate::command::Command;
use crate::error::PolicyRejection;
use crate::state::{EventCapacity, ItemSnapshot, Transition};

/// Facts read at the start of an issuance transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceFacts {
    pub item: ItemSnapshot,
    /// Capacity of the receiving event for the item's type.
    ///
    /// For a return this is the event being returned from; its capacity is
    /// not consulted.
    pub event: EventCapacity,
}

/// Decides a command against the facts.
///
/// # Errors
///
/// Returns the first [`PolicyRejection`] whose guard fails. Nothing should
/// be written when this returns an error.
pub fn apply(command: Command, facts: &IssuanceFacts) -> Result<Transition, PolicyRejection> {
    match command {
        Command::Issue { event_id, .. } => plan_issue(command, event_id, facts),
        Command::Return { event_id, .. } => plan_return(command, event_id, &facts.item),
        Command::Transfer {
            source_event_id,
            target_event_id,
            ..
        } => plan_transfer(command, source_event_id, target_event_id, facts),
    }
}

fn plan_issue(
    command: Command,
    event_id: EventId,
    facts: &IssuanceFacts,
) -> Result<Transition, PolicyRejection> {
    let item: &ItemSnapshot = &facts.item;

    // Already-issued checks win so that a retried issue is recognizable.
    if let Some(open) = item.open_issue {
        if open.event_id == event_id {
            return Err(PolicyRejection::AlreadyIssuedHere);
        }
        return Err(PolicyRejection::IssuedElsewhere {
            event_id: open.event_id,
        });
    }
    check_item_usable(item)?;
    check_receiving_event(&facts.event)?;

    Ok(Transition {
        command,
        close_issue: None,
        open_issue_for: Some(event_id),
        previous_status: item.status,
        new_status: ItemStatus::derive(false, false, true),
        reason: format!("issued to event {event_id}"),
    })
}

fn plan_return(
    command: Command,
    event_id: EventId,
    item: &ItemSnapshot,
) -> Result<Transition, PolicyRejection> {
    let open = item
        .open_issue
        .filter(|open| open.event_id == event_id)
        .ok_or(PolicyRejection::NotIssuedHere)?;

    Ok(Transition {
        command,
        close_issue: Some(open.issue_id),
        open_issue_for: None,
        previous_status: item.status,
        new_status: ItemStatus::derive(item.is_lost, item.has_open_repair, false),
        reason: format!("returned from event {event_id}"),
    })
}

fn plan_transfer(
    command: Command,
    source: EventId,
    target: EventId,
    facts: &IssuanceFacts,
) -> Result<Transition, PolicyRejection> {
    let item: &ItemSnapshot = &facts.item;

    if source == target {
        return Err(PolicyRejection::SameEvent);
    }
    let open = item
        .open_issue
        .filter(|open| open.event_id == source)
        .ok_or(PolicyRejection::NotIssuedHere)?;
    check_item_usable(item)?;
    check_receiving_event(&facts.event)?;

    Ok(Transition {
        command,
        close_issue: Some(open.issue_id),
        open_issue_for: Some(target),
        previous_status: item.status,
        new_status: ItemStatus::derive(false, false, true),
        reason: format!("transferred from event {source} to event {target}"),
    })
}

fn check_item_usable(item: &ItemSnapshot) -> Result<(), PolicyRejection> {
    if item.in_repair() {
        return Err(PolicyRejection::InRepair);
    }
    if item.is_lost || matches!(item.status, ItemStatus::Lost) {
        return Err(PolicyRejection::ItemLost);
    }
    Ok(())
}

fn check_receiving_event(event: &EventCapacity) -> Result<(), PolicyRejection> {
    if !event.status.accepts_issuance() {
        return Err(PolicyRejection::EventNotOpen {
            status: event.status,
        });
    }
    if event.remaining() == 0 {
        return Err(PolicyRejection::NoCapacity {
            reserved: event.reserved.unwrap_or(0),
            issued: event.open_issued,
        });
    }
    Ok(())
}
