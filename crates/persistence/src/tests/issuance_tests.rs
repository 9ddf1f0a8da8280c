// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook::{Command, IssuanceOutcome, PolicyRejection};
use gearbook_domain::{EventId, EventStatus, EventStockIssue, ItemId, ItemStatus};

use super::Fixture;
use crate::{IssuanceRecord, PersistenceError, StatusChangeRecord};

fn completed(outcome: IssuanceOutcome<IssuanceRecord>) -> IssuanceRecord {
    match outcome {
        IssuanceOutcome::Completed(record) => record,
        IssuanceOutcome::Rejected(rejection) => panic!("Unexpected rejection: {rejection}"),
    }
}

#[test]
fn test_issue_moves_item_to_event() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");

    let record: IssuanceRecord = completed(fixture.issue(event_id, item));
    assert_eq!(record.previous_status, ItemStatus::Storage);
    assert_eq!(record.new_status, ItemStatus::Event);
    assert_eq!(record.inventory_number.as_str(), "SPK-001");
    assert!(record.opened_issue.is_some());
    assert!(record.closed_issue.is_none());

    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Event
    );
    let open: EventStockIssue = fixture
        .persistence
        .open_issue_for_item(item)
        .unwrap()
        .unwrap();
    assert_eq!(Some(open.issue_id), record.opened_issue);
    assert_eq!(open.event_id, event_id);
    assert_eq!(open.issued_by, fixture.actor.user_id);
}

#[test]
fn test_capacity_is_enforced_per_reservation() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 2);
    let a: ItemId = fixture.item("SPK-A");
    let b: ItemId = fixture.item("SPK-B");
    let c: ItemId = fixture.item("SPK-C");

    assert!(fixture.issue(event_id, a).completed().is_some());
    assert!(fixture.issue(event_id, b).completed().is_some());
    assert_eq!(
        fixture.issue(event_id, c).rejection(),
        Some(&PolicyRejection::NoCapacity {
            reserved: 2,
            issued: 2
        })
    );

    assert_eq!(
        fixture.persistence.item_status(c).unwrap(),
        ItemStatus::Storage
    );
    assert!(
        fixture
            .persistence
            .open_issue_for_item(c)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_issue_without_reservation_has_no_capacity() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 0);
    let item: ItemId = fixture.item("SPK-001");

    assert_eq!(
        fixture.issue(event_id, item).rejection(),
        Some(&PolicyRejection::NoCapacity {
            reserved: 0,
            issued: 0
        })
    );
}

#[test]
fn test_item_in_repair_cannot_be_issued() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 2);
    let item: ItemId = fixture.item("SPK-001");
    let actor = fixture.actor.clone();
    fixture
        .persistence
        .open_repair(item, "cracked cone", &actor)
        .unwrap();
    let history_before: usize = fixture.persistence.status_history(item).unwrap().len();

    assert_eq!(
        fixture.issue(event_id, item).rejection(),
        Some(&PolicyRejection::InRepair)
    );
    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Repair
    );
    assert_eq!(
        fixture.persistence.status_history(item).unwrap().len(),
        history_before
    );
    assert!(
        fixture
            .persistence
            .item_issue_history(item)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_lost_item_cannot_be_issued() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 2);
    let item: ItemId = fixture.item("SPK-001");
    let actor = fixture.actor.clone();
    fixture
        .persistence
        .mark_item_lost(item, "not found at inventory", &actor)
        .unwrap();

    assert_eq!(
        fixture.issue(event_id, item).rejection(),
        Some(&PolicyRejection::ItemLost)
    );
}

#[test]
fn test_issue_to_closed_event_is_rejected() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 0);
    let item: ItemId = fixture.item("SPK-001");
    assert!(fixture.persistence.close_event(event_id).unwrap().allowed());

    assert_eq!(
        fixture.issue(event_id, item).rejection(),
        Some(&PolicyRejection::EventNotOpen {
            status: EventStatus::Closed
        })
    );
}

#[test]
fn test_repeated_issue_writes_nothing() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 2);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(event_id, item));

    let history: Vec<StatusChangeRecord> = fixture.persistence.status_history(item).unwrap();
    let issues: Vec<EventStockIssue> = fixture.persistence.item_issue_history(item).unwrap();

    let again = fixture.issue(event_id, item);
    assert_eq!(again.rejection(), Some(&PolicyRejection::AlreadyIssuedHere));
    assert!(
        again
            .rejection()
            .is_some_and(PolicyRejection::is_idempotent_noop)
    );

    assert_eq!(fixture.persistence.status_history(item).unwrap(), history);
    assert_eq!(
        fixture.persistence.item_issue_history(item).unwrap(),
        issues
    );
}

#[test]
fn test_item_issued_elsewhere_is_rejected() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(first, item));

    assert_eq!(
        fixture.issue(second, item).rejection(),
        Some(&PolicyRejection::IssuedElsewhere { event_id: first })
    );
}

#[test]
fn test_return_closes_issue() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");
    let issued: IssuanceRecord = completed(fixture.issue(event_id, item));

    let returned: IssuanceRecord = completed(fixture.return_item(event_id, item));
    assert_eq!(returned.closed_issue, issued.opened_issue);
    assert_eq!(returned.new_status, ItemStatus::Storage);

    assert!(
        fixture
            .persistence
            .open_issue_for_item(item)
            .unwrap()
            .is_none()
    );
    let history: Vec<EventStockIssue> = fixture.persistence.item_issue_history(item).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].returned_at.is_some());
    assert_eq!(history[0].returned_by, Some(fixture.actor.user_id));
}

#[test]
fn test_return_from_wrong_event_is_rejected() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(first, item));

    assert_eq!(
        fixture.return_item(second, item).rejection(),
        Some(&PolicyRejection::NotIssuedHere)
    );
    assert_eq!(
        fixture
            .persistence
            .open_issue_for_item(item)
            .unwrap()
            .unwrap()
            .event_id,
        first
    );
}

#[test]
fn test_item_with_open_repair_returns_into_repair() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(event_id, item));
    let actor = fixture.actor.clone();
    fixture
        .persistence
        .open_repair(item, "dropped at venue", &actor)
        .unwrap();
    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Repair
    );

    let returned: IssuanceRecord = completed(fixture.return_item(event_id, item));
    assert_eq!(returned.new_status, ItemStatus::Repair);
    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Repair
    );
}

#[test]
fn test_transfer_moves_issue_between_events() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    let issued: IssuanceRecord = completed(fixture.issue(first, item));

    let moved: IssuanceRecord = completed(fixture.transfer(first, second, item));
    assert_eq!(moved.closed_issue, issued.opened_issue);
    assert_ne!(moved.opened_issue, issued.opened_issue);
    assert_eq!(moved.new_status, ItemStatus::Event);

    let open: EventStockIssue = fixture
        .persistence
        .open_issue_for_item(item)
        .unwrap()
        .unwrap();
    assert_eq!(open.event_id, second);
    assert!(
        fixture
            .persistence
            .list_open_issues(first)
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        fixture.persistence.list_event_issues(first).unwrap().len(),
        1
    );
}

#[test]
fn test_transfer_into_full_event_leaves_item_in_place() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    let other: ItemId = fixture.item("SPK-002");
    completed(fixture.issue(first, item));
    completed(fixture.issue(second, other));
    let history_before: usize = fixture.persistence.status_history(item).unwrap().len();

    assert_eq!(
        fixture.transfer(first, second, item).rejection(),
        Some(&PolicyRejection::NoCapacity {
            reserved: 1,
            issued: 1
        })
    );

    let open: EventStockIssue = fixture
        .persistence
        .open_issue_for_item(item)
        .unwrap()
        .unwrap();
    assert_eq!(open.event_id, first);
    assert_eq!(
        fixture.persistence.item_issue_history(item).unwrap().len(),
        1
    );
    assert_eq!(
        fixture.persistence.status_history(item).unwrap().len(),
        history_before
    );
}

#[test]
fn test_transfer_to_same_event_is_rejected() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(event_id, item));

    assert_eq!(
        fixture.transfer(event_id, event_id, item).rejection(),
        Some(&PolicyRejection::SameEvent)
    );
}

#[test]
fn test_failed_write_rolls_back_whole_command() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");
    let actor = fixture.actor.clone();

    let command = Command::Issue {
        event_id,
        item_id: item,
    };
    let result: Result<(), PersistenceError> =
        fixture.persistence.conn.immediate_transaction(|conn| {
            let outcome = crate::mutations::issuance::execute_command(conn, command, &actor)?;
            assert!(outcome.completed().is_some());
            Err(PersistenceError::Conflict(String::from("aborted by test")))
        });
    assert!(result.is_err());

    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Storage
    );
    assert!(
        fixture
            .persistence
            .item_issue_history(item)
            .unwrap()
            .is_empty()
    );
    assert!(fixture.persistence.status_history(item).unwrap().is_empty());
}

#[test]
fn test_missing_item_is_not_found() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let actor = fixture.actor.clone();

    let result = fixture
        .persistence
        .issue_item(event_id, ItemId::new(999), &actor);
    assert_eq!(result, Err(PersistenceError::not_found("item", 999)));
}

#[test]
fn test_missing_event_is_not_found() {
    let mut fixture = Fixture::new();
    let item: ItemId = fixture.item("SPK-001");
    let actor = fixture.actor.clone();

    let result = fixture
        .persistence
        .issue_item(EventId::new(999), item, &actor);
    assert_eq!(result, Err(PersistenceError::not_found("event", 999)));
}

#[test]
fn test_transfer_from_missing_event_is_not_found() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    completed(fixture.issue(first, item));
    let actor = fixture.actor.clone();

    let result = fixture
        .persistence
        .transfer_item(EventId::new(999), second, item, &actor);
    assert_eq!(result, Err(PersistenceError::not_found("event", 999)));

    let open = fixture
        .persistence
        .open_issue_for_item(item)
        .unwrap()
        .unwrap();
    assert_eq!(open.event_id, first);
}

#[test]
fn test_status_history_records_each_transition() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");

    completed(fixture.issue(first, item));
    completed(fixture.transfer(first, second, item));
    completed(fixture.return_item(second, item));

    let history: Vec<StatusChangeRecord> = fixture.persistence.status_history(item).unwrap();
    let steps: Vec<(ItemStatus, ItemStatus)> = history
        .iter()
        .map(|change| (change.previous_status, change.new_status))
        .collect();
    assert_eq!(
        steps,
        vec![
            (ItemStatus::Storage, ItemStatus::Event),
            (ItemStatus::Event, ItemStatus::Event),
            (ItemStatus::Event, ItemStatus::Storage),
        ]
    );
    assert_eq!(history[1].metadata["command"], "transfer");
    assert_eq!(history[0].actor_display_name, "quartermaster");
}
