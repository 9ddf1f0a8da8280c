// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Barrier;
use std::thread;

use diesel::prelude::*;
use gearbook::{IssuanceOutcome, PolicyRejection};
use gearbook_audit::Actor;
use gearbook_domain::{EventId, ItemId, ItemStatus};

use super::Fixture;
use crate::diesel_schema::event_stock_issues;
use crate::{IssuanceRecord, Persistence, PersistenceError, StoreOptions};

const WORKERS: usize = 6;

type WorkerResult = Result<IssuanceOutcome<IssuanceRecord>, PersistenceError>;

#[test]
fn test_unique_index_rejects_second_open_issue() {
    let mut fixture = Fixture::new();
    let first: EventId = fixture.event("Festival", 1);
    let second: EventId = fixture.event("Gala", 1);
    let item: ItemId = fixture.item("SPK-001");
    fixture.issue(first, item);

    let result = diesel::insert_into(event_stock_issues::table)
        .values((
            event_stock_issues::event_id.eq(second.value()),
            event_stock_issues::item_id.eq(item.value()),
            event_stock_issues::issued_at.eq("2026-01-10T00:00:00Z"),
            event_stock_issues::issued_by.eq(1_i64),
        ))
        .execute(&mut fixture.persistence.conn)
        .map_err(PersistenceError::from);

    assert!(result.as_ref().is_err_and(PersistenceError::is_conflict));
    assert_eq!(
        fixture.persistence.list_open_issues(second).unwrap(),
        vec![]
    );
}

#[test]
fn test_returned_issue_does_not_block_new_one() {
    let mut fixture = Fixture::new();
    let event_id: EventId = fixture.event("Festival", 1);
    let item: ItemId = fixture.item("SPK-001");

    fixture.issue(event_id, item);
    fixture.return_item(event_id, item);
    assert!(fixture.issue(event_id, item).completed().is_some());
    assert_eq!(
        fixture.persistence.item_issue_history(item).unwrap().len(),
        2
    );
}

/// Opens `count` extra connections to the fixture's file database.
fn connections(path: &std::path::Path, count: usize) -> Vec<Persistence> {
    (0..count)
        .map(|_| Persistence::new_with_file(path, &StoreOptions::default()).unwrap())
        .collect()
}

/// Runs one command per connection, all released at the same moment.
fn race<F>(stores: &mut [Persistence], actor: &Actor, command: F) -> Vec<WorkerResult>
where
    F: Fn(usize, &mut Persistence, &Actor) -> WorkerResult + Sync,
{
    let barrier = Barrier::new(stores.len());
    thread::scope(|scope| {
        let handles: Vec<_> = stores
            .iter_mut()
            .enumerate()
            .map(|(index, store)| {
                let barrier = &barrier;
                let command = &command;
                scope.spawn(move || {
                    barrier.wait();
                    command(index, store, actor)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    })
}

#[test]
fn test_concurrent_issues_to_different_events_assign_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let mut fixture =
        Fixture::seed(Persistence::new_with_file(&path, &StoreOptions::default()).unwrap());
    let item: ItemId = fixture.item("SPK-001");
    let events: Vec<EventId> = (0..WORKERS)
        .map(|n| fixture.event(&format!("Event {n}"), 1))
        .collect();
    let actor: Actor = fixture.actor.clone();

    let mut stores: Vec<Persistence> = connections(&path, WORKERS);
    let results: Vec<WorkerResult> = race(&mut stores, &actor, |index, store, actor| {
        store.issue_item(events[index], item, actor)
    });

    let winners: usize = results
        .iter()
        .filter(|r| matches!(r, Ok(IssuanceOutcome::Completed(_))))
        .count();
    assert_eq!(winners, 1);
    for result in &results {
        match result {
            Ok(IssuanceOutcome::Completed(_)) => {}
            Ok(IssuanceOutcome::Rejected(rejection)) => assert!(
                matches!(rejection, PolicyRejection::IssuedElsewhere { .. }),
                "unexpected rejection {rejection:?}"
            ),
            Err(err) => assert!(err.is_conflict(), "unexpected error {err:?}"),
        }
    }

    let open_issues: usize = events
        .iter()
        .map(|event_id| {
            fixture
                .persistence
                .list_open_issues(*event_id)
                .unwrap()
                .len()
        })
        .sum();
    assert_eq!(open_issues, 1);
    assert_eq!(
        fixture.persistence.item_issue_history(item).unwrap().len(),
        1
    );
    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Event
    );
}

#[test]
fn test_concurrent_issues_to_same_event_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retry.db");
    let mut fixture =
        Fixture::seed(Persistence::new_with_file(&path, &StoreOptions::default()).unwrap());
    let item: ItemId = fixture.item("SPK-001");
    let event_id: EventId = fixture.event("Festival", 1);
    let actor: Actor = fixture.actor.clone();

    let mut stores: Vec<Persistence> = connections(&path, WORKERS);
    let results: Vec<WorkerResult> = race(&mut stores, &actor, |_, store, actor| {
        store.issue_item(event_id, item, actor)
    });

    let winners: usize = results
        .iter()
        .filter(|r| matches!(r, Ok(IssuanceOutcome::Completed(_))))
        .count();
    assert_eq!(winners, 1);
    assert!(results.iter().all(|result| match result {
        Ok(IssuanceOutcome::Completed(_)) => true,
        Ok(IssuanceOutcome::Rejected(rejection)) => rejection.is_idempotent_noop(),
        Err(err) => err.is_conflict(),
    }));
    assert_eq!(
        fixture
            .persistence
            .list_open_issues(event_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_concurrent_issues_respect_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capacity.db");
    let mut fixture =
        Fixture::seed(Persistence::new_with_file(&path, &StoreOptions::default()).unwrap());
    let event_id: EventId = fixture.event("Festival", 2);
    let items: Vec<ItemId> = (0..WORKERS)
        .map(|n| fixture.item(&format!("SPK-{n:03}")))
        .collect();
    let actor: Actor = fixture.actor.clone();

    let mut stores: Vec<Persistence> = connections(&path, WORKERS);
    let results: Vec<WorkerResult> = race(&mut stores, &actor, |index, store, actor| {
        store.issue_item(event_id, items[index], actor)
    });

    let winners: usize = results
        .iter()
        .filter(|r| matches!(r, Ok(IssuanceOutcome::Completed(_))))
        .count();
    assert_eq!(winners, 2);
    assert_eq!(
        fixture
            .persistence
            .list_open_issues(event_id)
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        fixture
            .persistence
            .remaining_capacity(event_id, fixture.stock_type_id)
            .unwrap(),
        0
    );
}

#[test]
fn test_concurrent_transfers_move_unit_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transfer.db");
    let mut fixture =
        Fixture::seed(Persistence::new_with_file(&path, &StoreOptions::default()).unwrap());
    let item: ItemId = fixture.item("SPK-001");
    let source: EventId = fixture.event("Festival", 1);
    let targets: Vec<EventId> = (0..WORKERS)
        .map(|n| fixture.event(&format!("Event {n}"), 1))
        .collect();
    assert!(fixture.issue(source, item).completed().is_some());
    let actor: Actor = fixture.actor.clone();

    let mut stores: Vec<Persistence> = connections(&path, WORKERS);
    let results: Vec<WorkerResult> = race(&mut stores, &actor, |index, store, actor| {
        store.transfer_item(source, targets[index], item, actor)
    });

    let winners: usize = results
        .iter()
        .filter(|r| matches!(r, Ok(IssuanceOutcome::Completed(_))))
        .count();
    assert_eq!(winners, 1);
    for result in &results {
        match result {
            Ok(IssuanceOutcome::Completed(_)) => {}
            Ok(IssuanceOutcome::Rejected(rejection)) => assert_eq!(
                rejection,
                &PolicyRejection::NotIssuedHere,
                "unexpected rejection {rejection:?}"
            ),
            Err(err) => assert!(err.is_conflict(), "unexpected error {err:?}"),
        }
    }

    assert_eq!(
        fixture.persistence.list_open_issues(source).unwrap(),
        vec![]
    );
    let open_issues: usize = targets
        .iter()
        .map(|event_id| {
            fixture
                .persistence
                .list_open_issues(*event_id)
                .unwrap()
                .len()
        })
        .sum();
    assert_eq!(open_issues, 1);
    assert_eq!(
        fixture.persistence.item_issue_history(item).unwrap().len(),
        2
    );
    assert_eq!(
        fixture.persistence.item_status(item).unwrap(),
        ItemStatus::Event
    );
}
