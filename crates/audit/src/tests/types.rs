// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Actor, AuditAction, AuditEvent, AuditRecorder, MemoryAuditRecorder, MemoryNotifier,
    Notification, Notifier, NullNotifier, TracingAuditRecorder, TracingNotifier,
};
use gearbook_domain::{EventId, UserId};

fn create_test_actor() -> Actor {
    Actor::new(UserId::new(42), "Stage Manager")
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = create_test_actor();

    assert_eq!(actor.user_id, UserId::new(42));
    assert_eq!(actor.display_name, "Stage Manager");
}

#[test]
fn test_audit_action_strings() {
    assert_eq!(AuditAction::Create.as_str(), "create");
    assert_eq!(AuditAction::Update.as_str(), "update");
    assert_eq!(AuditAction::Delete.to_string(), "delete");
}

#[test]
fn test_audit_event_creation_requires_all_fields() {
    let event: AuditEvent = AuditEvent::new(
        create_test_actor(),
        AuditAction::Create,
        "event_stock_issue",
        17,
        String::from("Issued MH-0001 to event 7"),
    );

    assert_eq!(event.actor, create_test_actor());
    assert_eq!(event.action, AuditAction::Create);
    assert_eq!(event.subject_type, "event_stock_issue");
    assert_eq!(event.subject_id, 17);
    assert_eq!(event.message, "Issued MH-0001 to event 7");
}

#[test]
fn test_memory_recorder_keeps_events_in_order() {
    let recorder: MemoryAuditRecorder = MemoryAuditRecorder::new();
    let first: AuditEvent = AuditEvent::new(
        create_test_actor(),
        AuditAction::Create,
        "event_stock_issue",
        1,
        String::from("first"),
    );
    let second: AuditEvent = AuditEvent::new(
        create_test_actor(),
        AuditAction::Update,
        "event_stock_issue",
        1,
        String::from("second"),
    );

    recorder.record(&first).expect("Failed to record");
    recorder.record(&second).expect("Failed to record");

    assert_eq!(recorder.events(), vec![first, second]);
}

#[test]
fn test_tracing_recorder_never_fails() {
    let event: AuditEvent = AuditEvent::new(
        create_test_actor(),
        AuditAction::Delete,
        "event_stock_reservation",
        3,
        String::from("Removed reservation"),
    );

    assert!(TracingAuditRecorder.record(&event).is_ok());
}

#[test]
fn test_notifiers() {
    let notification: Notification = Notification {
        user_id: UserId::new(5),
        event_id: EventId::new(7),
        title: String::from("Equipment issued"),
        body: String::from("MH-0001 is now at the event"),
    };
    let memory: MemoryNotifier = MemoryNotifier::new();

    memory.notify(&notification).expect("Failed to notify");

    assert!(NullNotifier.notify(&notification).is_ok());
    assert!(TracingNotifier.notify(&notification).is_ok());
    assert_eq!(memory.sent(), vec![notification]);
}
