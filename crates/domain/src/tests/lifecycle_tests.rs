// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    EventId, GuardDecision, InventoryNumber, ItemId, LifecycleBlocker, OpenIssueSummary,
    ReservationTally, StockTypeId, evaluate_cancel, evaluate_close,
};

fn tally(reserved: u32, open_issued: u32, ever_issued: u32) -> ReservationTally {
    ReservationTally {
        event_id: EventId::new(7),
        stock_type_id: StockTypeId::new(3),
        stock_type_name: String::from("Moving head"),
        reserved,
        open_issued,
        ever_issued,
    }
}

fn open_issue(item: i64, number: &str) -> OpenIssueSummary {
    OpenIssueSummary {
        item_id: ItemId::new(item),
        inventory_number: InventoryNumber::new(number).expect("Valid inventory number"),
    }
}

#[test]
fn test_cancel_allowed_without_issue_history() {
    let decision: GuardDecision = evaluate_cancel(0);

    assert!(decision.allowed());
    assert_eq!(decision.reason(), None);
}

#[test]
fn test_cancel_blocked_once_equipment_touched_event() {
    let decision: GuardDecision = evaluate_cancel(2);

    assert!(!decision.allowed());
    assert_eq!(
        decision.blockers,
        vec![LifecycleBlocker::EquipmentTouched { issue_count: 2 }]
    );
    assert!(decision.reason().expect("reason").contains("2 issue records"));
}

#[test]
fn test_close_blocked_by_unreturned_item_naming_it() {
    let decision: GuardDecision = evaluate_close(&[open_issue(11, "MH-0042")], &[tally(1, 1, 1)]);

    assert!(!decision.allowed());
    assert_eq!(decision.blockers.len(), 1);
    assert_eq!(decision.blockers[0].code(), "unreturned_item");
    assert!(decision.reason().expect("reason").contains("MH-0042"));
}

#[test]
fn test_close_blocked_by_reservation_shortfall() {
    let decision: GuardDecision = evaluate_close(&[], &[tally(3, 0, 1)]);

    assert!(!decision.allowed());
    match &decision.blockers[0] {
        LifecycleBlocker::ReservationShortfall {
            stock_type_name,
            reserved,
            issued,
            shortfall,
            ..
        } => {
            assert_eq!(stock_type_name, "Moving head");
            assert_eq!(*reserved, 3);
            assert_eq!(*issued, 1);
            assert_eq!(*shortfall, 2);
        }
        other => panic!("Expected ReservationShortfall, got: {other:?}"),
    }
    assert!(decision.reason().expect("reason").contains("2 short"));
}

#[test]
fn test_close_reports_every_blocker() {
    let open_issues: Vec<OpenIssueSummary> = vec![open_issue(1, "A-1"), open_issue(2, "A-2")];
    let decision: GuardDecision = evaluate_close(&open_issues, &[tally(4, 2, 2)]);

    let codes: Vec<&str> = decision
        .blockers
        .iter()
        .map(LifecycleBlocker::code)
        .collect();
    assert_eq!(
        codes,
        vec!["unreturned_item", "unreturned_item", "reservation_shortfall"]
    );
}

#[test]
fn test_close_allowed_when_everything_returned_and_issued() {
    let decision: GuardDecision = evaluate_close(&[], &[tally(2, 0, 2), tally(0, 0, 0)]);

    assert!(decision.allowed());
}

#[test]
fn test_transferred_out_units_still_satisfy_reservation() {
    // Three distinct units passed through the event for a reservation of two.
    let decision: GuardDecision = evaluate_close(&[], &[tally(2, 0, 3)]);

    assert!(decision.allowed());
}
