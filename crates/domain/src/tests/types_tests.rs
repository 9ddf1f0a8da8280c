// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::jan;
use crate::{DateRange, DomainError, EventStatus, InventoryNumber, ItemStatus, remaining_capacity};

#[test]
fn test_item_status_round_trips_through_strings() {
    for status in [
        ItemStatus::Storage,
        ItemStatus::Event,
        ItemStatus::Repair,
        ItemStatus::Lost,
    ] {
        let parsed: ItemStatus = status.as_str().parse().expect("Valid status");
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_unknown_item_status_is_rejected() {
    let result: Result<ItemStatus, DomainError> = "in_use".parse();

    assert_eq!(
        result,
        Err(DomainError::InvalidItemStatus(String::from("in_use")))
    );
}

#[test]
fn test_item_status_derivation_precedence() {
    assert_eq!(ItemStatus::derive(true, true, true), ItemStatus::Lost);
    assert_eq!(ItemStatus::derive(false, true, true), ItemStatus::Repair);
    assert_eq!(ItemStatus::derive(false, false, true), ItemStatus::Event);
    assert_eq!(ItemStatus::derive(false, false, false), ItemStatus::Storage);
}

#[test]
fn test_event_status_transitions() {
    assert!(EventStatus::Planned.can_transition_to(EventStatus::Closed));
    assert!(EventStatus::Planned.can_transition_to(EventStatus::Cancelled));
    assert!(!EventStatus::Closed.can_transition_to(EventStatus::Cancelled));
    assert!(!EventStatus::Cancelled.can_transition_to(EventStatus::Planned));
    assert!(!EventStatus::Planned.can_transition_to(EventStatus::Planned));
    assert!(EventStatus::Planned.accepts_issuance());
    assert!(!EventStatus::Closed.accepts_issuance());
}

#[test]
fn test_date_range_rejects_inverted_bounds() {
    let result: Result<DateRange, DomainError> = DateRange::new(jan(20), jan(10));

    assert_eq!(
        result,
        Err(DomainError::InvalidDateRange {
            start: jan(20),
            end: jan(10),
        })
    );
}

#[test]
fn test_single_day_ranges_overlap_on_same_day() {
    let a: DateRange = DateRange::new(jan(5), jan(5)).expect("Valid range");
    let b: DateRange = DateRange::new(jan(5), jan(5)).expect("Valid range");
    let c: DateRange = DateRange::new(jan(6), jan(6)).expect("Valid range");

    assert!(a.overlaps(&b));
    assert!(!a.overlaps(&c));
}

#[test]
fn test_inventory_number_is_trimmed_and_non_empty() {
    let number: InventoryNumber = InventoryNumber::new("  MH-0001 ").expect("Valid number");

    assert_eq!(number.as_str(), "MH-0001");
    assert!(InventoryNumber::new("   ").is_err());
}

#[test]
fn test_remaining_capacity_without_reservation_is_zero() {
    assert_eq!(remaining_capacity(None, 0), 0);
    assert_eq!(remaining_capacity(Some(2), 1), 1);
    assert_eq!(remaining_capacity(Some(2), 5), 0);
}
